//! Local-disk document storage.
//!
//! Files live under `<root>/<folder>/` and are referenced by the public path
//! `<prefix>/<folder>/<file name>`, which is what the account record stores.

use chrono::Utc;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::config::UploadConfig;
use crate::shared::constants::{DEFAULT_AVATAR_PATH, SAMPLE_ASSET_MARKER};

const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFolder {
    Avatars,
    Licenses,
    Registration,
}

impl DocumentFolder {
    pub const ALL: [DocumentFolder; 3] = [
        DocumentFolder::Avatars,
        DocumentFolder::Licenses,
        DocumentFolder::Registration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFolder::Avatars => "avatars",
            DocumentFolder::Licenses => "licenses",
            DocumentFolder::Registration => "registration",
        }
    }
}

/// A file written by [`LocalStorage::store`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub public_path: String,
    pub disk_path: PathBuf,
}

/// Bundled sample assets are shared by every account and never deleted
fn is_protected_asset(public_path: &str) -> bool {
    public_path == DEFAULT_AVATAR_PATH || public_path.contains(SAMPLE_ASSET_MARKER)
}

pub struct LocalStorage {
    root: PathBuf,
    public_prefix: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_prefix: &str) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.root_dir.clone(), &config.public_prefix)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_folders(&self) -> io::Result<()> {
        for folder in DocumentFolder::ALL {
            fs::create_dir_all(self.root.join(folder.as_str())).await?;
        }
        Ok(())
    }

    /// Write `data` as `<field>_<owner>_<epoch>.<ext>`; on a name collision `-<n>` is
    /// appended before the extension
    pub async fn store(
        &self,
        folder: DocumentFolder,
        field: &str,
        owner_id: &str,
        extension: &str,
        data: &[u8],
    ) -> io::Result<StoredFile> {
        self.store_at(folder, field, owner_id, extension, data, Utc::now().timestamp())
            .await
    }

    pub(crate) async fn store_at(
        &self,
        folder: DocumentFolder,
        field: &str,
        owner_id: &str,
        extension: &str,
        data: &[u8],
        epoch: i64,
    ) -> io::Result<StoredFile> {
        let dir = self.root.join(folder.as_str());
        fs::create_dir_all(&dir).await?;

        let stem = format!("{}_{}_{}", field, owner_id, epoch);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = if attempt == 0 {
                format!("{}.{}", stem, extension)
            } else {
                format!("{}-{}.{}", stem, attempt, extension)
            };
            let disk_path = dir.join(&file_name);

            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&disk_path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            };

            if let Err(e) = write_all(&mut file, data).await {
                let _ = fs::remove_file(&disk_path).await;
                return Err(e);
            }

            let public_path = format!("{}/{}/{}", self.public_prefix, folder.as_str(), file_name);
            info!(path = %public_path, bytes = data.len(), "Stored uploaded file");

            return Ok(StoredFile {
                public_path,
                disk_path,
            });
        }

        Err(io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free file name for {}", stem),
        ))
    }

    /// Remove a file written earlier in the same request
    pub async fn discard(&self, file: &StoredFile) {
        match fs::remove_file(&file.disk_path).await {
            Ok(()) => debug!(path = %file.public_path, "Discarded stored file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %file.public_path, "Failed to discard stored file: {}", e),
        }
    }

    /// Delete the file a record referenced before it was replaced.
    ///
    /// Protected assets and paths outside the upload prefix are left alone. Returns
    /// whether a file was removed.
    pub async fn remove_replaced(&self, public_path: &str) -> bool {
        if is_protected_asset(public_path) {
            debug!(path = %public_path, "Keeping protected asset");
            return false;
        }

        let Some(disk_path) = self.resolve(public_path) else {
            debug!(path = %public_path, "Replaced path is outside the upload folder");
            return false;
        };

        match fs::remove_file(&disk_path).await {
            Ok(()) => {
                info!(path = %public_path, "Removed replaced file");
                true
            }
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                warn!(path = %public_path, "Failed to remove replaced file: {}", e);
                false
            }
        }
    }

    /// Map a public path back onto the disk, rejecting anything that escapes the root
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let relative = public_path
            .strip_prefix(self.public_prefix.as_str())?
            .strip_prefix('/')?;

        let mut path = self.root.clone();
        for segment in relative.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
                return None;
            }
            path.push(segment);
        }
        Some(path)
    }
}

async fn write_all(file: &mut fs::File, data: &[u8]) -> io::Result<()> {
    file.write_all(data).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, LocalStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "/uploads/");
        (dir, storage)
    }

    #[tokio::test]
    async fn test_store_names_file_after_field_owner_and_time() {
        let (_dir, storage) = storage();

        let stored = storage
            .store_at(DocumentFolder::Avatars, "avatar", "42", "png", b"img", 1_700_000_000)
            .await
            .unwrap();

        assert_eq!(stored.public_path, "/uploads/avatars/avatar_42_1700000000.png");
        assert_eq!(fs::read(&stored.disk_path).await.unwrap(), b"img");
    }

    #[tokio::test]
    async fn test_store_collision_appends_suffix() {
        let (_dir, storage) = storage();

        let first = storage
            .store_at(DocumentFolder::Licenses, "license", "7", "jpg", b"a", 100)
            .await
            .unwrap();
        let second = storage
            .store_at(DocumentFolder::Licenses, "license", "7", "jpg", b"b", 100)
            .await
            .unwrap();

        assert_eq!(first.public_path, "/uploads/licenses/license_7_100.jpg");
        assert_eq!(second.public_path, "/uploads/licenses/license_7_100-1.jpg");
        assert_eq!(fs::read(&first.disk_path).await.unwrap(), b"a");
    }

    #[tokio::test]
    async fn test_remove_replaced_deletes_uploaded_file() {
        let (_dir, storage) = storage();
        let stored = storage
            .store(DocumentFolder::Avatars, "avatar", "1", "gif", b"x")
            .await
            .unwrap();

        assert!(storage.remove_replaced(&stored.public_path).await);
        assert!(!stored.disk_path.exists());
        // second removal finds nothing
        assert!(!storage.remove_replaced(&stored.public_path).await);
    }

    #[tokio::test]
    async fn test_remove_replaced_keeps_protected_assets() {
        let (_dir, storage) = storage();

        assert!(!storage.remove_replaced(DEFAULT_AVATAR_PATH).await);
        assert!(!storage.remove_replaced("/assets/licence-sample.jpg").await);

        // a sample copied under the upload folder is protected too
        let sample = storage
            .store_at(DocumentFolder::Licenses, "licence-sample", "0", "jpg", b"s", 1)
            .await
            .unwrap();
        assert!(!storage.remove_replaced(&sample.public_path).await);
        assert!(sample.disk_path.exists());
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let (_dir, storage) = storage();

        assert!(storage.resolve("/uploads/avatars/a.png").is_some());
        assert!(storage.resolve("/uploads/../etc/passwd").is_none());
        assert!(storage.resolve("/uploads/avatars//a.png").is_none());
        assert!(storage.resolve("/elsewhere/a.png").is_none());
        assert!(storage.resolve("/uploadsx/a.png").is_none());
    }

    #[tokio::test]
    async fn test_ensure_folders_creates_every_folder() {
        let (dir, storage) = storage();
        storage.ensure_folders().await.unwrap();
        for folder in DocumentFolder::ALL {
            assert!(dir.path().join(folder.as_str()).is_dir());
        }
    }
}
