//! bcrypt hashing; `$2y$` hashes from the legacy portal verify as-is.

use crate::core::error::{AppError, Result};

/// Length of every well-formed bcrypt hash
pub const BCRYPT_HASH_LEN: usize = 60;

const HASH_COST: u32 = 10;

pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, HASH_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Check `candidate` against a stored hash.
///
/// A stored hash too short to be bcrypt is a data fault, not a wrong password.
pub async fn verify_password(candidate: &str, stored_hash: &str) -> Result<bool> {
    if stored_hash.len() < BCRYPT_HASH_LEN {
        tracing::error!(
            "Stored password hash is malformed (length {})",
            stored_hash.len()
        );
        return Err(AppError::Internal(
            "Stored password hash is malformed".to_string(),
        ));
    }

    let candidate = candidate.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(|e| {
            tracing::error!("Stored password hash could not be parsed: {}", e);
            AppError::Internal("Stored password hash is malformed".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hash = hash_password("s3cret-pass").await.unwrap();
        assert_eq!(hash.len(), BCRYPT_HASH_LEN);
        assert!(verify_password("s3cret-pass", &hash).await.unwrap());
        assert!(!verify_password("wrong-pass", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_legacy_2y_prefix_verifies() {
        let hash = bcrypt::hash("legacy-pass", 4).unwrap().replacen("$2b$", "$2y$", 1);
        assert!(verify_password("legacy-pass", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_short_hash_is_internal_error() {
        let err = verify_password("anything", "plaintext").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
