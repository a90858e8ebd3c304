use axum::{body::Bytes, extract::Multipart};
use std::collections::HashMap;
use tracing::debug;

use crate::core::error::{AppError, Result};

/// A file part of a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Buffered multipart form: text fields by name (repeatable) and file parts by name.
///
/// File inputs submitted without a file (empty filename and body) are treated as absent.
#[derive(Debug, Default)]
pub struct FormData {
    text: HashMap<String, Vec<String>>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub async fn from_multipart(multipart: &mut Multipart, max_file_size: usize) -> Result<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest("Failed to read multipart data".to_string())
        })? {
            let name = field.name().unwrap_or("").trim_end_matches("[]").to_string();
            if name.is_empty() {
                continue;
            }

            match field.file_name().map(|s| s.to_string()) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "application/octet-stream".to_string());

                    let data = field.bytes().await.map_err(|e| {
                        debug!("Failed to read file bytes: {}", e);
                        AppError::BadRequest("Failed to read file data".to_string())
                    })?;

                    if file_name.is_empty() && data.is_empty() {
                        debug!("Skipping empty file input: {}", name);
                        continue;
                    }

                    if data.len() > max_file_size {
                        return Err(AppError::BadRequest(format!(
                            "File too large. Maximum size is {} MB",
                            max_file_size / 1024 / 1024
                        )));
                    }

                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            data,
                        },
                    );
                }
                None => {
                    let value = field.text().await.map_err(|e| {
                        debug!("Failed to read field '{}': {}", name, e);
                        AppError::BadRequest(format!("Failed to read field '{}'", name))
                    })?;
                    form.text.entry(name).or_default().push(value);
                }
            }
        }

        Ok(form)
    }

    /// First value of a text field
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// First value of a text field, trimmed, or `""` when absent
    pub fn trimmed(&self, name: &str) -> &str {
        self.text(name).map(str::trim).unwrap_or("")
    }

    /// Every value submitted under `name` (or `name[]`)
    pub fn all(&self, name: &str) -> &[String] {
        self.text.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

#[cfg(test)]
impl FormData {
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.text
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    pub fn with_file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.files.insert(
            name.to_string(),
            UploadedFile {
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
                data: Bytes::copy_from_slice(data),
            },
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};
    use axum_test::TestServer;

    async fn parse(mut multipart: Multipart) -> Result<&'static str> {
        FormData::from_multipart(&mut multipart, 1024).await.map(|_| "ok")
    }

    #[tokio::test]
    async fn test_malformed_body_gets_fixed_message() {
        let server = TestServer::new(Router::new().route("/", post(parse))).unwrap();

        let response = server
            .post("/")
            .content_type("multipart/form-data; boundary=XBOUNDARY")
            .bytes(Bytes::from_static(b"--XBOUNDARY\r\nContent-Disposition: form-da"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Failed to read multipart data");
        assert!(body["errors"].is_null());
    }

    #[test]
    fn test_text_accessors() {
        let form = FormData::default()
            .with_text("email", "  driver@example.com ")
            .with_text("vehicleCapability", "sedan")
            .with_text("vehicleCapability", "van");

        assert_eq!(form.text("email"), Some("  driver@example.com "));
        assert_eq!(form.trimmed("email"), "driver@example.com");
        assert_eq!(form.trimmed("missing"), "");
        assert_eq!(form.all("vehicleCapability"), ["sedan", "van"]);
        assert!(form.all("missing").is_empty());
    }

    #[test]
    fn test_take_file_removes_it() {
        let mut form = FormData::default().with_file("avatarImage", "me.png", "image/png", b"png");
        assert!(form.file("avatarImage").is_some());
        let file = form.take_file("avatarImage").unwrap();
        assert_eq!(file.content_type, "image/png");
        assert!(form.file("avatarImage").is_none());
    }
}
