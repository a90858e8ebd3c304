/// Image types accepted for every document and avatar upload
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];

pub const INVALID_IMAGE_TYPE_MESSAGE: &str = "Invalid file type. Only JPG, PNG, and GIF allowed.";

pub fn is_image_type_allowed(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    ALLOWED_IMAGE_TYPES.contains(&essence.as_str())
}

/// Extensions a stored upload may carry
const STORED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

fn extension_from_content_type(content_type: &str) -> &'static str {
    match content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
        .as_str()
    {
        "image/png" => "png",
        "image/gif" => "gif",
        _ => "jpg",
    }
}

/// Extension for the stored copy: the client's own extension when it is an image
/// extension, otherwise one derived from the content type
pub fn stored_extension(original_name: &str, content_type: &str) -> String {
    original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| STORED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or_else(|| extension_from_content_type(content_type).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_image_types() {
        assert!(is_image_type_allowed("image/jpeg"));
        assert!(is_image_type_allowed("image/jpg"));
        assert!(is_image_type_allowed("image/png"));
        assert!(is_image_type_allowed("IMAGE/GIF"));
        assert!(!is_image_type_allowed("application/pdf"));
        assert!(!is_image_type_allowed("image/webp"));
        assert!(!is_image_type_allowed(""));
    }

    #[test]
    fn test_stored_extension() {
        assert_eq!(stored_extension("license.JPG", "image/jpeg"), "jpg");
        assert_eq!(stored_extension("photo.png", "image/png"), "png");
        assert_eq!(stored_extension("no-extension", "image/gif"), "gif");
        assert_eq!(stored_extension("weird.p/ng", "image/png"), "png");
        assert_eq!(stored_extension("", "image/jpeg"), "jpg");
        assert_eq!(stored_extension("scan.jpeg", "image/jpeg"), "jpeg");
    }

    #[test]
    fn test_stored_extension_never_leaves_image_set() {
        assert!(is_image_type_allowed("image/png"));
        assert_eq!(stored_extension("evil.html", "image/png"), "png");
        assert_eq!(stored_extension("page.HTM", "image/gif"), "gif");
        assert_eq!(stored_extension("run.svg", "image/jpeg"), "jpg");
        assert_eq!(stored_extension("archive.tar.exe", "IMAGE/PNG"), "png");
    }
}
