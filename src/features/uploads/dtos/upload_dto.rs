use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Multipart form for Swagger UI; the handler reads the `Multipart` stream directly
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadImageDto {
    /// JPEG, PNG, GIF or WebP image, at most 4MB
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImageDto {
    /// Public URL to save with the image record
    pub url: String,
    /// Storage key, needed to delete the file later
    pub file_key: String,
    pub uploaded_by: String,
}

/// Image types accepted for portfolio uploads
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

pub fn is_image_type_allowed(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_images_are_allowed() {
        assert!(is_image_type_allowed("image/webp"));
        assert!(!is_image_type_allowed("application/pdf"));
        assert!(!is_image_type_allowed("image/svg+xml"));
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("text/html"), None);
    }
}
