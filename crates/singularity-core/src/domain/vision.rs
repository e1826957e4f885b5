//! Image upload types for vision requests.

/// Maximum number of images accepted by a single vision request.
pub const MAX_IMAGES: usize = 4;

/// Prompt used when a vision request arrives without one.
pub const DEFAULT_VISION_PROMPT: &str = "What do you see in these images?";

/// A single uploaded image payload, as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name, if the client sent one.
    pub file_name: Option<String>,
    /// Declared content type (e.g. `image/png`).
    pub content_type: Option<String>,
    /// Raw encoded bytes.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: Option<String>,
        content_type: Option<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Whether the declared content type indicates an image.
    ///
    /// Only the declared type is checked; the bytes are validated later by
    /// the compositor.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: Option<&str>) -> ImageUpload {
        ImageUpload::new(None, content_type.map(str::to_string), vec![1, 2, 3])
    }

    #[test]
    fn image_content_types_are_accepted() {
        assert!(upload(Some("image/png")).is_image());
        assert!(upload(Some("IMAGE/JPEG")).is_image());
        assert!(upload(Some(" image/webp")).is_image());
    }

    #[test]
    fn non_image_content_types_are_rejected() {
        assert!(!upload(Some("application/pdf")).is_image());
        assert!(!upload(Some("text/plain")).is_image());
        assert!(!upload(None).is_image());
    }
}
