//! Image compositor port definition.

/// Port for combining several uploaded images into one artifact.
///
/// Implementations decode every payload, stack them top-to-bottom in input
/// order and return the result as base64-encoded PNG text.
///
/// The contract is soft: any decode or encode failure yields an empty
/// string instead of an error. Callers must treat an empty result as a
/// hard failure.
pub trait ImageCompositorPort: Send + Sync {
    /// Compose the payloads and return base64 PNG text, or `""` on failure.
    fn compose_base64(&self, images: &[Vec<u8>]) -> String;
}
