//! Error types for image composition.
//!
//! These never cross the port boundary: `compose_base64` flattens them to an
//! empty string. They are public for callers of `try_compose`.

use thiserror::Error;

/// Result type alias for composition operations.
pub type CompositionResult<T> = Result<T, CompositionError>;

/// Errors raised while composing images.
#[derive(Debug, Error)]
pub enum CompositionError {
    /// Nothing to compose.
    #[error("No images to compose")]
    NoImages,

    /// A payload could not be decoded as an image.
    #[error("Failed to decode image #{index}: {source}")]
    Decode {
        /// Zero-based position in the input
        index: usize,
        #[source]
        source: image::ImageError,
    },

    /// The stacked canvas would exceed `u32` pixel dimensions.
    #[error("Composed image is too large")]
    CanvasTooLarge,

    /// The canvas could not be encoded as PNG.
    #[error("Failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),
}
