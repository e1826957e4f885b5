//! Vertical image stacking.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{GenericImage, ImageFormat, Rgb, RgbImage};
use singularity_core::ImageCompositorPort;
use tracing::{debug, warn};

use crate::error::{CompositionError, CompositionResult};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Stacks images top-to-bottom on a white canvas.
///
/// The canvas is as wide as the widest input and as tall as all inputs
/// together. Each image is pasted at `x = 0` in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalCompositor;

impl VerticalCompositor {
    pub const fn new() -> Self {
        Self
    }

    /// Compose the payloads into a single PNG.
    pub fn compose_png(&self, images: &[Vec<u8>]) -> CompositionResult<Vec<u8>> {
        if images.is_empty() {
            return Err(CompositionError::NoImages);
        }

        let decoded = images
            .iter()
            .enumerate()
            .map(|(index, bytes)| {
                image::load_from_memory(bytes)
                    .map(|img| img.to_rgb8())
                    .map_err(|source| CompositionError::Decode { index, source })
            })
            .collect::<CompositionResult<Vec<RgbImage>>>()?;

        let width = decoded.iter().map(RgbImage::width).max().unwrap_or(0);
        let height = decoded
            .iter()
            .try_fold(0u32, |total, img| total.checked_add(img.height()))
            .ok_or(CompositionError::CanvasTooLarge)?;

        let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);
        let mut y_offset = 0;
        for img in &decoded {
            canvas
                .copy_from(img, 0, y_offset)
                .map_err(|_| CompositionError::CanvasTooLarge)?;
            y_offset += img.height();
        }

        let mut png = Cursor::new(Vec::new());
        canvas
            .write_to(&mut png, ImageFormat::Png)
            .map_err(CompositionError::Encode)?;

        debug!(
            image_count = decoded.len(),
            width, height, "Composed images vertically"
        );
        Ok(png.into_inner())
    }

    /// Compose the payloads and return base64-encoded PNG text.
    pub fn try_compose(&self, images: &[Vec<u8>]) -> CompositionResult<String> {
        self.compose_png(images).map(|png| BASE64.encode(png))
    }
}

impl ImageCompositorPort for VerticalCompositor {
    fn compose_base64(&self, images: &[Vec<u8>]) -> String {
        self.try_compose(images).unwrap_or_else(|e| {
            warn!(error = %e, "Image composition failed");
            String::new()
        })
    }
}
