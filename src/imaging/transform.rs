use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, RgbImage};
use jpeg_encoder::{ColorType, Encoder};
use thiserror::Error;

use crate::models::TransformRequest;

use super::calculations::target_dimensions;

/// Largest output we are willing to allocate (100 megapixels)
const MAX_OUTPUT_PIXELS: u64 = 100_000_000;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Invalid output size {width}x{height}")]
    Size { width: u32, height: u32 },
    #[error("Failed to encode JPEG: {0}")]
    Encode(String),
}

/// Decoded pixels after color normalization
enum Pixels {
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl Pixels {
    /// Grayscale stays grayscale; everything else, including alpha and
    /// palette sources, becomes opaque RGB. Alpha is dropped, not composited.
    fn normalize(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(gray) => Pixels::Gray(gray),
            DynamicImage::ImageLuma16(_) => Pixels::Gray(image.to_luma8()),
            DynamicImage::ImageRgb8(rgb) => Pixels::Rgb(rgb),
            other => Pixels::Rgb(other.to_rgb8()),
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        match self {
            Pixels::Gray(img) => img.dimensions(),
            Pixels::Rgb(img) => img.dimensions(),
        }
    }

    fn resize(self, width: u32, height: u32) -> Self {
        match self {
            Pixels::Gray(img) => Pixels::Gray(imageops::resize(&img, width, height, FilterType::Lanczos3)),
            Pixels::Rgb(img) => Pixels::Rgb(imageops::resize(&img, width, height, FilterType::Lanczos3)),
        }
    }

    fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>, TransformError> {
        let (width, height) = self.dimensions();
        let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => return Err(TransformError::Size { width, height }),
        };

        let mut out = Vec::new();
        let mut encoder = Encoder::new(&mut out, quality);
        encoder.set_optimized_huffman_tables(true);

        let result = match self {
            Pixels::Gray(img) => encoder.encode(img.as_raw(), w, h, ColorType::Luma),
            Pixels::Rgb(img) => encoder.encode(img.as_raw(), w, h, ColorType::Rgb),
        };
        result.map_err(|e| TransformError::Encode(e.to_string()))?;

        Ok(out)
    }
}

/// Decode → normalize → optional resize → JPEG.
///
/// Stateless; one instance is shared by all requests. Output is always
/// JPEG regardless of the source format, and either the whole pipeline
/// succeeds or no bytes are returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTransformer;

impl ImageTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform(
        &self,
        source: &[u8],
        request: &TransformRequest,
    ) -> Result<Vec<u8>, TransformError> {
        let decoded =
            image::load_from_memory(source).map_err(|e| TransformError::Decode(e.to_string()))?;

        let mut pixels = Pixels::normalize(decoded);
        let source_dims = pixels.dimensions();

        if request.target_width.is_some() {
            let (width, height) = target_dimensions(source_dims, request.target_width);
            if width == 0 || width as u64 * height as u64 > MAX_OUTPUT_PIXELS {
                return Err(TransformError::Size { width, height });
            }
            tracing::debug!(
                "Resizing {}x{} to {}x{}",
                source_dims.0,
                source_dims.1,
                width,
                height
            );
            pixels = pixels.resize(width, height);
        }

        pixels.encode_jpeg(request.quality)
    }
}
