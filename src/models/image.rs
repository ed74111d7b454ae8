use serde::{Deserialize, Serialize};

/// Identifies a stored original image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Resolved by scanning `images/{id}/` in the blob store
    Id(u64),
    /// Resolved by joining the local image directory with a relative path
    Filename(String),
}

/// Query parameters accepted by the image routes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageQuery {
    pub q: Option<i64>,
    pub w: Option<u32>,
}

/// Validated transform parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformRequest {
    /// JPEG quality, 1..=100
    pub quality: u8,
    pub target_width: Option<u32>,
}

impl TransformRequest {
    pub const DEFAULT_QUALITY: u8 = 75;

    pub fn new(quality: u8, target_width: Option<u32>) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            target_width,
        }
    }
}

impl Default for TransformRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_QUALITY, None)
    }
}

/// One gallery image as reported by `/api/images`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEntry {
    pub id: u64,
    pub title: String,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct ImageListResponse {
    pub images: Vec<ImageEntry>,
}
