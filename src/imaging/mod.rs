//! On-demand image optimization.
//!
//! | Step | Implementation |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP, TIFF) | `image::load_from_memory` |
//! | Color normalization | alpha and palette sources flattened to RGB8 |
//! | Resize | `image::imageops::resize` with `Lanczos3` |
//! | Encode → JPEG | `jpeg-encoder` with optimized Huffman tables |

mod calculations;
mod transform;

pub use calculations::target_dimensions;
pub use transform::{ImageTransformer, TransformError};
