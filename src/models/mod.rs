pub mod comment;
pub mod image;
pub mod post;
pub mod session;

pub use comment::*;
pub use image::*;
pub use post::*;
pub use session::*;
