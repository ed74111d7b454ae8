pub mod auth;
pub mod blog;
pub mod identity;
pub mod image;
pub mod profanity;

pub use auth::AuthService;
pub use blog::BlogService;
pub use identity::{FirebaseVerifier, IdentityVerifier};
pub use image::ImageService;
