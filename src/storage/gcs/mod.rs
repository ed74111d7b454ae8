//! Google Cloud Storage access over the JSON API.
//!
//! - service account OAuth (signed JWT assertion, cached access token)
//! - prefix listing with pagination
//! - object download

pub mod client;
pub mod objects;
pub mod provider;

pub use client::Client;
pub use provider::GcsStorage;
