//! Shared fixtures for handler and service tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, Result};
use crate::imaging::ImageTransformer;
use crate::models::VerifiedIdentity;
use crate::storage::{LocalStorage, StorageProvider};
use crate::AppState;

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.admin.email = "admin@example.com".to_string();
    config.session.secret = "test-secret".to_string();
    config
}

/// Identity verifier that accepts a fixed set of tokens
pub struct StaticVerifier {
    tokens: HashMap<String, String>,
}

impl StaticVerifier {
    pub fn new(tokens: &[(&str, &str)]) -> Self {
        Self {
            tokens: tokens
                .iter()
                .map(|(t, e)| (t.to_string(), e.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl crate::services::IdentityVerifier for StaticVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity> {
        let email = self
            .tokens
            .get(id_token)
            .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;
        Ok(VerifiedIdentity {
            email: email.clone(),
            name: "Test User".to_string(),
        })
    }
}

/// State over an in-memory database. `root` backs both the local image
/// directory (`root/local`) and, when `with_store`, the blob store (`root/bucket`).
pub async fn test_state(root: &Path, with_store: bool) -> AppState {
    let blob_store: Option<Arc<dyn StorageProvider>> = if with_store {
        Some(Arc::new(LocalStorage::new(root.join("bucket"))))
    } else {
        None
    };

    AppState {
        db: Database::in_memory().await.unwrap(),
        config: Arc::new(test_config()),
        blob_store,
        local_images: Arc::new(LocalStorage::new(root.join("local"))),
        identity: Arc::new(StaticVerifier::new(&[
            ("admin-token", "admin@example.com"),
            ("visitor-token", "visitor@example.com"),
        ])),
        transformer: ImageTransformer::new(),
    }
}

pub fn write_file(root: &Path, key: &str, data: &[u8]) {
    let path = root.join(key);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, data).unwrap();
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height))
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .unwrap();
    bytes
}
