use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// One object returned by a prefix listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Full key relative to the store root, `/`-separated
    pub name: String,
}

/// Read access to stored original images
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Download an object
    async fn get(&self, path: &str) -> Result<Bytes>;

    /// Check if an object exists
    async fn exists(&self, path: &str) -> Result<bool>;

    /// List every object whose key starts with `prefix`, in the store's
    /// native order
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>>;

    /// Get the storage type name
    fn storage_type(&self) -> &'static str;
}
