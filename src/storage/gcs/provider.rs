use async_trait::async_trait;
use bytes::Bytes;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use crate::storage::{ObjectEntry, StorageProvider};

use super::client::Client;

/// Google Cloud Storage provider
pub struct GcsStorage {
    client: Client,
}

impl GcsStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl StorageProvider for GcsStorage {
    async fn get(&self, path: &str) -> Result<Bytes> {
        let key = path.trim_start_matches('/');
        self.client
            .get_object(key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Object not found: {}", key)))
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        self.client.object_exists(path.trim_start_matches('/')).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>> {
        self.client.list_objects(prefix).await
    }

    fn storage_type(&self) -> &'static str {
        "gcs"
    }
}
