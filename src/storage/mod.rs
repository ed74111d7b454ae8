pub mod gcs;
pub mod local;
pub mod provider;

pub use gcs::GcsStorage;
pub use local::*;
pub use provider::*;

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};

/// Build the blob store from configuration. `None` means the store is not
/// available and image-by-id requests report StoreUnavailable.
pub fn build_blob_store(config: &StorageConfig) -> Option<Arc<dyn StorageProvider>> {
    match config.backend {
        StorageBackend::Local => {
            tracing::info!("Using local blob store at {}", config.local_path);
            Some(Arc::new(LocalStorage::new(&config.local_path)))
        }
        StorageBackend::Gcs if config.has_gcs_credentials() => {
            tracing::info!("Using GCS bucket {}", config.bucket);
            Some(Arc::new(GcsStorage::new(config)))
        }
        StorageBackend::Gcs => {
            tracing::error!("GCS credentials missing, blob store not initialized");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_blob_store() {
        let mut config = StorageConfig::default();
        assert!(build_blob_store(&config).is_none());

        config.backend = StorageBackend::Local;
        let store = build_blob_store(&config).unwrap();
        assert_eq!(store.storage_type(), "local");

        config.backend = StorageBackend::Gcs;
        config.bucket = "b".into();
        config.client_email = "svc@example.iam.gserviceaccount.com".into();
        config.private_key = "pem".into();
        assert_eq!(build_blob_store(&config).unwrap().storage_type(), "gcs");
    }
}
