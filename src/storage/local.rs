use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::error::{AppError, Result};
use crate::storage::{ObjectEntry, StorageProvider};

/// Local file system storage provider
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Join a relative key onto the base directory. Only normal path
    /// segments are accepted, so the result never leaves `base_path`.
    fn get_full_path(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let mut full_path = self.base_path.clone();
        let mut segments = 0;

        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    full_path.push(segment);
                    segments += 1;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    tracing::warn!("Rejected path outside storage root: {:?}", path);
                    return Err(AppError::Validation("Invalid path".to_string()));
                }
            }
        }

        if segments == 0 {
            return Err(AppError::Validation("Invalid path".to_string()));
        }
        Ok(full_path)
    }

    /// Key for a file found while walking the tree
    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.base_path).ok()?;
        let parts: Vec<&str> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();
        Some(parts.join("/"))
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn get(&self, path: &str) -> Result<Bytes> {
        let full_path = self.get_full_path(path)?;

        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(format!("File not found: {}", path))
            } else {
                AppError::Storage(format!("Failed to read file: {}", e))
            }
        })?;

        tracing::debug!("Read {} bytes from {:?}", data.len(), full_path);
        Ok(Bytes::from(data))
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let full_path = self.get_full_path(path)?;
        Ok(fs::metadata(&full_path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>> {
        // Start the walk at the deepest directory named by the prefix
        let dir_part = match prefix.rfind('/') {
            Some(idx) => &prefix[..idx],
            None => "",
        };
        let start = if dir_part.is_empty() {
            self.base_path.clone()
        } else {
            self.get_full_path(dir_part)?
        };

        let mut entries = Vec::new();
        let mut pending = vec![start];

        while let Some(dir) = pending.pop() {
            let mut read_dir = match fs::read_dir(&dir).await {
                Ok(rd) => rd,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(AppError::Storage(format!("Failed to list {:?}: {}", dir, e))),
            };

            while let Some(entry) = read_dir.next_entry().await? {
                let file_type = entry.file_type().await?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    if let Some(name) = self.key_for(&path) {
                        if name.starts_with(prefix) {
                            entries.push(ObjectEntry { name });
                        }
                    }
                }
            }
        }

        // Match the lexicographic order of bucket listings
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn storage_type(&self) -> &'static str {
        "local"
    }
}
