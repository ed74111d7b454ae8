use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::imaging::ImageTransformer;
use crate::models::{ImageEntry, ImageRef, TransformRequest};
use crate::storage::StorageProvider;

/// Case-insensitive `.jpg` / `.jpeg` suffix
fn is_jpeg(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg")
}

/// Normalize a namespace prefix to end with exactly one `/`
fn namespace(prefix: &str) -> String {
    format!("{}/", prefix.trim_end_matches('/'))
}

/// Locates original images and runs them through the transformer
pub struct ImageService;

impl ImageService {
    /// Raw bytes of the original named by `image_ref`
    pub async fn resolve(
        local: &dyn StorageProvider,
        blob_store: Option<&dyn StorageProvider>,
        prefix: &str,
        image_ref: &ImageRef,
    ) -> Result<Bytes> {
        match image_ref {
            ImageRef::Filename(path) => Self::resolve_by_filename(local, path).await,
            ImageRef::Id(id) => {
                let store = blob_store.ok_or(AppError::StoreUnavailable)?;
                Self::resolve_by_id(store, prefix, *id).await
            }
        }
    }

    /// Direct lookup under the local image directory. The provider rejects
    /// paths that would escape it.
    pub async fn resolve_by_filename(local: &dyn StorageProvider, path: &str) -> Result<Bytes> {
        if !local.exists(path).await? {
            return Err(AppError::NotFound("Image not found".to_string()));
        }
        local.get(path).await
    }

    /// First JPEG under `{prefix}{id}/`, in the store's listing order
    pub async fn resolve_by_id(store: &dyn StorageProvider, prefix: &str, id: u64) -> Result<Bytes> {
        let id_prefix = format!("{}{}/", namespace(prefix), id);
        let objects = store.list(&id_prefix).await?;

        let object = objects
            .iter()
            .find(|o| is_jpeg(&o.name))
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

        tracing::debug!("Image {} resolved to {}", id, object.name);
        store.get(&object.name).await
    }

    /// Gallery listing: one entry per numeric id directory that holds a JPEG
    pub async fn list_images(store: &dyn StorageProvider, prefix: &str) -> Result<Vec<ImageEntry>> {
        let prefix = namespace(prefix);
        let objects = store.list(&prefix).await?;
        Ok(Self::collect_image_entries(
            &prefix,
            objects.iter().map(|o| o.name.as_str()),
        ))
    }

    /// Turn raw keys into sorted entries. Keys must look like
    /// `{prefix}{id}/{file}.jpg`; anything else is skipped. When one id holds
    /// several JPEGs the first in listing order wins.
    pub fn collect_image_entries<'a>(
        prefix: &str,
        names: impl Iterator<Item = &'a str>,
    ) -> Vec<ImageEntry> {
        let mut by_id: BTreeMap<u64, ImageEntry> = BTreeMap::new();

        for name in names {
            let Some(rest) = name.strip_prefix(prefix) else {
                continue;
            };
            let parts: Vec<&str> = rest.split('/').collect();
            let &[dir, filename] = parts.as_slice() else {
                continue;
            };
            // `01` would list as id 1, which resolves under `images/1/`
            let Ok(id) = dir.parse::<u64>() else {
                continue;
            };
            if id.to_string() != dir {
                continue;
            }
            if filename.is_empty() || !is_jpeg(filename) {
                continue;
            }

            by_id.entry(id).or_insert_with(|| ImageEntry {
                id,
                title: Path::new(filename)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(filename)
                    .to_string(),
                filename: filename.to_string(),
            });
        }

        by_id.into_values().collect()
    }

    /// Decode, resize and re-encode off the async runtime
    pub async fn optimize(
        transformer: ImageTransformer,
        source: Bytes,
        request: TransformRequest,
    ) -> Result<Vec<u8>> {
        tokio::task::spawn_blocking(move || transformer.transform(&source, &request))
            .await
            .map_err(|e| AppError::Internal(format!("Image task failed: {}", e)))?
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;
    use crate::test_helpers::{jpeg_bytes, write_file as write};

    #[test]
    fn test_collect_skips_malformed_and_sorts() {
        let names = [
            "images/3/cat.jpeg",
            "images/1/dog.JPG",
            "images/abc/bad.jpeg",
            "images/2/notes.txt",
            "images/4/",
            "images/5/nested/deep.jpg",
            "images/-6/neg.jpg",
            "images/01/padded.jpg",
            "images/+8/signed.jpg",
            "images/top.jpg",
        ];
        let entries = ImageService::collect_image_entries("images/", names.into_iter());
        assert_eq!(
            entries,
            vec![
                ImageEntry {
                    id: 1,
                    title: "dog".to_string(),
                    filename: "dog.JPG".to_string()
                },
                ImageEntry {
                    id: 3,
                    title: "cat".to_string(),
                    filename: "cat.jpeg".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_collect_first_jpeg_wins() {
        let names = ["images/7/a.jpg", "images/7/b.jpg"];
        let entries = ImageService::collect_image_entries("images/", names.into_iter());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].filename, "a.jpg");
    }

    #[tokio::test]
    async fn test_list_images_from_store() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "images/3/cat.jpeg", b"x");
        write(dir.path(), "images/1/dog.JPG", b"x");
        write(dir.path(), "images/abc/bad.jpeg", b"x");
        let store = LocalStorage::new(dir.path());

        let ids: Vec<u64> = ImageService::list_images(&store, "images")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_resolve_by_id() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "images/2/readme.txt", b"text");
        write(dir.path(), "images/2/photo.JPEG", b"jpeg-bytes");
        write(dir.path(), "images/9/readme.txt", b"text");
        let store = LocalStorage::new(dir.path());

        let bytes = ImageService::resolve_by_id(&store, "images/", 2).await.unwrap();
        assert_eq!(bytes, Bytes::from_static(b"jpeg-bytes"));

        // Empty namespace and namespace without a JPEG are both NotFound
        for id in [42, 9] {
            assert!(matches!(
                ImageService::resolve_by_id(&store, "images/", id).await,
                Err(AppError::NotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_resolve_without_store_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalStorage::new(dir.path());
        let result = ImageService::resolve(&local, None, "images/", &ImageRef::Id(1)).await;
        assert!(matches!(result, Err(AppError::StoreUnavailable)));
    }

    #[tokio::test]
    async fn test_resolve_by_filename() {
        let outer = tempfile::tempdir().unwrap();
        write(outer.path(), "private.jpg", b"private");
        write(outer.path(), "public/portfolio/a.jpg", b"public");
        let local = LocalStorage::new(outer.path().join("public"));

        let bytes = ImageService::resolve_by_filename(&local, "portfolio/a.jpg")
            .await
            .unwrap();
        assert_eq!(bytes, Bytes::from_static(b"public"));

        assert!(matches!(
            ImageService::resolve_by_filename(&local, "portfolio/missing.jpg").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            ImageService::resolve_by_filename(&local, "../private.jpg").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_optimize() {
        let out = ImageService::optimize(
            ImageTransformer::new(),
            Bytes::from(jpeg_bytes(200, 100)),
            TransformRequest::new(80, Some(50)),
        )
        .await
        .unwrap();
        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (50, 25));

        let err = ImageService::optimize(
            ImageTransformer::new(),
            Bytes::from_static(b"nope"),
            TransformRequest::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Processing(_)));
    }
}
