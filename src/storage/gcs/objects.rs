//! Object listing and download

use bytes::Bytes;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::storage::ObjectEntry;

use super::client::Client;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListObjectsResponse {
    #[serde(default)]
    items: Vec<ObjectResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectResource {
    name: String,
}

impl From<ObjectResource> for ObjectEntry {
    fn from(object: ObjectResource) -> Self {
        Self { name: object.name }
    }
}

impl Client {
    /// List every object under `prefix`, following page tokens
    pub async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectEntry>> {
        let token = self.access_token().await?;
        let url = self.objects_url();
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("prefix", prefix.to_string())];
            if let Some(ref page) = page_token {
                query.push(("pageToken", page.clone()));
            }

            let response = self
                .http()
                .get(&url)
                .bearer_auth(&token)
                .query(&query)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(AppError::Storage(format!(
                    "Listing {} failed with status {}",
                    prefix,
                    response.status()
                )));
            }

            let page: ListObjectsResponse = response.json().await?;
            entries.extend(page.items.into_iter().map(ObjectEntry::from));

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        tracing::debug!("Listed {} objects under {}", entries.len(), prefix);
        Ok(entries)
    }

    /// Download an object's bytes, `None` if it does not exist
    pub async fn get_object(&self, key: &str) -> Result<Option<Bytes>> {
        let token = self.access_token().await?;
        let response = self
            .http()
            .get(self.object_url(key))
            .bearer_auth(&token)
            .query(&[("alt", "media")])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.bytes().await?)),
            status => Err(AppError::Storage(format!(
                "Download of {} failed with status {}",
                key, status
            ))),
        }
    }

    /// Metadata request without the body
    pub async fn object_exists(&self, key: &str) -> Result<bool> {
        let token = self.access_token().await?;
        let response = self
            .http()
            .get(self.object_url(key))
            .bearer_auth(&token)
            .query(&[("fields", "name")])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(AppError::Storage(format!(
                "Metadata lookup of {} failed with status {}",
                key, status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_page() {
        let page: ListObjectsResponse = serde_json::from_str(
            r#"{
                "kind": "storage#objects",
                "nextPageToken": "abc",
                "items": [
                    {"name": "images/1/dog.JPG", "size": "2048"},
                    {"name": "images/3/cat.jpeg"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));

        let entries: Vec<ObjectEntry> = page.items.into_iter().map(ObjectEntry::from).collect();
        assert_eq!(entries[0].name, "images/1/dog.JPG");
        assert_eq!(entries[1].name, "images/3/cat.jpeg");
    }

    #[test]
    fn test_parse_empty_page() {
        let page: ListObjectsResponse =
            serde_json::from_str(r#"{"kind": "storage#objects"}"#).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
