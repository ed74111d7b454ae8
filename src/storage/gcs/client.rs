//! Authenticated client for one bucket

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};

pub const API_BASE: &str = "https://storage.googleapis.com/storage/v1";
const READ_ONLY_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_only";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Refresh this long before the provider's expiry
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// GCS client
pub struct Client {
    http: reqwest::Client,
    bucket: String,
    client_email: String,
    private_key: String,
    token_uri: String,
    token: Mutex<Option<CachedToken>>,
}

impl Client {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            bucket: config.bucket.clone(),
            client_email: config.client_email.clone(),
            private_key: config.private_key.clone(),
            token_uri: config.token_uri.clone(),
            token: Mutex::new(None),
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// `.../b/{bucket}/o`
    pub fn objects_url(&self) -> String {
        format!("{}/b/{}/o", API_BASE, urlencoding::encode(&self.bucket))
    }

    /// `.../b/{bucket}/o/{key}` with the key fully escaped, `/` included
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.objects_url(), urlencoding::encode(key))
    }

    /// Bearer token for the service account, reusing the cached one while valid
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.token.clone());
            }
        }

        let fresh = self.fetch_token().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    async fn fetch_token(&self) -> Result<CachedToken> {
        let assertion = self.sign_assertion(Utc::now())?;

        let response = self
            .http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "Token exchange failed: {} {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = (token.expires_in - TOKEN_REFRESH_MARGIN_SECS).max(0);
        tracing::debug!("Obtained storage access token valid for {}s", token.expires_in);

        Ok(CachedToken {
            token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(lifetime),
        })
    }

    /// RS256 assertion exchanged for an access token
    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| AppError::Storage(format!("Invalid service account key: {}", e)))?;

        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: READ_ONLY_SCOPE,
            aud: &self.token_uri,
            iat,
            exp: iat + 3600,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| AppError::Storage(format!("Failed to sign token assertion: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        let config = StorageConfig {
            bucket: "my-site.appspot.com".to_string(),
            ..StorageConfig::default()
        };
        Client::new(&config)
    }

    #[test]
    fn test_object_url_escapes_key() {
        assert_eq!(
            client().object_url("images/3/cat photo.jpeg"),
            "https://storage.googleapis.com/storage/v1/b/my-site.appspot.com/o/images%2F3%2Fcat%20photo.jpeg"
        );
    }

    #[test]
    fn test_invalid_private_key_is_storage_error() {
        let err = client().sign_assertion(Utc::now()).unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
