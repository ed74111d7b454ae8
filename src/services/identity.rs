use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::config::IdentityConfig;
use crate::error::{AppError, Result};
use crate::models::VerifiedIdentity;

/// Verifies ID tokens minted by the external identity provider
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity>;
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
    #[serde(default)]
    name: Option<String>,
}

/// Firebase Authentication ID token verifier
pub struct FirebaseVerifier {
    http: reqwest::Client,
    project_id: String,
    jwks_url: String,
}

impl FirebaseVerifier {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            project_id: config.project_id.clone(),
            jwks_url: config.jwks_url.clone(),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("https://securetoken.google.com/{}", self.project_id)]);
        validation
    }

    async fn fetch_keys(&self) -> Result<JwkSet> {
        let keys = self
            .http
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;
        Ok(keys)
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity> {
        if self.project_id.is_empty() {
            return Err(AppError::Internal(
                "Identity provider project is not configured".to_string(),
            ));
        }

        let header = decode_header(id_token)?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::Unauthorized("Token has no key id".to_string()))?;

        let keys = self.fetch_keys().await?;
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| AppError::Unauthorized("Unknown signing key".to_string()))?;
        let key = DecodingKey::from_jwk(jwk)?;

        let claims = decode::<IdTokenClaims>(id_token, &key, &self.validation())?.claims;

        if claims.email_verified == Some(false) {
            return Err(AppError::Unauthorized("Email address not verified".to_string()));
        }
        let email = claims
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Token carries no email".to_string()))?;

        Ok(VerifiedIdentity {
            name: claims.name.unwrap_or_else(|| email.clone()),
            email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_project_rejected() {
        let verifier = FirebaseVerifier::new(&IdentityConfig::default());
        let err = verifier.verify("a.b.c").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_malformed_token_rejected_before_network() {
        let verifier = FirebaseVerifier::new(&IdentityConfig {
            project_id: "my-site".to_string(),
            jwks_url: "http://127.0.0.1:9/unreachable".to_string(),
            ..IdentityConfig::default()
        });
        let err = verifier.verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AppError::Jwt(_)));
    }
}
