use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{AdminSession, SessionClaims, VerifiedIdentity};
use crate::services::IdentityVerifier;

/// Admin authentication service
pub struct AuthService;

impl AuthService {
    /// Whether `email` is the configured admin address
    pub fn is_admin(config: &Config, email: &str) -> bool {
        let admin = config.admin.email.trim();
        !admin.is_empty() && admin.eq_ignore_ascii_case(email.trim())
    }

    /// Verify an identity provider token and open an admin session.
    /// Returns the session and its signed cookie value.
    pub async fn login(
        verifier: &dyn IdentityVerifier,
        config: &Config,
        id_token: &str,
    ) -> Result<(AdminSession, String)> {
        let identity = verifier.verify(id_token).await?;

        if !Self::is_admin(config, &identity.email) {
            tracing::warn!("Rejected admin login for {}", identity.email);
            return Err(AppError::Forbidden("Not authorized".to_string()));
        }

        let token = Self::issue_session(config, &identity)?;
        tracing::info!("Admin session opened for {}", identity.email);
        Ok((
            AdminSession {
                email: identity.email,
                name: identity.name,
            },
            token,
        ))
    }

    /// Sign a session token for a verified admin
    pub fn issue_session(config: &Config, identity: &VerifiedIdentity) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(config.session.expire_hours as i64);

        let claims = SessionClaims {
            sub: identity.email.clone(),
            name: identity.name.clone(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.session.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Validate a session token: signature, expiry, and that its subject is
    /// still the configured admin
    pub fn validate_session(token: &str, config: &Config) -> Result<AdminSession> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let claims = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(config.session.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| AppError::Unauthorized("Invalid session".to_string()))?
        .claims;

        if !Self::is_admin(config, &claims.sub) {
            return Err(AppError::Forbidden("Not authorized".to_string()));
        }

        Ok(AdminSession::from(claims))
    }
}
