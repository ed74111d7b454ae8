use serde::{Deserialize, Serialize};

/// Claims carried by the signed admin session cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // admin email
    pub name: String,
    pub iat: usize,
    pub exp: usize,
}

/// Authenticated admin (inserted by the session middleware)
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub email: String,
    pub name: String,
}

impl From<SessionClaims> for AdminSession {
    fn from(claims: SessionClaims) -> Self {
        Self {
            email: claims.sub,
            name: claims.name,
        }
    }
}

/// Identity asserted by the external identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub email: String,
    pub name: String,
}

/// `POST /admin/auth` body
#[derive(Debug, Deserialize)]
pub struct AdminAuthRequest {
    #[serde(rename = "idToken")]
    pub id_token: String,
}

/// `POST /admin` form fallback
#[derive(Debug, Deserialize)]
pub struct AdminLoginForm {
    #[serde(default, rename = "idToken")]
    pub id_token: String,
}

#[derive(Debug, Serialize)]
pub struct AdminAuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
