use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::Config;
use crate::models::AdminSession;
use crate::services::AuthService;
use crate::AppState;

pub const SESSION_COOKIE: &str = "folio_session";

/// Admin session carried by the request cookies, if it is still valid
pub fn current_admin(jar: &CookieJar, config: &Config) -> Option<AdminSession> {
    let token = jar.get(SESSION_COOKIE)?;
    match AuthService::validate_session(token.value(), config) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::debug!("Ignoring session cookie: {}", e);
            None
        }
    }
}

/// Attach a freshly issued session token
pub fn with_session(jar: CookieJar, config: &Config, token: String) -> CookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, token))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(config.session.cookie_secure)
            .path("/")
            .build(),
    )
}

pub fn without_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Admin gate
/// Validates the session cookie on every request and redirects to the
/// login page when it is missing, expired, or no longer the admin's.
pub async fn admin_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());

    let Some(session) = current_admin(&jar, &state.config) else {
        tracing::warn!("Unauthenticated request to {}", request.uri().path());
        return Redirect::to("/admin").into_response();
    };

    request.extensions_mut().insert(session);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VerifiedIdentity;
    use crate::test_helpers::test_config;

    #[test]
    fn test_current_admin_from_cookie() {
        let config = test_config();
        let token = AuthService::issue_session(
            &config,
            &VerifiedIdentity {
                email: "admin@example.com".to_string(),
                name: "Admin".to_string(),
            },
        )
        .unwrap();

        let jar = with_session(CookieJar::new(), &config, token);
        let session = current_admin(&jar, &config).unwrap();
        assert_eq!(session.email, "admin@example.com");

        assert!(current_admin(&without_session(jar), &config).is_none());
        let forged = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "forged"));
        assert!(current_admin(&forged, &config).is_none());
    }
}
