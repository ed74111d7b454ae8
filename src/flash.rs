//! One-shot messages carried across a redirect in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const FLASH_COOKIE: &str = "folio_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    fn as_str(self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(FlashKind::Success),
            "error" => Some(FlashKind::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// Queue a message for the next rendered page
pub fn set(jar: CookieJar, kind: FlashKind, message: &str) -> CookieJar {
    let value = format!("{}:{}", kind.as_str(), urlencoding::encode(message));
    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .build(),
    )
}

pub fn success(jar: CookieJar, message: &str) -> CookieJar {
    set(jar, FlashKind::Success, message)
}

pub fn error(jar: CookieJar, message: &str) -> CookieJar {
    set(jar, FlashKind::Error, message)
}

/// Read and clear the pending message, if any
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };

    let flash = cookie.value().split_once(':').and_then(|(kind, msg)| {
        Some(Flash {
            kind: FlashKind::parse(kind)?,
            message: urlencoding::decode(msg).ok()?.into_owned(),
        })
    });

    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, flash)
}
