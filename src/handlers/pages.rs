use axum::{extract::State, response::{IntoResponse, Response}};
use axum_extra::extract::cookie::CookieJar;

use super::{error_page, layout};
use crate::flash;
use crate::services::{BlogService, ImageService};
use crate::views;
use crate::AppState;

const HOME_POST_LIMIT: i64 = 3;

/// Portfolio home: gallery plus the latest posts
/// GET /
pub async fn home(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, flash) = flash::take(jar);
    let layout = layout(&state, &jar, flash.as_ref());

    // A missing or failing store still renders the page, just without the gallery
    let images = match state.blob_store.as_deref() {
        Some(store) => ImageService::list_images(store, &state.config.images.bucket_prefix)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Gallery listing failed: {}", e);
                Vec::new()
            }),
        None => Vec::new(),
    };

    match BlogService::list_posts(&state.db, HOME_POST_LIMIT).await {
        Ok(posts) => (jar, views::pages::home(&layout, &images, &posts)).into_response(),
        Err(e) => error_page(&layout, e),
    }
}

/// Liveness probe
/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}
