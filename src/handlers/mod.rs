pub mod admin;
pub mod blog;
pub mod image;
pub mod pages;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::error::AppError;
use crate::flash::Flash;
use crate::middleware::auth::current_admin;
use crate::views::{self, Layout};
use crate::AppState;

/// Page chrome for the current request
pub(crate) fn layout<'a>(state: &'a AppState, jar: &CookieJar, flash: Option<&'a Flash>) -> Layout<'a> {
    Layout {
        site_title: &state.config.site.title,
        flash,
        is_admin: current_admin(jar, &state.config).is_some(),
    }
}

/// HTML error page with the status the error maps to
pub(crate) fn error_page(layout: &Layout<'_>, err: AppError) -> Response {
    let status = err.status();
    let heading = match status {
        StatusCode::NOT_FOUND => "Not found",
        StatusCode::BAD_REQUEST => "Bad request",
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "Not allowed",
        _ => "Something went wrong",
    };
    (status, views::error_page(layout, heading, &err.public_message())).into_response()
}
