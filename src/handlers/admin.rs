use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use axum_extra::extract::cookie::CookieJar;

use super::{error_page, layout};
use crate::error::AppError;
use crate::flash;
use crate::middleware::auth::{current_admin, with_session, without_session};
use crate::models::{
    AdminAuthRequest, AdminAuthResponse, AdminLoginForm, AdminSession, PostForm, UpdatePost,
};
use crate::services::{AuthService, BlogService};
use crate::views;
use crate::AppState;

const RECENT_COMMENTS: i64 = 20;

/// Dashboard for the admin, login page for everyone else
/// GET /admin
pub async fn dashboard(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, flash) = flash::take(jar);
    let layout = layout(&state, &jar, flash.as_ref());

    if current_admin(&jar, &state.config).is_none() {
        return (jar, views::admin::login(&layout, &state.config.identity)).into_response();
    }

    let posts = match BlogService::list_all_posts(&state.db).await {
        Ok(posts) => posts,
        Err(e) => return error_page(&layout, e),
    };
    match BlogService::recent_comments(&state.db, RECENT_COMMENTS).await {
        Ok(comments) => (jar, views::admin::dashboard(&layout, &posts, &comments)).into_response(),
        Err(e) => error_page(&layout, e),
    }
}

/// Form fallback for clients that post the ID token directly
/// POST /admin
pub async fn login_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AdminLoginForm>,
) -> Response {
    let to_admin = Redirect::to("/admin");
    if form.id_token.trim().is_empty() {
        return (flash::error(jar, "Missing ID token"), to_admin).into_response();
    }

    match AuthService::login(state.identity.as_ref(), &state.config, form.id_token.trim()).await {
        Ok((session, token)) => {
            let jar = with_session(jar, &state.config, token);
            let jar = flash::success(jar, &format!("Welcome back, {}", session.name));
            (jar, to_admin).into_response()
        }
        Err(e) => (flash::error(jar, &e.public_message()), to_admin).into_response(),
    }
}

/// Exchange an identity provider ID token for an admin session
/// POST /admin/auth
pub async fn auth(
    State(state): State<AppState>,
    jar: CookieJar,
    req: std::result::Result<Json<AdminAuthRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match req {
        Ok(req) => req,
        Err(rejection) => {
            tracing::warn!("Malformed admin auth request: {}", rejection.body_text());
            return auth_failure(StatusCode::BAD_REQUEST, "Missing or malformed idToken".to_string());
        }
    };

    match AuthService::login(state.identity.as_ref(), &state.config, &req.id_token).await {
        Ok((_, token)) => (
            with_session(jar, &state.config, token),
            Json(AdminAuthResponse {
                success: true,
                error: None,
            }),
        )
            .into_response(),
        Err(e) => {
            let status = match e {
                AppError::Forbidden(_) => StatusCode::FORBIDDEN,
                AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            auth_failure(status, e.public_message())
        }
    }
}

fn auth_failure(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(AdminAuthResponse {
            success: false,
            error: Some(message),
        }),
    )
        .into_response()
}

/// POST /admin/logout
pub async fn logout(jar: CookieJar) -> Response {
    let jar = flash::success(without_session(jar), "Logged out");
    (jar, Redirect::to("/")).into_response()
}

/// GET /admin/post/new
pub async fn new_post_form(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, flash) = flash::take(jar);
    let layout = layout(&state, &jar, flash.as_ref());
    (jar, views::admin::editor(&layout, None)).into_response()
}

/// POST /admin/post/new
pub async fn create_post(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminSession>,
    jar: CookieJar,
    Form(form): Form<PostForm>,
) -> Response {
    let result = BlogService::create_post(
        &state.db,
        &form.title,
        &form.content,
        &admin.email,
        &admin.name,
        form.is_published(),
    )
    .await;

    match result {
        Ok(post) => (
            flash::success(jar, &format!("Created \"{}\"", post.title)),
            Redirect::to("/admin"),
        )
            .into_response(),
        Err(e) => (
            flash::error(jar, &e.public_message()),
            Redirect::to("/admin/post/new"),
        )
            .into_response(),
    }
}

/// GET /admin/post/:id/edit
pub async fn edit_post_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Response {
    let (jar, flash) = flash::take(jar);
    let layout = layout(&state, &jar, flash.as_ref());

    match BlogService::get_post(&state.db, &id).await {
        Ok(post) => (jar, views::admin::editor(&layout, Some(&post))).into_response(),
        Err(e) => error_page(&layout, e),
    }
}

/// POST /admin/post/:id/edit
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
    Form(form): Form<PostForm>,
) -> Response {
    match BlogService::update_post(&state.db, &id, UpdatePost::from(form)).await {
        Ok(post) => (
            flash::success(jar, &format!("Saved \"{}\"", post.title)),
            Redirect::to("/admin"),
        )
            .into_response(),
        Err(e) => (
            flash::error(jar, &e.public_message()),
            Redirect::to(&format!("/admin/post/{}/edit", urlencoding::encode(&id))),
        )
            .into_response(),
    }
}

/// POST /admin/post/:id/delete
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Response {
    let jar = match BlogService::delete_post(&state.db, &id).await {
        Ok(()) => flash::success(jar, "Post deleted"),
        Err(e) => flash::error(jar, &e.public_message()),
    };
    (jar, Redirect::to("/admin")).into_response()
}

/// POST /admin/comment/:id/delete
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Response {
    let jar = match BlogService::delete_comment(&state.db, &id).await {
        Ok(_) => flash::success(jar, "Comment deleted"),
        Err(e) => flash::error(jar, &e.public_message()),
    };
    (jar, Redirect::to("/admin")).into_response()
}
