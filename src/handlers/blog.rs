use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;

use super::{error_page, layout};
use crate::error::AppError;
use crate::flash;
use crate::middleware::auth::current_admin;
use crate::models::CommentForm;
use crate::services::blog::DEFAULT_POST_LIMIT;
use crate::services::BlogService;
use crate::views;
use crate::AppState;

/// Latest published posts
/// GET /blog
pub async fn blog_index(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, flash) = flash::take(jar);
    let layout = layout(&state, &jar, flash.as_ref());

    match BlogService::list_posts(&state.db, DEFAULT_POST_LIMIT).await {
        Ok(posts) => (jar, views::blog::index(&layout, &posts)).into_response(),
        Err(e) => error_page(&layout, e),
    }
}

/// Single post with its approved comments. Drafts are visible to the admin only.
/// GET /blog/post/:id
pub async fn view_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Response {
    let (jar, flash) = flash::take(jar);
    let layout = layout(&state, &jar, flash.as_ref());

    let post = match BlogService::get_post(&state.db, &id).await {
        Ok(post) if post.published || current_admin(&jar, &state.config).is_some() => post,
        Ok(_) => return error_page(&layout, AppError::NotFound("Post not found".to_string())),
        Err(e) => return error_page(&layout, e),
    };

    match BlogService::list_comments(&state.db, &post.id).await {
        Ok(comments) => (jar, views::blog::post(&layout, &post, &comments)).into_response(),
        Err(e) => error_page(&layout, e),
    }
}

/// Submit a comment, then return to the post
/// POST /blog/post/:id/comment
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
    Form(form): Form<CommentForm>,
) -> Response {
    let back = Redirect::to(&format!("/blog/post/{}", urlencoding::encode(&id)));

    match BlogService::add_comment(&state.db, &id, form).await {
        Ok(_) => (flash::success(jar, "Thanks, your comment was posted"), back).into_response(),
        Err(AppError::Validation(msg)) => {
            tracing::warn!("Rejected comment on {}: {}", id, msg);
            (flash::error(jar, &msg), back).into_response()
        }
        Err(e @ AppError::NotFound(_)) => {
            let layout = layout(&state, &jar, None);
            error_page(&layout, e)
        }
        Err(e) => {
            let msg = e.public_message();
            (flash::error(jar, &format!("Could not save comment: {}", msg)), back).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_state;
    use axum::{body::to_bytes, http::{header, StatusCode}};

    fn comment(name: &str, email: &str, content: &str) -> Form<CommentForm> {
        Form(CommentForm {
            author_name: name.to_string(),
            author_email: email.to_string(),
            content: content.to_string(),
        })
    }

    async fn html_of(response: Response) -> String {
        String::from_utf8(to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_comment_flow() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), false).await;
        let post = BlogService::create_post(&state.db, "Hello", "World", "admin@example.com", "Admin", true)
            .await
            .unwrap();

        let response = add_comment(
            State(state.clone()),
            Path(post.id.clone()),
            CookieJar::new(),
            comment("Sam", "sam@example.com", "Lovely shots"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], format!("/blog/post/{}", post.id));
        assert_eq!(BlogService::get_post(&state.db, &post.id).await.unwrap().comment_count, 1);

        let page = view_post(State(state.clone()), Path(post.id.clone()), CookieJar::new()).await;
        assert_eq!(page.status(), StatusCode::OK);
        assert!(html_of(page).await.contains("Lovely shots"));

        // Invalid input flashes and leaves the count alone
        let response = add_comment(
            State(state.clone()),
            Path(post.id.clone()),
            CookieJar::new(),
            comment("Sam", "not-an-email", "Hi"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .starts_with(flash::FLASH_COOKIE));
        assert_eq!(BlogService::get_post(&state.db, &post.id).await.unwrap().comment_count, 1);
    }

    #[tokio::test]
    async fn test_missing_and_draft_posts_are_404() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), false).await;
        let draft = BlogService::create_post(&state.db, "Draft", "Soon", "admin@example.com", "Admin", false)
            .await
            .unwrap();

        let page = view_post(State(state.clone()), Path("missing".to_string()), CookieJar::new()).await;
        assert_eq!(page.status(), StatusCode::NOT_FOUND);
        let page = view_post(State(state.clone()), Path(draft.id.clone()), CookieJar::new()).await;
        assert_eq!(page.status(), StatusCode::NOT_FOUND);

        let response = add_comment(
            State(state),
            Path(draft.id),
            CookieJar::new(),
            comment("Sam", "sam@example.com", "Early bird"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_control_characters_in_id() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), false).await;

        let response = add_comment(
            State(state.clone()),
            Path("x\ny".to_string()),
            CookieJar::new(),
            comment("Sam", "sam@example.com", "Hello"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = add_comment(
            State(state),
            Path("x\ny".to_string()),
            CookieJar::new(),
            comment("Sam", "no-at-sign", "Hello"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/blog/post/x%0Ay");
    }

    #[tokio::test]
    async fn test_blog_index() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), false).await;
        BlogService::create_post(&state.db, "Visible", "x", "admin@example.com", "Admin", true)
            .await
            .unwrap();
        BlogService::create_post(&state.db, "Hidden", "x", "admin@example.com", "Admin", false)
            .await
            .unwrap();

        let html = html_of(blog_index(State(state), CookieJar::new()).await).await;
        assert!(html.contains("Visible"));
        assert!(!html.contains("Hidden"));
    }
}
