use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{BlogPost, Comment, CommentForm, UpdatePost};
use crate::services::profanity;

/// Posts shown on the public blog index
pub const DEFAULT_POST_LIMIT: i64 = 10;

const MAX_COMMENT_LENGTH: usize = 2000;

/// Fixed-width timestamps so text ordering matches time ordering
fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Blog post and comment service
pub struct BlogService;

impl BlogService {
    /// Create a new post
    pub async fn create_post(
        db: &Database,
        title: &str,
        content: &str,
        author_email: &str,
        author_name: &str,
        published: bool,
    ) -> Result<BlogPost> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(AppError::Validation(
                "Title and content are required".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let now = now();

        sqlx::query(
            r#"
            INSERT INTO blog_posts (id, title, content, author_email, author_name, created_at, updated_at, published, comment_count)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(&id)
        .bind(title)
        .bind(content)
        .bind(author_email)
        .bind(author_name)
        .bind(&now)
        .bind(&now)
        .bind(published)
        .execute(db.pool())
        .await?;

        tracing::info!("Created post {} ({})", id, title);
        Self::get_post(db, &id).await
    }

    /// Most recent published posts, newest first
    pub async fn list_posts(db: &Database, limit: i64) -> Result<Vec<BlogPost>> {
        let posts = sqlx::query_as(
            "SELECT * FROM blog_posts WHERE published = 1 ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(db.pool())
        .await?;
        Ok(posts)
    }

    /// Every post including drafts, for the admin dashboard
    pub async fn list_all_posts(db: &Database) -> Result<Vec<BlogPost>> {
        let posts = sqlx::query_as("SELECT * FROM blog_posts ORDER BY created_at DESC, rowid DESC")
            .fetch_all(db.pool())
            .await?;
        Ok(posts)
    }

    /// Get a post by ID
    pub async fn get_post(db: &Database, id: &str) -> Result<BlogPost> {
        sqlx::query_as("SELECT * FROM blog_posts WHERE id = ?")
            .bind(id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    /// Apply the non-empty fields of `update`; `updated_at` always moves
    pub async fn update_post(db: &Database, id: &str, update: UpdatePost) -> Result<BlogPost> {
        let current = Self::get_post(db, id).await?;

        let title = update
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or(current.title);
        let content = update
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or(current.content);
        let published = update.published.unwrap_or(current.published);

        sqlx::query(
            "UPDATE blog_posts SET title = ?, content = ?, published = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&title)
        .bind(&content)
        .bind(published)
        .bind(now())
        .bind(id)
        .execute(db.pool())
        .await?;

        Self::get_post(db, id).await
    }

    /// Delete a post together with all of its comments
    pub async fn delete_post(db: &Database, id: &str) -> Result<()> {
        let mut tx = db.pool().begin().await?;

        let removed = sqlx::query("DELETE FROM comments WHERE post_id = ?")
            .bind(id)
            .execute(tx.as_mut())
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
            .bind(id)
            .execute(tx.as_mut())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        tx.commit().await?;
        tracing::info!("Deleted post {} and {} comments", id, removed);
        Ok(())
    }

    /// Validate, censor and store a comment, bumping the post's count
    pub async fn add_comment(db: &Database, post_id: &str, form: CommentForm) -> Result<Comment> {
        let author_name = form.author_name.trim();
        let author_email = form.author_email.trim();
        let content = form.content.trim();

        if author_name.is_empty() || author_email.is_empty() || content.is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }
        if !author_email.contains('@') {
            return Err(AppError::Validation("Invalid email address".to_string()));
        }
        if content.chars().count() > MAX_COMMENT_LENGTH {
            return Err(AppError::Validation(format!(
                "Comments are limited to {} characters",
                MAX_COMMENT_LENGTH
            )));
        }

        let id = Uuid::new_v4().to_string();
        let clean_name = profanity::censor(author_name);
        let clean_content = profanity::censor(content);

        let mut tx = db.pool().begin().await?;

        let updated = sqlx::query(
            "UPDATE blog_posts SET comment_count = comment_count + 1 WHERE id = ? AND published = 1",
        )
        .bind(post_id)
        .execute(tx.as_mut())
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_name, author_email, content, created_at, approved)
            VALUES (?, ?, ?, ?, ?, ?, 1)
            "#,
        )
        .bind(&id)
        .bind(post_id)
        .bind(&clean_name)
        .bind(author_email)
        .bind(&clean_content)
        .bind(now())
        .execute(tx.as_mut())
        .await?;

        let comment: Comment = sqlx::query_as("SELECT * FROM comments WHERE id = ?")
            .bind(&id)
            .fetch_one(tx.as_mut())
            .await?;

        tx.commit().await?;
        tracing::info!("Added comment {} to post {}", id, post_id);
        Ok(comment)
    }

    /// Approved comments for a post, oldest first
    pub async fn list_comments(db: &Database, post_id: &str) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as(
            "SELECT * FROM comments WHERE post_id = ? AND approved = 1 ORDER BY created_at ASC, rowid ASC",
        )
        .bind(post_id)
        .fetch_all(db.pool())
        .await?;
        Ok(comments)
    }

    /// Latest comments across all posts, for moderation
    pub async fn recent_comments(db: &Database, limit: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as(
            "SELECT * FROM comments ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(db.pool())
        .await?;
        Ok(comments)
    }

    /// Delete a comment and decrement its post's count.
    /// Returns the post the comment belonged to.
    pub async fn delete_comment(db: &Database, comment_id: &str) -> Result<String> {
        let mut tx = db.pool().begin().await?;

        let post_id: String = sqlx::query_scalar("SELECT post_id FROM comments WHERE id = ?")
            .bind(comment_id)
            .fetch_optional(tx.as_mut())
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(comment_id)
            .execute(tx.as_mut())
            .await?;

        sqlx::query("UPDATE blog_posts SET comment_count = comment_count - 1 WHERE id = ?")
            .bind(&post_id)
            .execute(tx.as_mut())
            .await?;

        tx.commit().await?;
        tracing::info!("Deleted comment {} from post {}", comment_id, post_id);
        Ok(post_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(name: &str, content: &str) -> CommentForm {
        CommentForm {
            author_name: name.to_string(),
            author_email: "reader@example.com".to_string(),
            content: content.to_string(),
        }
    }

    async fn post(db: &Database, title: &str, published: bool) -> BlogPost {
        BlogService::create_post(db, title, "Body", "me@example.com", "Me", published)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list_posts() {
        let db = Database::in_memory().await.unwrap();
        let first = post(&db, "First", true).await;
        let _draft = post(&db, "Draft", false).await;
        let second = post(&db, "Second", true).await;

        assert_eq!(first.comment_count, 0);
        assert!(first.published);

        let listed: Vec<String> = BlogService::list_posts(&db, DEFAULT_POST_LIMIT)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(listed, vec![second.id.clone(), first.id.clone()]);

        assert_eq!(BlogService::list_all_posts(&db).await.unwrap().len(), 3);
        assert_eq!(BlogService::list_posts(&db, 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_post_requires_fields() {
        let db = Database::in_memory().await.unwrap();
        let err = BlogService::create_post(&db, "  ", "Body", "a@b.c", "A", true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_post_keeps_empty_fields() {
        let db = Database::in_memory().await.unwrap();
        let original = post(&db, "Title", true).await;

        let updated = BlogService::update_post(
            &db,
            &original.id,
            UpdatePost {
                title: Some("".to_string()),
                content: Some("New body".to_string()),
                published: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.title, "Title");
        assert_eq!(updated.content, "New body");
        assert!(updated.published);
        assert!(updated.updated_at >= original.updated_at);

        let missing = BlogService::update_post(&db, "nope", UpdatePost::default()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_comment_censors_and_counts() {
        let db = Database::in_memory().await.unwrap();
        let p = post(&db, "Post", true).await;

        let stored = BlogService::add_comment(&db, &p.id, comment("Shit Head", "this is shit"))
            .await
            .unwrap();
        assert_eq!(stored.author_name, "**** Head");
        assert_eq!(stored.content, "this is ****");
        assert!(stored.approved);

        BlogService::add_comment(&db, &p.id, comment("Ann", "Nice"))
            .await
            .unwrap();

        let p = BlogService::get_post(&db, &p.id).await.unwrap();
        assert_eq!(p.comment_count, 2);

        let comments = BlogService::list_comments(&db, &p.id).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id, stored.id);
    }

    #[tokio::test]
    async fn test_add_comment_validation_leaves_count() {
        let db = Database::in_memory().await.unwrap();
        let p = post(&db, "Post", true).await;

        let err = BlogService::add_comment(&db, &p.id, comment("", "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut bad_email = comment("Ann", "hello");
        bad_email.author_email = "not-an-email".to_string();
        assert!(BlogService::add_comment(&db, &p.id, bad_email).await.is_err());

        let err = BlogService::add_comment(&db, "missing", comment("Ann", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let p = BlogService::get_post(&db, &p.id).await.unwrap();
        assert_eq!(p.comment_count, 0);
    }

    #[tokio::test]
    async fn test_delete_comment_decrements() {
        let db = Database::in_memory().await.unwrap();
        let p = post(&db, "Post", true).await;
        let c1 = BlogService::add_comment(&db, &p.id, comment("A", "one")).await.unwrap();
        BlogService::add_comment(&db, &p.id, comment("B", "two")).await.unwrap();

        let post_id = BlogService::delete_comment(&db, &c1.id).await.unwrap();
        assert_eq!(post_id, p.id);
        assert_eq!(BlogService::get_post(&db, &p.id).await.unwrap().comment_count, 1);

        let again = BlogService::delete_comment(&db, &c1.id).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
        assert_eq!(BlogService::get_post(&db, &p.id).await.unwrap().comment_count, 1);
    }

    #[tokio::test]
    async fn test_delete_post_removes_comments() {
        let db = Database::in_memory().await.unwrap();
        let p = post(&db, "Post", true).await;
        BlogService::add_comment(&db, &p.id, comment("A", "one")).await.unwrap();

        BlogService::delete_post(&db, &p.id).await.unwrap();
        assert!(matches!(
            BlogService::get_post(&db, &p.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(BlogService::recent_comments(&db, 10).await.unwrap().is_empty());
        assert!(matches!(
            BlogService::delete_post(&db, &p.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
