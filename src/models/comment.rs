use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Comment model
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    pub created_at: String,
    pub approved: bool,
}

/// Comment form posted from a blog post page
#[derive(Debug, Clone, Deserialize)]
pub struct CommentForm {
    #[serde(default, rename = "authorName")]
    pub author_name: String,
    #[serde(default, rename = "authorEmail")]
    pub author_email: String,
    #[serde(default)]
    pub content: String,
}
