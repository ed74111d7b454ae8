use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Blog post model
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_email: String,
    pub author_name: String,
    pub created_at: String,
    pub updated_at: String,
    pub published: bool,
    pub comment_count: i64,
}

/// New post submitted from the admin editor
#[derive(Debug, Clone, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// HTML checkboxes are absent when unchecked
    #[serde(default)]
    pub published: Option<String>,
}

impl PostForm {
    pub fn is_published(&self) -> bool {
        self.published.is_some()
    }
}

/// Partial update; empty fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

impl From<PostForm> for UpdatePost {
    fn from(form: PostForm) -> Self {
        let published = Some(form.is_published());
        Self {
            title: Some(form.title).filter(|t| !t.trim().is_empty()),
            content: Some(form.content).filter(|c| !c.trim().is_empty()),
            published,
        }
    }
}
