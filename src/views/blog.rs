use maud::{html, Markup};

use super::{display_date, paragraphs, Layout};
use crate::models::{BlogPost, Comment};

const EXCERPT_CHARS: usize = 280;

fn excerpt(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head.trim_end())
    } else {
        head
    }
}

pub fn index(layout: &Layout<'_>, posts: &[BlogPost]) -> Markup {
    layout.render(
        "Blog",
        html! {
            h1 { "Blog" }
            @if posts.is_empty() {
                p.empty { "No posts yet." }
            }
            @for post in posts {
                article.post-summary {
                    h2 { a href={ "/blog/post/" (post.id) } { (post.title) } }
                    p.meta {
                        time datetime=(post.created_at) { (display_date(&post.created_at)) }
                        " · " (post.comment_count) " comments"
                    }
                    p { (excerpt(&post.content)) }
                }
            }
        },
    )
}

pub fn post(layout: &Layout<'_>, post: &BlogPost, comments: &[Comment]) -> Markup {
    layout.render(
        &post.title,
        html! {
            article.post {
                h1 { (post.title) }
                p.meta {
                    "By " (post.author_name) " on "
                    time datetime=(post.created_at) { (display_date(&post.created_at)) }
                }
                (paragraphs(&post.content))
            }
            section.comments {
                h2 { "Comments (" (comments.len()) ")" }
                @for comment in comments {
                    div.comment {
                        p.meta {
                            strong { (comment.author_name) }
                            " "
                            time datetime=(comment.created_at) { (display_date(&comment.created_at)) }
                        }
                        (paragraphs(&comment.content))
                    }
                }
                form.comment-form method="post" action={ "/blog/post/" (post.id) "/comment" } {
                    h3 { "Leave a comment" }
                    label { "Name" input type="text" name="authorName" required; }
                    label { "Email" input type="email" name="authorEmail" required; }
                    label { "Comment" textarea name="content" rows="5" maxlength="2000" required {} }
                    button type="submit" { "Post comment" }
                }
            }
        },
    )
}
