use maud::{html, Markup};

use super::{display_date, Layout};
use crate::models::{BlogPost, ImageEntry};

pub fn home(layout: &Layout<'_>, images: &[ImageEntry], posts: &[BlogPost]) -> Markup {
    layout.render(
        "Portfolio",
        html! {
            section.gallery {
                h1 { "Portfolio" }
                @if images.is_empty() {
                    p.empty { "No images yet." }
                } @else {
                    div.grid {
                        @for image in images {
                            figure {
                                a href={ "/images/" (image.id) } {
                                    img src={ "/images/" (image.id) "?w=480&q=70" }
                                        alt=(image.title) loading="lazy";
                                }
                                figcaption { (image.title) }
                            }
                        }
                    }
                }
            }
            section.latest-posts {
                h2 { "Latest posts" }
                @if posts.is_empty() {
                    p.empty { "Nothing published yet." }
                }
                ul {
                    @for post in posts {
                        li {
                            a href={ "/blog/post/" (post.id) } { (post.title) }
                            " "
                            time datetime=(post.created_at) { (display_date(&post.created_at)) }
                        }
                    }
                }
                p { a href="/blog" { "All posts" } }
            }
        },
    )
}
