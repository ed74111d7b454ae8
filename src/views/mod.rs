//! Server-rendered pages.

pub mod admin;
pub mod blog;
pub mod pages;

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::flash::{Flash, FlashKind};

/// Shared page chrome
pub struct Layout<'a> {
    pub site_title: &'a str,
    pub flash: Option<&'a Flash>,
    pub is_admin: bool,
}

impl Layout<'_> {
    pub fn render(&self, title: &str, body: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (title) " | " (self.site_title) }
                    link rel="stylesheet" href="/content/static/css/site.css";
                }
                body {
                    header.site-header {
                        a.brand href="/" { (self.site_title) }
                        nav {
                            a href="/" { "Portfolio" }
                            a href="/blog" { "Blog" }
                            @if self.is_admin {
                                a href="/admin" { "Dashboard" }
                                form.inline method="post" action="/admin/logout" {
                                    button type="submit" { "Log out" }
                                }
                            }
                        }
                    }
                    @if let Some(flash) = self.flash {
                        div class=(flash_class(flash.kind)) role="status" { (flash.message) }
                    }
                    main { (body) }
                }
            }
        }
    }
}

fn flash_class(kind: FlashKind) -> &'static str {
    match kind {
        FlashKind::Success => "flash flash-success",
        FlashKind::Error => "flash flash-error",
    }
}

/// Short date for post listings, falling back to the raw timestamp
pub fn display_date(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

/// Post body as paragraphs split on blank lines. Content is escaped.
pub fn paragraphs(text: &str) -> Markup {
    html! {
        @for para in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            p {
                @for (i, line) in para.lines().enumerate() {
                    @if i > 0 { br; }
                    (line)
                }
            }
        }
    }
}

pub fn error_page(layout: &Layout<'_>, heading: &str, message: &str) -> Markup {
    layout.render(
        heading,
        html! {
            section.error {
                h1 { (heading) }
                p { (message) }
                p { a href="/" { "Back to the portfolio" } }
            }
        },
    )
}

/// Inline script with no interpolation
pub(crate) fn script(source: &'static str) -> Markup {
    html! { script { (PreEscaped(source)) } }
}
