use maud::{html, Markup};

use super::{display_date, script, Layout};
use crate::config::IdentityConfig;
use crate::models::{BlogPost, Comment};

const FIREBASE_SDK: &str = "https://www.gstatic.com/firebasejs/10.12.2";

/// Signs in with the provider popup, then trades the ID token for a session
const LOGIN_SCRIPT: &str = r#"
(function () {
  var cfg = document.getElementById('identity').dataset;
  var status = document.getElementById('login-status');
  firebase.initializeApp({ apiKey: cfg.apiKey, authDomain: cfg.authDomain, projectId: cfg.projectId });
  document.getElementById('login-button').addEventListener('click', function () {
    status.textContent = 'Signing in...';
    firebase.auth().signInWithPopup(new firebase.auth.GoogleAuthProvider())
      .then(function (result) { return result.user.getIdToken(); })
      .then(function (idToken) {
        return fetch('/admin/auth', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          credentials: 'same-origin',
          body: JSON.stringify({ idToken: idToken })
        });
      })
      .then(function (res) { return res.json(); })
      .then(function (body) {
        if (body.success) { window.location.href = '/admin'; }
        else { status.textContent = body.error || 'Not authorized'; }
      })
      .catch(function (err) { status.textContent = err.message; });
  });
})();
"#;

pub fn login(layout: &Layout<'_>, identity: &IdentityConfig) -> Markup {
    layout.render(
        "Admin login",
        html! {
            section.login {
                h1 { "Admin" }
                div #identity
                    data-api-key=(identity.api_key)
                    data-auth-domain=(identity.auth_domain)
                    data-project-id=(identity.project_id) {}
                button #login-button type="button" { "Sign in with Google" }
                p #login-status {}
                noscript {
                    form method="post" action="/admin" {
                        label { "ID token" input type="text" name="idToken"; }
                        button type="submit" { "Sign in" }
                    }
                }
            }
            script src={ (FIREBASE_SDK) "/firebase-app-compat.js" } {}
            script src={ (FIREBASE_SDK) "/firebase-auth-compat.js" } {}
            (script(LOGIN_SCRIPT))
        },
    )
}

pub fn dashboard(layout: &Layout<'_>, posts: &[BlogPost], comments: &[Comment]) -> Markup {
    layout.render(
        "Dashboard",
        html! {
            h1 { "Dashboard" }
            p { a.button href="/admin/post/new" { "New post" } }
            section {
                h2 { "Posts" }
                table {
                    thead { tr { th { "Title" } th { "Status" } th { "Comments" } th { "Created" } th {} } }
                    tbody {
                        @for post in posts {
                            tr {
                                td { a href={ "/blog/post/" (post.id) } { (post.title) } }
                                td { @if post.published { "Published" } @else { "Draft" } }
                                td { (post.comment_count) }
                                td { (display_date(&post.created_at)) }
                                td.actions {
                                    a href={ "/admin/post/" (post.id) "/edit" } { "Edit" }
                                    form.inline method="post" action={ "/admin/post/" (post.id) "/delete" } {
                                        button type="submit" { "Delete" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            section {
                h2 { "Recent comments" }
                @if comments.is_empty() {
                    p.empty { "No comments." }
                }
                @for comment in comments {
                    div.comment {
                        p.meta {
                            strong { (comment.author_name) }
                            " <" (comment.author_email) "> on "
                            a href={ "/blog/post/" (comment.post_id) } { "post" }
                        }
                        p { (comment.content) }
                        form.inline method="post" action={ "/admin/comment/" (comment.id) "/delete" } {
                            button type="submit" { "Delete" }
                        }
                    }
                }
            }
        },
    )
}

/// Editor for a new post (`post = None`) or an existing one
pub fn editor(layout: &Layout<'_>, post: Option<&BlogPost>) -> Markup {
    let (heading, action) = match post {
        Some(p) => ("Edit post", format!("/admin/post/{}/edit", p.id)),
        None => ("New post", "/admin/post/new".to_string()),
    };
    let published = post.map_or(true, |p| p.published);

    layout.render(
        heading,
        html! {
            h1 { (heading) }
            form.editor method="post" action=(action) {
                label { "Title"
                    input type="text" name="title" required value=[post.map(|p| p.title.as_str())];
                }
                label { "Content"
                    textarea name="content" rows="18" required {
                        @if let Some(p) = post { (p.content) }
                    }
                }
                label.checkbox {
                    input type="checkbox" name="published" value="on" checked[published];
                    "Published"
                }
                button type="submit" { "Save" }
                " "
                a href="/admin" { "Cancel" }
            }
        },
    )
}
