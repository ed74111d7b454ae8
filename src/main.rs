mod config;
mod db;
mod error;
mod flash;
mod handlers;
mod imaging;
mod middleware;
mod models;
mod services;
mod storage;
mod views;

#[cfg(test)]
mod test_helpers;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::imaging::ImageTransformer;
use crate::services::{FirebaseVerifier, IdentityVerifier};
use crate::storage::{build_blob_store, LocalStorage, StorageProvider};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    /// `None` when no bucket is configured; `/images/:id` then reports the
    /// store as unavailable
    pub blob_store: Option<Arc<dyn StorageProvider>>,
    pub local_images: Arc<LocalStorage>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub transformer: ImageTransformer,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Folio...");

    // Load configuration
    let config = Config::load()?;
    let config = Arc::new(config);
    tracing::info!("Configuration loaded");

    // Initialize database
    let db = Database::new(&config.database.path).await?;
    db.run_migrations().await?;
    tracing::info!("Database initialized");

    let blob_store = build_blob_store(&config.storage);
    if let Some(store) = &blob_store {
        tracing::info!("Blob store ready ({})", store.storage_type());
    }
    let local_images = Arc::new(LocalStorage::new(&config.images.local_dir));
    tracing::info!("Serving local images from {:?}", local_images.base_path());
    let identity: Arc<dyn IdentityVerifier> = Arc::new(FirebaseVerifier::new(&config.identity));

    let state = AppState {
        db,
        config: config.clone(),
        blob_store,
        local_images,
        identity,
        transformer: ImageTransformer::new(),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(state: AppState) -> Router {
    // The JSON API is read-only and public
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/images", get(handlers::image::list_images))
        .layer(cors);

    let public_routes = Router::new()
        .route("/", get(handlers::pages::home))
        .route("/healthz", get(handlers::pages::healthz))
        // Images
        .route("/images/optimized/*path", get(handlers::image::optimized_image))
        .route("/images/:id", get(handlers::image::image_by_id))
        // Blog
        .route("/blog", get(handlers::blog::blog_index))
        .route("/blog/post/:id", get(handlers::blog::view_post))
        .route("/blog/post/:id/comment", post(handlers::blog::add_comment))
        // Admin login
        .route(
            "/admin",
            get(handlers::admin::dashboard).post(handlers::admin::login_form),
        )
        .route("/admin/auth", post(handlers::admin::auth))
        .route("/admin/logout", post(handlers::admin::logout));

    let admin_routes = Router::new()
        .route(
            "/admin/post/new",
            get(handlers::admin::new_post_form).post(handlers::admin::create_post),
        )
        .route(
            "/admin/post/:id/edit",
            get(handlers::admin::edit_post_form).post(handlers::admin::update_post),
        )
        .route("/admin/post/:id/delete", post(handlers::admin::delete_post))
        .route(
            "/admin/comment/:id/delete",
            post(handlers::admin::delete_comment),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::admin_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .nest("/api", api_routes)
        .nest_service("/content/static", ServeDir::new(&state.config.site.static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
