use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, ErrorBody, Result};
use crate::models::{ImageListResponse, ImageQuery, ImageRef, TransformRequest};
use crate::services::ImageService;
use crate::AppState;

/// Validate `q` and `w`. Quality is clamped, a zero width is rejected.
pub fn transform_request(query: &ImageQuery, default_quality: u8) -> Result<TransformRequest> {
    if query.w == Some(0) {
        return Err(AppError::Validation("Width must be greater than zero".to_string()));
    }
    let quality = query
        .q
        .map(|q| q.clamp(1, 100) as u8)
        .unwrap_or(default_quality);
    Ok(TransformRequest::new(quality, query.w))
}

/// Map the outcome of an image request onto the wire: JPEG bytes on
/// success, a plain-text body otherwise.
pub fn emit(result: Result<Vec<u8>>) -> Response {
    match result {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response(),
        Err(e) => {
            let status = match e {
                AppError::NotFound(_) => StatusCode::NOT_FOUND,
                AppError::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                e.public_message(),
            )
                .into_response()
        }
    }
}

async fn render(state: &AppState, image_ref: ImageRef, query: &ImageQuery) -> Result<Vec<u8>> {
    let request = transform_request(query, state.config.images.default_quality)?;
    let source = ImageService::resolve(
        state.local_images.as_ref(),
        state.blob_store.as_deref(),
        &state.config.images.bucket_prefix,
        &image_ref,
    )
    .await?;
    ImageService::optimize(state.transformer, source, request).await
}

/// Optimize an image from the local image directory
/// GET /images/optimized/*path?q=&w=
pub async fn optimized_image(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<ImageQuery>,
) -> Response {
    emit(render(&state, ImageRef::Filename(path), &query).await)
}

/// Optimize a gallery image from the blob store
/// GET /images/:id?q=&w=
pub async fn image_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ImageQuery>,
) -> Response {
    let result = match id.parse::<u64>() {
        Ok(id) => render(&state, ImageRef::Id(id), &query).await,
        Err(_) => Err(AppError::NotFound("Image not found".to_string())),
    };
    emit(result)
}

/// Gallery listing
/// GET /api/images
pub async fn list_images(State(state): State<AppState>) -> Response {
    let result = match state.blob_store.as_deref() {
        Some(store) => ImageService::list_images(store, &state.config.images.bucket_prefix).await,
        None => Err(AppError::StoreUnavailable),
    };

    match result {
        Ok(images) => Json(ImageListResponse { images }).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: e.public_message(),
            }),
        )
            .into_response(),
    }
}
