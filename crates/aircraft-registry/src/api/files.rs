//! Serving stored images.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::debug;

use super::{ApiError, AppState};

/// Route serving uploaded images under `url_prefix`.
pub fn routes(url_prefix: &str) -> Router<AppState> {
    let path = format!("{}/{{file}}", url_prefix.trim_end_matches('/'));
    Router::new().route(&path, get(serve_image))
}

async fn serve_image(State(svc): State<AppState>, Path(file): Path<String>) -> Response {
    match svc.uploads().read(&file).await {
        Ok(Some(content)) => {
            let mime_type = mime_guess::from_path(&file).first_or_octet_stream().to_string();
            debug!("Serving image {} ({} bytes)", file, content.len());
            (
                [
                    (header::CONTENT_TYPE, mime_type),
                    (header::CACHE_CONTROL, "public, max-age=31536000, immutable".to_string()),
                ],
                content,
            )
                .into_response()
        }
        Ok(None) => ApiError::new(StatusCode::NOT_FOUND, "Image not found").into_response(),
        Err(e) => ApiError::failed("Failed to read image", &e).into_response(),
    }
}
