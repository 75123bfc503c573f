//! JSON HTTP API.
//!
//! Every failure is answered with `{success: false, message, error}` and the
//! status that matches the error kind.

pub mod aircraft;
pub mod files;
pub mod form;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::Error;
use crate::service::AircraftService;

/// Shared application state.
pub type AppState = Arc<AircraftService>;

/// Build the API routes: aircraft CRUD, stored images and health.
pub fn routes(url_prefix: &str) -> Router<AppState> {
    Router::new()
        .merge(aircraft::routes())
        .merge(files::routes(url_prefix))
        .route("/health", get(health))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// JSON error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiError {
    /// Create an error response with a status and a user-facing message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            message: message.into(),
            error: None,
        }
    }

    /// The 404 answer for an absent record.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found")
    }

    /// Attach the underlying error text.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Convert a failed operation into a response and log it.
    ///
    /// `message` describes the operation that failed; the error text is
    /// passed through unchanged.
    pub fn failed(message: &str, err: &Error) -> Self {
        if err.is_not_found() {
            return Self::not_found();
        }
        let status = match err {
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ if err.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("{}: {}", message, err);
        } else {
            warn!("{}: {}", message, err);
        }
        Self::new(status, message).with_error(err.to_string())
    }

    /// HTTP status of this response.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
