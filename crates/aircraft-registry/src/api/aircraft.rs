//! `/api/aircraft` routes.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::model::Aircraft;

use super::form::read_form;
use super::{ApiError, AppState};

/// Collection path.
pub const COLLECTION_PATH: &str = "/api/aircraft";

/// Aircraft CRUD routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(COLLECTION_PATH, get(list_aircraft).post(create_aircraft))
        .route(
            "/api/aircraft/{id}",
            get(get_aircraft).put(update_aircraft).delete(delete_aircraft),
        )
}

async fn list_aircraft(State(svc): State<AppState>) -> Result<Json<Vec<Aircraft>>, ApiError> {
    let records = svc
        .list()
        .await
        .map_err(|e| ApiError::failed("Failed to fetch aircraft", &e))?;
    debug!("Listing {} aircraft", records.len());
    Ok(Json(records))
}

async fn create_aircraft(
    State(svc): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let form = read_form(multipart)
        .await
        .map_err(|e| ApiError::failed("Invalid form submission", &e))?;
    let id = svc
        .create(form)
        .await
        .map_err(|e| ApiError::failed("Failed to save aircraft", &e))?;
    Ok(Json(json!({
        "success": true,
        "id": id,
        "message": "Aircraft saved successfully",
    })))
}

async fn get_aircraft(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let aircraft = svc
        .get(&id)
        .await
        .map_err(|e| ApiError::failed("Failed to fetch aircraft", &e))?
        .ok_or_else(ApiError::not_found)?;

    let mut body = serde_json::to_value(&aircraft)
        .map_err(|e| ApiError::failed("Failed to fetch aircraft", &e.into()))?;
    if let Value::Object(map) = &mut body {
        map.insert("success".to_string(), Value::Bool(true));
    }
    Ok(Json(body))
}

async fn update_aircraft(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let form = read_form(multipart)
        .await
        .map_err(|e| ApiError::failed("Invalid form submission", &e))?;
    svc.update(&id, form)
        .await
        .map_err(|e| ApiError::failed("Failed to update aircraft", &e))?;
    Ok(Json(json!({ "success": true, "message": "Aircraft updated" })))
}

async fn delete_aircraft(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    svc.delete(&id)
        .await
        .map_err(|e| ApiError::failed("Failed to delete aircraft", &e))?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Aircraft {id} deleted"),
    })))
}
