//! Server-rendered aircraft pages.
//!
//! Pages are plain HTML with two small scripts: one handles deletes on the
//! list page, the other submits the create/edit form as multipart to the API.

pub mod render;
pub mod view;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tracing::error;

use crate::api::AppState;

/// Path of the list page.
pub const LIST_PAGE_PATH: &str = "/aircraft";

/// Path of the list page script.
pub const LIST_SCRIPT_PATH: &str = "/assets/aircraft-list.js";

/// Path of the form page script.
pub const FORM_SCRIPT_PATH: &str = "/assets/aircraft-form.js";

const LIST_SCRIPT: &str = include_str!("web/aircraft-list.js");
const FORM_SCRIPT: &str = include_str!("web/aircraft-form.js");

/// UI page and script routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to(LIST_PAGE_PATH) }))
        .route(LIST_PAGE_PATH, get(list_page))
        .route("/aircraft/rows", get(list_rows))
        .route("/aircraft/create", get(create_page))
        .route("/aircraft/{id}/edit", get(edit_page))
        .route(LIST_SCRIPT_PATH, get(|| async { script(LIST_SCRIPT) }))
        .route(FORM_SCRIPT_PATH, get(|| async { script(FORM_SCRIPT) }))
}

async fn list_page(State(svc): State<AppState>) -> Response {
    match svc.list().await {
        Ok(records) => Html(render::list_page(&view::rows(&records))).into_response(),
        Err(e) => failure(&e),
    }
}

async fn list_rows(State(svc): State<AppState>) -> Response {
    match svc.list().await {
        Ok(records) => Html(render::table_rows(&view::rows(&records))).into_response(),
        Err(e) => failure(&e),
    }
}

async fn create_page() -> Html<String> {
    Html(render::form_page(&view::FormView::create()))
}

async fn edit_page(State(svc): State<AppState>, Path(id): Path<String>) -> Response {
    match svc.get(&id).await {
        Ok(Some(record)) => Html(render::form_page(&view::FormView::edit(&record))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Html(render::not_found_page())).into_response(),
        Err(e) => failure(&e),
    }
}

fn failure(err: &crate::Error) -> Response {
    error!("Failed to load aircraft page: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render::error_page("Failed to fetch aircraft")),
    )
        .into_response()
}

fn script(source: &'static str) -> Response {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        source,
    )
        .into_response()
}
