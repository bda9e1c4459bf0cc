pub mod dto;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use handlers::rest;
use service::NoteService;

/// REST router serving the notes collection at `/notes`.
pub fn router(service: NoteService) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/notes", get(rest::get_all_notes).post(rest::create_note))
        .route(
            "/notes/{id}",
            get(rest::get_one_note)
                .put(rest::update_note)
                .delete(rest::delete_note),
        )
        .route("/api-doc/openapi.json", get(rest::openapi_json))
        .with_state(Arc::new(service))
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Response {
    (StatusCode::OK, "Hello from mock notes API!").into_response()
}
