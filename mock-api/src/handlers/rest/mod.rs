use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
    service::NoteService,
};

#[derive(OpenApi)]
#[openapi(
    paths(create_note, update_note, delete_note, get_one_note, get_all_notes),
    components(schemas(NoteResponse, CreateNoteRequest, UpdateNoteRequest)),
    tags(
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json("Not found")).into_response()
}

/// IDs travel as strings; anything that is not a number cannot exist.
fn parse_id(id: &str) -> Option<u64> {
    id.parse().ok()
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    Json(payload): Json<CreateNoteRequest>,
) -> Response {
    let note = service.create_note(payload).await;
    tracing::info!("Created note {}", note.id);
    (StatusCode::CREATED, Json(note)).into_response()
}

#[utoipa::path(
    put,
    path = "/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 404, description = "Note not found")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateNoteRequest>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found();
    };
    match service.update_note(id, payload).await {
        Some(note) => (StatusCode::OK, Json(note)).into_response(),
        None => not_found(),
    }
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted, record returned", body = NoteResponse),
        (status = 404, description = "Note not found")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found();
    };
    match service.delete_note(id).await {
        Some(note) => (StatusCode::OK, Json(note)).into_response(),
        None => not_found(),
    }
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(
        ("id" = String, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found();
    };
    match service.get_one_note(id).await {
        Some(note) => (StatusCode::OK, Json(note)).into_response(),
        None => not_found(),
    }
}

#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "List of all notes", body = Vec<NoteResponse>)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    (StatusCode::OK, Json(service.get_all_notes().await)).into_response()
}

#[debug_handler]
pub async fn openapi_json() -> Response {
    (StatusCode::OK, Json(ApiDoc::openapi())).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::{router, service::NoteService};

    async fn call(
        app: axum::Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (u16, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn create_returns_string_id_and_timestamp() {
        let app = router(NoteService::default());

        let (status, body) = call(
            app,
            "POST",
            "/notes",
            Some(json!({ "title": "A", "content": "B" })),
        )
        .await;

        assert_eq!(status, 201);
        assert_eq!(body["id"], "1");
        assert_eq!(body["title"], "A");
        assert!(body["createdAt"].as_str().is_some_and(|s| s.ends_with('Z')));
    }

    #[tokio::test]
    async fn update_merges_partial_body() {
        let service = NoteService::default();
        call(
            router(service.clone()),
            "POST",
            "/notes",
            Some(json!({ "title": "A", "content": "B" })),
        )
        .await;

        let (status, body) = call(
            router(service),
            "PUT",
            "/notes/1",
            Some(json!({ "content": "C" })),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["title"], "A");
        assert_eq!(body["content"], "C");
    }

    #[tokio::test]
    async fn unknown_and_non_numeric_ids_are_not_found() {
        let service = NoteService::default();
        for (method, uri) in [
            ("GET", "/notes/5"),
            ("GET", "/notes/abc"),
            ("DELETE", "/notes/5"),
        ] {
            let (status, _) = call(router(service.clone()), method, uri, None).await;
            assert_eq!(status, 404, "{method} {uri}");
        }

        let (status, _) = call(
            router(service),
            "PUT",
            "/notes/5",
            Some(json!({ "title": "x" })),
        )
        .await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn delete_removes_note() {
        let service = NoteService::default();
        call(
            router(service.clone()),
            "POST",
            "/notes",
            Some(json!({ "title": "A", "content": "B" })),
        )
        .await;

        let (status, body) = call(router(service.clone()), "DELETE", "/notes/1", None).await;
        assert_eq!(status, 200);
        assert_eq!(body["id"], "1");

        let (_, list) = call(router(service), "GET", "/notes", None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn serves_openapi_document() {
        let app = router(NoteService::default());
        let (status, body) = call(app, "GET", "/api-doc/openapi.json", None).await;
        assert_eq!(status, 200);
        assert!(body["paths"]["/notes"].is_object());
    }
}
