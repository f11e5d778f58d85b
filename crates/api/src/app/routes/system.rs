use axum::Json;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Anything outside the gateway routes.
pub async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": format!("no route for {}", uri.path()),
        })),
    )
        .into_response()
}
