use axum::{http::StatusCode, response::Response};
use serde::Serialize;

use crate::shared::http::response_envelope::ApiResponse;

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

/// GET /health
pub async fn health_route() -> Response {
    ApiResponse::success(Health { status: "ok" }).into_response_with_status(StatusCode::OK)
}
