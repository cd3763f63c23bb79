use axum::{http::StatusCode, response::{IntoResponse, Response}};
use serde_json::json;

use crate::error::ApiError;

use super::envelope;

pub async fn healthcheck() -> Response {
    envelope(
        StatusCode::OK,
        json!({
            "status": "available",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

pub async fn not_found() -> Response {
    ApiError::not_found("the requested resource could not be found").into_response()
}
