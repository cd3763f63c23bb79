pub mod health_controller;
pub mod hotels_controller;
pub mod users_controller;
pub mod favorites_controller;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::error::ApiError;

pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

/// Wraps a payload in the `{"data": ...}` envelope.
pub(crate) fn envelope(status: StatusCode, data: Value) -> Response {
    (status, Json(json!({ "data": data }))).into_response()
}

/// Parses `offset` / `limit` query values. Absent values take the defaults.
pub(crate) fn pagination(offset: Option<&str>, limit: Option<&str>) -> Result<(u32, u32), ApiError> {
    let offset = match offset.filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| ApiError::bad_request("invalid offset parameter"))?,
        None => 0,
    };

    let limit = match limit.filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .ok_or_else(|| ApiError::bad_request("invalid limit parameter (must be between 1 and 100)"))?,
        None => DEFAULT_LIMIT,
    };

    Ok((offset, limit))
}
