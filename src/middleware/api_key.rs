use axum::{
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Upstream API key supplied by the caller, forwarded as-is.
#[derive(Debug, Clone)]
pub struct ApiKey(pub String);

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// `X-API-KEY`, falling back to `Authorization`.
pub fn extract_api_key(headers: &HeaderMap) -> Option<ApiKey> {
    header_value(headers, "X-API-KEY")
        .or_else(|| header_value(headers, "Authorization"))
        .map(ApiKey)
}

pub async fn require_api_key(mut req: Request<axum::body::Body>, next: Next) -> Response {
    match extract_api_key(req.headers()) {
        Some(key) => {
            // Store the key so handlers can forward it upstream
            req.extensions_mut().insert(key);
            next.run(req).await
        }
        None => ApiError::new(StatusCode::UNAUTHORIZED, "API key is required").into_response(),
    }
}
