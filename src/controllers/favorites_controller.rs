use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    error::{ApiError, RepositoryError},
    services::favorite_service,
};

use super::envelope;

#[derive(Debug, Deserialize)]
pub struct CreateFavoriteRequest {
    #[serde(default)]
    pub hotel_id: String,
    #[serde(default)]
    pub target_price: Option<f64>,
}

// POST /v1/favorites/:user_id
pub async fn create_favorite(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Result<Json<CreateFavoriteRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let user_id = ObjectId::parse_str(user_id.trim())
        .map_err(|_| ApiError::bad_request("invalid user_id parameter"))?;

    let Json(req) = body.map_err(|_| ApiError::bad_request("invalid JSON"))?;

    let hotel_id = req.hotel_id.trim();
    if hotel_id.is_empty() {
        return Err(ApiError::bad_request("hotel_id is required"));
    }

    let target_price = req
        .target_price
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| ApiError::bad_request("target_price is required and must be greater than 0"))?;

    let favorite = favorite_service::create_favorite(&state, user_id, hotel_id, target_price)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound(_) => ApiError::not_found("user not found"),
            RepositoryError::Duplicate(_) => ApiError::new(StatusCode::CONFLICT, "hotel already in favorites"),
            RepositoryError::Database(msg) => {
                tracing::error!(user_id = %user_id, "create favorite failed: {msg}");
                ApiError::internal("database error")
            }
        })?;

    Ok(envelope(StatusCode::CREATED, json!({ "favorite": favorite.to_json() })))
}
