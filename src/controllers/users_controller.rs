use std::{collections::HashMap, sync::LazyLock};

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{ApiError, RepositoryError},
    services::user_service,
};

use super::{envelope, pagination};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

fn validate(req: &CreateUserRequest) -> Result<(), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    if req.email.trim().is_empty() {
        return Err(ApiError::bad_request("email is required"));
    }
    if req.password.is_empty() {
        return Err(ApiError::bad_request("password is required"));
    }
    if req.password.chars().count() < 6 {
        return Err(ApiError::bad_request("password must be at least 6 characters"));
    }
    if !is_valid_email(req.email.trim()) {
        return Err(ApiError::bad_request("invalid email format"));
    }
    Ok(())
}

// POST /v1/users
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body.map_err(|_| ApiError::bad_request("invalid JSON"))?;
    validate(&req)?;

    let user = user_service::register_user(&state, req.name.trim(), req.email.trim(), &req.password)
        .await
        .map_err(|e| match e {
            RepositoryError::Duplicate(_) => ApiError::new(StatusCode::CONFLICT, "email already exists"),
            other => {
                tracing::error!("create user failed: {other}");
                ApiError::internal("failed to create user")
            }
        })?;

    Ok(envelope(StatusCode::CREATED, json!({ "user": user.to_json() })))
}

// GET /v1/users?offset=..&limit=..
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let (offset, limit) = pagination(
        params.get("offset").map(String::as_str),
        params.get("limit").map(String::as_str),
    )?;

    let (users, total) = user_service::list_users(&state, offset, limit)
        .await
        .map_err(|e| {
            tracing::error!("list users failed: {e}");
            ApiError::internal("database error")
        })?;

    let users: Vec<Value> = users.iter().map(|u| u.to_json()).collect();

    Ok(envelope(
        StatusCode::OK,
        json!({
            "users": users,
            "total": total,
            "offset": offset,
            "limit": limit,
        }),
    ))
}
