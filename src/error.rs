use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Startup configuration problems. Any of these aborts the process.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Failure of a call to the upstream rate / static-data API.
#[derive(Error, Debug)]
pub enum PriceLookupError {
    #[error("failed to reach upstream: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse upstream response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Hotel name could not be resolved. Callers downgrade this to a placeholder.
#[derive(Error, Debug)]
pub enum NameResolutionError {
    #[error(transparent)]
    Lookup(#[from] PriceLookupError),

    #[error("hotel details carry no name")]
    MissingName,
}

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(String),

    #[error("{0} already exists")]
    Duplicate(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),
}

impl From<mongodb::error::Error> for RepositoryError {
    fn from(e: mongodb::error::Error) -> Self {
        RepositoryError::Database(e.to_string())
    }
}

/// Why a whole scan cycle was abandoned.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("could not list favorites: {0}")]
    Listing(#[from] RepositoryError),

    #[error("stay window out of range ({lookahead_days} days ahead, {stay_nights} nights)")]
    WindowOutOfRange { lookahead_days: u64, stay_nights: u64 },
}

/// Why a single favorite produced no verdict in a scan cycle.
#[derive(Error, Debug)]
pub enum FavoriteSkip {
    #[error("no price data for hotel {hotel_id}")]
    NoPriceData { hotel_id: String },

    #[error("price lookup failed for hotel {hotel_id}: {source}")]
    Lookup {
        hotel_id: String,
        #[source]
        source: PriceLookupError,
    },
}

/// Error returned by HTTP handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
