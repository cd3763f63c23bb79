use std::collections::HashMap;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Response,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    AppState,
    api_key::ApiKey,
    error::ApiError,
    models::StayWindow,
    services::liteapi::HotelSearch,
};

use super::{envelope, pagination};

fn required<'a>(params: &'a HashMap<String, String>, name: &str) -> Result<&'a str, ApiError> {
    params
        .get(name)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("{name} parameter is required")))
}

// GET /v1/hotels?countryCode=..&cityName=..
pub async fn list_hotels(
    State(state): State<AppState>,
    Extension(ApiKey(key)): Extension<ApiKey>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let country_code = required(&params, "countryCode")?;
    let city_name = required(&params, "cityName")?;
    let (offset, limit) = pagination(
        params.get("offset").map(String::as_str),
        params.get("limit").map(String::as_str),
    )?;

    let search = HotelSearch {
        country_code: country_code.to_string(),
        city_name: city_name.to_string(),
        offset,
        limit,
    };

    let hotels = state
        .liteapi
        .with_api_key(&key)
        .search_hotels(&search)
        .await
        .map_err(|e| {
            tracing::error!(country_code, city_name, "hotel search failed: {e}");
            ApiError::new(StatusCode::BAD_GATEWAY, "failed to fetch hotels from LiteAPI")
        })?;

    Ok(envelope(
        StatusCode::OK,
        json!({
            "total": hotels.len(),
            "hotels": hotels,
            "offset": offset,
            "limit": limit,
        }),
    ))
}

// GET /v1/hotels/:hotel_id
pub async fn get_hotel_price(
    State(state): State<AppState>,
    Extension(ApiKey(key)): Extension<ApiKey>,
    Path(hotel_id): Path<String>,
) -> Result<Response, ApiError> {
    let hotel_id = hotel_id.trim();
    if hotel_id.is_empty() {
        return Err(ApiError::bad_request("hotel_id parameter is required"));
    }

    let now = Utc::now();
    let window = StayWindow::starting(
        now,
        state.settings.monitor.lookahead_days,
        state.settings.monitor.stay_nights,
    )
    .ok_or_else(|| {
        tracing::error!(hotel_id, "stay window out of calendar range");
        ApiError::internal("failed to compute stay dates")
    })?;

    let client = state.liteapi.with_api_key(&key);
    let price = client.min_rate(hotel_id, &window).await.map_err(|e| {
        tracing::error!(hotel_id, "min-rate lookup failed: {e}");
        ApiError::new(StatusCode::BAD_GATEWAY, "failed to get hotel rates")
    })?;

    let Some(price) = price else {
        return Err(ApiError::not_found("no price data found for this hotel"));
    };

    let upstream = client.settings();
    Ok(envelope(
        StatusCode::OK,
        json!({
            "hotel_id": hotel_id,
            "hotel_name": format!("Hotel {hotel_id}"),
            "price": price,
            "currency": upstream.currency,
            "check_in": window.check_in_str(),
            "check_out": window.check_out_str(),
            "adults": upstream.adults,
            "updated_at": now.to_rfc3339(),
        }),
    ))
}
