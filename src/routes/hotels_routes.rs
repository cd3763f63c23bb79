use axum::{Router, middleware::from_fn, routing::get};
use crate::{AppState, api_key::require_api_key, controllers::hotels_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    let hotels = Router::<AppState>::new()
        .route("/v1/hotels", get(hotels_controller::list_hotels))
        .route("/v1/hotels/:hotel_id", get(hotels_controller::get_hotel_price))
        .route_layer(from_fn(require_api_key));

    router.merge(hotels)
}
