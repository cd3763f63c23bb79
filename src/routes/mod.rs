use axum::Router;
use tower_http::trace::TraceLayer;

use crate::{AppState, controllers::health_controller};

pub mod health_routes;
pub mod hotels_routes;
pub mod users_routes;
pub mod favorites_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = health_routes::add_routes(router);
    let router = hotels_routes::add_routes(router);
    let router = users_routes::add_routes(router);
    let router = favorites_routes::add_routes(router);

    router
        .fallback(health_controller::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
