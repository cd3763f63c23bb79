use axum::{Router, routing::get};
use crate::{AppState, controllers::health_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/v1/healthcheck", get(health_controller::healthcheck))
}
