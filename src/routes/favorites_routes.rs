use axum::{Router, routing::post};
use crate::{AppState, controllers::favorites_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/v1/favorites/:user_id", post(favorites_controller::create_favorite))
}
