use axum::{Router, routing::get};
use crate::{AppState, controllers::users_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route(
        "/v1/users",
        get(users_controller::list_users).post(users_controller::create_user),
    )
}
