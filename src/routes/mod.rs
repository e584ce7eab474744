use axum::Router;
use axum::middleware::from_fn_with_state;
use tower_http::trace::TraceLayer;

use crate::{AppState, controllers::home_controller};

pub mod home_routes;
pub mod account_routes;
pub mod operation_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = account_routes::add_routes(router);
    let router = operation_routes::add_routes(router);

    router
        .fallback(home_controller::not_found)
        .method_not_allowed_fallback(home_controller::method_not_allowed)
        .layer(from_fn_with_state(state.clone(), crate::error_status::apply_error_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
