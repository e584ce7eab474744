use axum::{Router, routing::{get, post}};

use crate::{AppState, controllers::operation_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/api/operations/:account_id/make-operation",
            post(operation_controller::post_make_operation),
        )
        .route(
            "/api/operations/:account_id/get-by-period",
            get(operation_controller::get_operations_by_period),
        )
}
