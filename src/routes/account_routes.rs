use axum::{Router, routing::{delete, get, post}};

use crate::{AppState, controllers::account_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/accounts/create", post(account_controller::post_create_account))
        .route("/api/accounts/:id/info", get(account_controller::get_account_info))
        .route("/api/accounts/:id/update", post(account_controller::post_update_account))
        .route("/api/accounts/:id/delete", delete(account_controller::delete_account))
        .route("/api/accounts/:id/balance", get(account_controller::get_current_balance))
        .route("/api/accounts/:id/balance-by-date", get(account_controller::get_balance_by_date))
}
