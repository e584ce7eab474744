use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::{config::ErrorStatusMode, error::DomainErrorStatus, AppState};

/// Rewrites the status line of domain error responses to 200 when running
/// in legacy mode. The `{code, message}` body is left untouched.
pub async fn apply_error_status(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let mut res = next.run(req).await;

    if state.settings.error_status == ErrorStatusMode::Legacy
        && res.extensions().get::<DomainErrorStatus>().is_some()
    {
        *res.status_mut() = StatusCode::OK;
    }

    res
}
