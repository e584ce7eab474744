use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{error::ErrorBody, AppState};

fn error_reply(status: StatusCode, message: &str) -> impl IntoResponse {
    (
        status,
        Json(ErrorBody {
            code: status.as_u16(),
            message: message.to_string(),
        }),
    )
}

pub async fn not_found() -> impl IntoResponse {
    error_reply(StatusCode::NOT_FOUND, "Not found!")
}

pub async fn method_not_allowed() -> impl IntoResponse {
    error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed!")
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn health_db(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "store: ok".to_string()).into_response(),
        Err(e) => {
            tracing::error!("store ping failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("store error: {}", e),
            )
                .into_response()
        }
    }
}
