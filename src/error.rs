use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Account not found!")]
    AccountNotFound,

    #[error("Insufficient funds for withdrawal!")]
    InsufficientFunds,

    #[error("Unsupported operation type!")]
    UnsupportedOperationType,

    #[error("Operation amount must be greater than zero!")]
    InvalidAmount,

    #[error("{0}")]
    BadRequest(String),

    #[error("Account was modified concurrently, try again!")]
    Conflict,

    #[error("Internal storage error!")]
    Storage(#[source] StoreError),
}

impl LedgerError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        LedgerError::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            LedgerError::AccountNotFound => StatusCode::NOT_FOUND,
            LedgerError::InsufficientFunds
            | LedgerError::UnsupportedOperationType
            | LedgerError::InvalidAmount
            | LedgerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            LedgerError::Conflict => StatusCode::CONFLICT,
            LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AccountMissing(_) => LedgerError::AccountNotFound,
            StoreError::BalanceMismatch(_) => LedgerError::Conflict,
            other => LedgerError::Storage(other),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

/// Marks a response as a translated domain error. The status line of such
/// responses is decided by the `error_status` middleware.
#[derive(Debug, Clone, Copy)]
pub struct DomainErrorStatus(pub StatusCode);

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            LedgerError::Storage(e) => tracing::error!("storage failure: {e}"),
            other => tracing::warn!(code = status.as_u16(), "request rejected: {other}"),
        }

        let body = ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        };

        let mut res = (status, Json(body)).into_response();
        res.extensions_mut().insert(DomainErrorStatus(status));
        res
    }
}
