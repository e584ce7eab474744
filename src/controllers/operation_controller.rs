use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;

use crate::{
    error::LedgerError,
    models::OperationDto,
    services::operation_service,
    AppState,
};

use super::params;

#[derive(Debug, Deserialize)]
pub struct OperationQuery {
    pub amount: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

// POST /api/operations/:account_id/make-operation?amount=&type=
pub async fn post_make_operation(
    State(state): State<AppState>,
    account_id: Result<Path<String>, PathRejection>,
    q: Result<Query<OperationQuery>, QueryRejection>,
) -> Result<Json<OperationDto>, LedgerError> {
    let account_id = params::account_id(account_id)?;
    let q = params::query(q)?;
    let amount = params::amount(q.amount.as_deref())?;
    let kind = params::operation_type(q.kind.as_deref())?;

    let op = operation_service::process_operation(&state, account_id, amount, kind).await?;
    Ok(Json(op))
}

// GET /api/operations/:account_id/get-by-period?from=&to=
pub async fn get_operations_by_period(
    State(state): State<AppState>,
    account_id: Result<Path<String>, PathRejection>,
    q: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<Vec<OperationDto>>, LedgerError> {
    let account_id = params::account_id(account_id)?;
    let q = params::query(q)?;
    let from = params::timestamp("from", q.from.as_deref())?;
    let to = params::timestamp("to", q.to.as_deref())?;

    let ops = operation_service::operations_in_range(&state, account_id, from, to).await?;
    Ok(Json(ops))
}
