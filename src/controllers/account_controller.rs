use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    error::LedgerError,
    models::AccountDto,
    services::account_service,
    AppState,
};

use super::params::{self, UsernameBody};

pub const DELETE_STATUS: &str = "Account deleted successfully!";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStatus {
    pub delete_status: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentBalance {
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub current_balance: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAtDate {
    pub date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub account_balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

// POST /api/accounts/create
pub async fn post_create_account(
    State(state): State<AppState>,
    body: Result<Json<UsernameBody>, JsonRejection>,
) -> Result<Json<AccountDto>, LedgerError> {
    let username = params::username(params::json_body(body)?)?;

    let acc = account_service::create_account(&state, &username).await?;
    Ok(Json(AccountDto::from_parts(&acc, &[])))
}

// GET /api/accounts/:id/info
pub async fn get_account_info(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<AccountDto>, LedgerError> {
    let id = params::account_id(id)?;
    Ok(Json(account_service::find_account_dto(&state, id).await?))
}

// POST /api/accounts/:id/update
pub async fn post_update_account(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<UsernameBody>, JsonRejection>,
) -> Result<Json<AccountDto>, LedgerError> {
    let id = params::account_id(id)?;
    let username = params::username(params::json_body(body)?)?;

    Ok(Json(account_service::update_account(&state, id, &username).await?))
}

// DELETE /api/accounts/:id/delete
pub async fn delete_account(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteStatus>, LedgerError> {
    let id = params::account_id(id)?;
    account_service::delete_account(&state, id).await?;

    Ok(Json(DeleteStatus {
        delete_status: DELETE_STATUS.to_string(),
    }))
}

// GET /api/accounts/:id/balance
pub async fn get_current_balance(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<CurrentBalance>, LedgerError> {
    let id = params::account_id(id)?;
    let current_balance = account_service::current_balance(&state, id).await?;

    Ok(Json(CurrentBalance { current_balance }))
}

// GET /api/accounts/:id/balance-by-date?date=
pub async fn get_balance_by_date(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    q: Result<Query<DateQuery>, QueryRejection>,
) -> Result<Json<BalanceAtDate>, LedgerError> {
    let id = params::account_id(id)?;
    let q = params::query(q)?;
    let date = params::timestamp("date", q.date.as_deref())?;

    let account_balance = account_service::balance_at_date(&state, id, date).await?;
    Ok(Json(BalanceAtDate { date, account_balance }))
}
