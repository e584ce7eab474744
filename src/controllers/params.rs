//! Parsing of path, query and body values into domain types. Every failure
//! becomes a `LedgerError` so it is answered with the usual error body.

use std::str::FromStr;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    Json,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{error::LedgerError, models::OperationType};

const MAX_USERNAME_LEN: usize = 100;

#[derive(Debug, Deserialize)]
pub struct UsernameBody {
    #[serde(default)]
    pub username: Option<String>,
}

pub fn account_id(path: Result<Path<String>, PathRejection>) -> Result<ObjectId, LedgerError> {
    let Ok(Path(raw)) = path else {
        return Err(LedgerError::bad_request("Invalid account id!"));
    };
    ObjectId::parse_str(raw.trim()).map_err(|_| LedgerError::bad_request("Invalid account id!"))
}

pub fn query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, LedgerError> {
    match query {
        Ok(Query(v)) => Ok(v),
        Err(e) => Err(LedgerError::bad_request(format!("Invalid query string: {}", e.body_text()))),
    }
}

pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, LedgerError> {
    match body {
        Ok(Json(v)) => Ok(v),
        Err(e) => Err(LedgerError::bad_request(format!("Invalid request body: {}", e.body_text()))),
    }
}

pub fn username(body: UsernameBody) -> Result<String, LedgerError> {
    let name = body.username.as_deref().map(str::trim).unwrap_or("");

    if name.is_empty() {
        return Err(LedgerError::bad_request("Username must not be empty!"));
    }
    if name.chars().count() > MAX_USERNAME_LEN {
        return Err(LedgerError::bad_request(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters!"
        )));
    }
    Ok(name.to_string())
}

fn required<'a>(name: &str, raw: Option<&'a str>) -> Result<&'a str, LedgerError> {
    match raw.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(LedgerError::bad_request(format!("Missing parameter '{name}'!"))),
    }
}

pub fn amount(raw: Option<&str>) -> Result<Decimal, LedgerError> {
    let raw = required("amount", raw)?;
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| LedgerError::bad_request("Invalid parameter 'amount'!"))
}

pub fn operation_type(raw: Option<&str>) -> Result<OperationType, LedgerError> {
    required("type", raw)?.parse()
}

/// Accepts RFC 3339 (`2024-05-01T10:00:00Z`) or a zone-less ISO-8601
/// date-time (`2024-05-01T10:00:00`), the latter read as UTC.
pub fn timestamp(name: &str, raw: Option<&str>) -> Result<DateTime<Utc>, LedgerError> {
    // an unescaped '+' in a query string arrives as a space
    let raw = required(name, raw)?.replace(' ', "+");

    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()))
        .map_err(|_| LedgerError::bad_request(format!("Invalid parameter '{name}'!")))
}
