use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Request, StatusCode},
    Router,
};
use chrono::SecondsFormat;
use http_body_util::BodyExt;
use rustledger::{
    config::{self, ErrorStatusMode, StoreKind},
    models::{OperationDto, OperationType},
    routes,
    store::MemoryStore,
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

fn test_state(mode: ErrorStatusMode) -> AppState {
    let mut settings = config::load();
    settings.store = StoreKind::Memory;
    settings.error_status = mode;

    AppState::new(Arc::new(MemoryStore::new()), settings)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if body.is_some() {
        req = req.header(header::CONTENT_TYPE, "application/json");
    }
    let req = req
        .body(axum::body::Body::from(body.unwrap_or("").to_string()))
        .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create_account(app: &Router, username: &str) -> String {
    let body = format!(r#"{{"username":"{username}"}}"#);
    let (_, json) = send(app, "POST", "/api/accounts/create", Some(&body)).await;
    json["id"].as_str().unwrap().to_string()
}

async fn operate(app: &Router, id: &str, amount: &str, kind: &str) -> (StatusCode, Value) {
    let uri = format!("/api/operations/{id}/make-operation?amount={amount}&type={kind}");
    send(app, "POST", &uri, None).await
}

fn iso(dto: &OperationDto) -> String {
    dto.date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[tokio::test]
async fn deposit_returns_operation_with_snapshot() {
    let app = routes::app(test_state(ErrorStatusMode::Legacy));
    let id = create_account(&app, "alice").await;

    let (status, json) = operate(&app, &id, "100.50", "DEPOSIT").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(json["type"], "DEPOSIT");
    assert_eq!(json["amount"].as_f64(), Some(100.5));
    assert_eq!(json["accountBalance"].as_f64(), Some(100.5));
    assert_eq!(json["accountId"], id.as_str());
    assert_eq!(json["description"], "Deposit of: 100.50");
    assert!(json["date"].is_string());
}

#[tokio::test]
async fn amounts_keep_every_decimal_digit() {
    let app = routes::app(test_state(ErrorStatusMode::Legacy));
    let id = create_account(&app, "ivan").await;

    let exact = "9007199254740993.01";
    let (status, json) = operate(&app, &id, exact, "DEPOSIT").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["amount"].to_string(), exact);
    assert_eq!(json["accountBalance"].to_string(), exact);
    assert_eq!(json["description"], format!("Deposit of: {exact}"));

    let op: OperationDto = serde_json::from_value(json).unwrap();
    assert_eq!(op.account_balance, exact.parse::<rust_decimal::Decimal>().unwrap());

    let (_, json) = send(&app, "GET", &format!("/api/accounts/{id}/balance"), None).await;
    assert_eq!(json["currentBalance"].to_string(), exact);

    let (_, json) = send(&app, "GET", &format!("/api/accounts/{id}/info"), None).await;
    assert_eq!(json["balance"].to_string(), exact);
    assert_eq!(json["operationsList"][0]["amount"].to_string(), exact);
}

#[tokio::test]
async fn operation_type_is_case_insensitive() {
    let app = routes::app(test_state(ErrorStatusMode::Legacy));
    let id = create_account(&app, "bob").await;

    operate(&app, &id, "10", "deposit").await;
    let (_, json) = operate(&app, &id, "4", "Withdraw").await;

    let op: OperationDto = serde_json::from_value(json).unwrap();
    assert_eq!(op.kind, OperationType::Withdraw);
    assert_eq!(op.description, "Withdrawal of: 4");
    assert_eq!(op.account_balance, rust_decimal::Decimal::new(6, 0));
}

#[tokio::test]
async fn withdraw_over_balance_is_rejected_without_history() {
    let app = routes::app(test_state(ErrorStatusMode::Legacy));
    let id = create_account(&app, "carol").await;

    operate(&app, &id, "50", "DEPOSIT").await;
    let (status, json) = operate(&app, &id, "50.01", "WITHDRAW").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], 400);
    assert_eq!(json["message"], "Insufficient funds for withdrawal!");

    let (_, json) = send(&app, "GET", &format!("/api/accounts/{id}/info"), None).await;
    assert_eq!(json["balance"].as_f64(), Some(50.0));
    assert_eq!(json["operationsList"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn unsupported_type_is_rejected() {
    let app = routes::app(test_state(ErrorStatusMode::Semantic));
    let id = create_account(&app, "dave").await;

    let (status, json) = operate(&app, &id, "10", "TRANSFER").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], 400);
    assert_eq!(json["message"], "Unsupported operation type!");
}

#[tokio::test]
async fn non_positive_amount_is_rejected() {
    let app = routes::app(test_state(ErrorStatusMode::Semantic));
    let id = create_account(&app, "erin").await;

    for amount in ["0", "-5", "0.00"] {
        let (status, json) = operate(&app, &id, amount, "DEPOSIT").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Operation amount must be greater than zero!");
    }

    let (_, json) = send(&app, "GET", &format!("/api/accounts/{id}/balance"), None).await;
    assert_eq!(json["currentBalance"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn malformed_parameters_are_bad_requests() {
    let app = routes::app(test_state(ErrorStatusMode::Semantic));
    let id = create_account(&app, "frank").await;

    let (_, json) = operate(&app, &id, "ten", "DEPOSIT").await;
    assert_eq!(json["message"], "Invalid parameter 'amount'!");

    let uri = format!("/api/operations/{id}/make-operation?amount=10");
    let (status, json) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Missing parameter 'type'!");
}

#[tokio::test]
async fn operation_on_unknown_account_is_not_found() {
    let app = routes::app(test_state(ErrorStatusMode::Semantic));

    let ghost = mongodb::bson::oid::ObjectId::new().to_hex();
    let (status, json) = operate(&app, &ghost, "10", "DEPOSIT").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], 404);
}

#[tokio::test]
async fn get_by_period_is_inclusive_on_both_ends() {
    let app = routes::app(test_state(ErrorStatusMode::Legacy));
    let id = create_account(&app, "grace").await;

    let mut ops: Vec<OperationDto> = vec![];
    for amount in ["10", "20", "30"] {
        let (_, json) = operate(&app, &id, amount, "DEPOSIT").await;
        ops.push(serde_json::from_value(json).unwrap());
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let uri = format!(
        "/api/operations/{id}/get-by-period?from={}&to={}",
        iso(&ops[0]),
        iso(&ops[1])
    );
    let (status, json) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let found: Vec<OperationDto> = serde_json::from_value(json).unwrap();
    assert_eq!(found, ops[..2].to_vec());
}

#[tokio::test]
async fn get_by_period_without_matches_is_empty() {
    let app = routes::app(test_state(ErrorStatusMode::Legacy));
    let id = create_account(&app, "heidi").await;
    operate(&app, &id, "10", "DEPOSIT").await;

    let uri = format!(
        "/api/operations/{id}/get-by-period?from=2000-01-01T00:00:00&to=2000-12-31T23:59:59"
    );
    let (status, json) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, Value::Array(vec![]));
}

#[tokio::test]
async fn get_by_period_unknown_account_is_not_found() {
    let app = routes::app(test_state(ErrorStatusMode::Legacy));

    let ghost = mongodb::bson::oid::ObjectId::new().to_hex();
    let uri = format!(
        "/api/operations/{ghost}/get-by-period?from=2000-01-01T00:00:00&to=2999-01-01T00:00:00"
    );
    let (status, json) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], 404);
}
