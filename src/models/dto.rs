//! JSON projections of the stored entities.
//!
//! Both services map through here so the account view and the operation
//! view can never drift apart.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Account, Operation, OperationType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDto {
    pub id: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: OperationType,
    pub description: String,
    pub date: DateTime<Utc>,
    pub account_id: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub account_balance: Decimal,
}

impl From<&Operation> for OperationDto {
    fn from(op: &Operation) -> Self {
        Self {
            id: op.id.to_hex(),
            amount: op.amount,
            kind: op.kind,
            description: op.description.clone(),
            date: op.date,
            account_id: op.account_id.to_hex(),
            account_balance: op.account_balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: String,
    pub username: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub operations_list: Vec<OperationDto>,
}

impl AccountDto {
    pub fn from_parts(account: &Account, operations: &[Operation]) -> Self {
        Self {
            id: account.id.to_hex(),
            username: account.username.clone(),
            balance: account.balance,
            created_at: account.created_at,
            operations_list: operations.iter().map(OperationDto::from).collect(),
        }
    }
}
