use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

use super::Account;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    Deposit,
    Withdraw,
}

impl OperationType {
    /// Human label used in operation descriptions.
    pub fn label(self) -> &'static str {
        match self {
            OperationType::Deposit => "Deposit",
            OperationType::Withdraw => "Withdrawal",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationType::Deposit => "DEPOSIT",
            OperationType::Withdraw => "WITHDRAW",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("DEPOSIT") {
            Ok(OperationType::Deposit)
        } else if s.eq_ignore_ascii_case("WITHDRAW") {
            Ok(OperationType::Withdraw)
        } else {
            Err(LedgerError::UnsupportedOperationType)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    // always the magnitude, the sign comes from `kind`
    pub amount: Decimal,

    #[serde(rename = "type")]
    pub kind: OperationType,

    pub description: String,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,

    pub account_id: ObjectId,

    // account balance right after this operation was applied
    pub account_balance: Decimal,
}

impl Operation {
    /// Builds the row for an operation already applied to `account`,
    /// snapshotting its (post-mutation) balance.
    pub fn record(account: &Account, amount: Decimal, kind: OperationType) -> Self {
        Self {
            id: ObjectId::new(),
            amount,
            kind,
            description: describe(kind, amount),
            date: super::now(),
            account_id: account.id,
            account_balance: account.balance,
        }
    }
}

pub fn describe(kind: OperationType, amount: Decimal) -> String {
    format!("{} of: {}", kind.label(), amount)
}
