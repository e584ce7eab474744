use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub username: String,

    // stored as a decimal string so no precision is lost
    pub balance: Decimal,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            username: username.into(),
            balance: Decimal::ZERO,
            created_at: super::now(),
        }
    }
}
