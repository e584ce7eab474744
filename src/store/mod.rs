//! Persistence for accounts and their operations.
//!
//! Services only talk to [`LedgerStore`]; `main` picks the MongoDB backend
//! or the in-memory one from configuration.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;

use crate::models::{Account, Operation};

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("bson encoding error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    #[error("account {0} does not exist")]
    AccountMissing(ObjectId),

    #[error("balance of account {0} changed before the operation was committed")]
    BalanceMismatch(ObjectId),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub type SharedStore = Arc<dyn LedgerStore>;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn insert_account(&self, account: &Account) -> StoreResult<()>;

    async fn find_account(&self, id: ObjectId) -> StoreResult<Option<Account>>;

    /// Returns false when no account has this id.
    async fn set_username(&self, id: ObjectId, username: &str) -> StoreResult<bool>;

    /// Deletes the account and every operation it owns.
    /// Returns false when no account has this id.
    async fn delete_account(&self, id: ObjectId) -> StoreResult<bool>;

    /// Atomically stores `operation` and sets the account balance to
    /// `account.balance`, provided the stored balance still equals
    /// `previous_balance`. Fails with `BalanceMismatch` otherwise.
    async fn commit_operation(
        &self,
        account: &Account,
        previous_balance: Decimal,
        operation: &Operation,
    ) -> StoreResult<()>;

    /// Balance snapshot of the latest operation dated at or before `at`.
    async fn latest_balance_at(
        &self,
        account_id: ObjectId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Decimal>>;

    /// Operations dated within `[from, to]`, oldest first.
    async fn operations_between(
        &self,
        account_id: ObjectId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<Operation>>;

    /// All operations of the account, oldest first.
    async fn operations_for(&self, account_id: ObjectId) -> StoreResult<Vec<Operation>>;

    async fn ping(&self) -> StoreResult<()>;
}
