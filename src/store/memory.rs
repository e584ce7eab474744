use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::models::{Account, Operation};

use super::{LedgerStore, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    accounts: HashMap<ObjectId, Account>,
    // insertion order, which is also date order
    operations: Vec<Operation>,
}

/// Process-local store for tests and database-less runs.
/// Every call takes the single table lock, so commits are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn insert_account(&self, account: &Account) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_account(&self, id: ObjectId) -> StoreResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.get(&id).cloned())
    }

    async fn set_username(&self, id: ObjectId, username: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.accounts.get_mut(&id) {
            Some(acc) => {
                acc.username = username.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_account(&self, id: ObjectId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.accounts.remove(&id).is_none() {
            return Ok(false);
        }
        tables.operations.retain(|op| op.account_id != id);
        Ok(true)
    }

    async fn commit_operation(
        &self,
        account: &Account,
        previous_balance: Decimal,
        operation: &Operation,
    ) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        let Some(stored) = tables.accounts.get_mut(&account.id) else {
            return Err(StoreError::AccountMissing(account.id));
        };
        if stored.balance != previous_balance {
            return Err(StoreError::BalanceMismatch(account.id));
        }

        stored.balance = account.balance;
        tables.operations.push(operation.clone());
        Ok(())
    }

    async fn latest_balance_at(
        &self,
        account_id: ObjectId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Decimal>> {
        let tables = self.tables.read().await;

        // max_by_key keeps the last of equal dates, i.e. the latest insert
        let latest = tables
            .operations
            .iter()
            .filter(|op| op.account_id == account_id && op.date <= at)
            .max_by_key(|op| op.date);

        Ok(latest.map(|op| op.account_balance))
    }

    async fn operations_between(
        &self,
        account_id: ObjectId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<Operation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .operations
            .iter()
            .filter(|op| op.account_id == account_id && op.date >= from && op.date <= to)
            .cloned()
            .collect())
    }

    async fn operations_for(&self, account_id: ObjectId) -> StoreResult<Vec<Operation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .operations
            .iter()
            .filter(|op| op.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
