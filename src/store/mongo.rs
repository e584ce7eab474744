use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    error::TRANSIENT_TRANSACTION_ERROR,
    options::{FindOneOptions, FindOptions},
    Client, ClientSession, Collection, Database, IndexModel,
};
use rust_decimal::Decimal;

use crate::models::{Account, Operation};

use super::{LedgerStore, StoreError, StoreResult};

const ACCOUNTS: &str = "accounts";
const OPERATIONS: &str = "operations";

/// MongoDB backend. Operation commits and cascade deletes run in
/// multi-document transactions, so the server must be a replica set.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, db_name: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(db_name);

        ensure_indexes(&db).await?;
        tracing::info!("connected to MongoDB database {db_name}");

        Ok(Self { client, db })
    }

    fn accounts(&self) -> Collection<Account> {
        self.db.collection::<Account>(ACCOUNTS)
    }

    fn operations(&self) -> Collection<Operation> {
        self.db.collection::<Operation>(OPERATIONS)
    }

    async fn find_operations(
        &self,
        filter: Document,
        sort: Document,
    ) -> StoreResult<Vec<Operation>> {
        let find_opts = FindOptions::builder().sort(sort).build();
        let mut cursor = self.operations().find(filter, find_opts).await?;

        let mut out: Vec<Operation> = vec![];
        while let Some(res) = cursor.next().await {
            out.push(res?);
        }
        Ok(out)
    }

    // Returns false when the balance guard did not match.
    async fn write_operation(
        &self,
        session: &mut ClientSession,
        account: &Account,
        previous_balance: Decimal,
        operation: &Operation,
    ) -> StoreResult<bool> {
        let updated = self
            .accounts()
            .update_one_with_session(
                doc! { "_id": account.id, "balance": bson::to_bson(&previous_balance)? },
                doc! { "$set": { "balance": bson::to_bson(&account.balance)? } },
                None,
                session,
            )
            .await?;

        if updated.matched_count == 0 {
            return Ok(false);
        }

        self.operations()
            .insert_one_with_session(operation, None, session)
            .await?;
        Ok(true)
    }

    async fn remove_account(
        &self,
        session: &mut ClientSession,
        id: ObjectId,
    ) -> StoreResult<bool> {
        self.operations()
            .delete_many_with_session(doc! { "account_id": id }, None, session)
            .await?;

        let deleted = self
            .accounts()
            .delete_one_with_session(doc! { "_id": id }, None, session)
            .await?;
        Ok(deleted.deleted_count > 0)
    }
}

// A concurrent transaction touching the same account aborts this one with a
// transient write conflict, which is the same outcome as a stale balance.
fn conflict_or(e: StoreError, account_id: ObjectId) -> StoreError {
    match e {
        StoreError::Mongo(ref err) if err.contains_label(TRANSIENT_TRANSACTION_ERROR) => {
            StoreError::BalanceMismatch(account_id)
        }
        other => other,
    }
}

async fn abort(session: &mut ClientSession) {
    if let Err(e) = session.abort_transaction().await {
        tracing::warn!("failed to abort transaction: {e}");
    }
}

pub async fn ensure_indexes(db: &Database) -> StoreResult<()> {
    // operations: history lookups filter by account and range over date
    let col = db.collection::<Document>(OPERATIONS);
    let model = IndexModel::builder()
        .keys(doc! { "account_id": 1, "date": 1 })
        .build();

    col.create_index(model, None).await?;
    Ok(())
}

#[async_trait]
impl LedgerStore for MongoStore {
    async fn insert_account(&self, account: &Account) -> StoreResult<()> {
        self.accounts().insert_one(account, None).await?;
        Ok(())
    }

    async fn find_account(&self, id: ObjectId) -> StoreResult<Option<Account>> {
        Ok(self.accounts().find_one(doc! { "_id": id }, None).await?)
    }

    async fn set_username(&self, id: ObjectId, username: &str) -> StoreResult<bool> {
        let updated = self
            .accounts()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "username": username } },
                None,
            )
            .await?;
        Ok(updated.matched_count > 0)
    }

    async fn delete_account(&self, id: ObjectId) -> StoreResult<bool> {
        let mut session = self.client.start_session(None).await?;
        session.start_transaction(None).await?;

        match self.remove_account(&mut session, id).await {
            Ok(deleted) => {
                session.commit_transaction().await?;
                Ok(deleted)
            }
            Err(e) => {
                abort(&mut session).await;
                Err(e)
            }
        }
    }

    async fn commit_operation(
        &self,
        account: &Account,
        previous_balance: Decimal,
        operation: &Operation,
    ) -> StoreResult<()> {
        let mut session = self.client.start_session(None).await?;
        session.start_transaction(None).await?;

        match self
            .write_operation(&mut session, account, previous_balance, operation)
            .await
        {
            Ok(true) => session
                .commit_transaction()
                .await
                .map_err(|e| conflict_or(e.into(), account.id)),
            Ok(false) => {
                abort(&mut session).await;
                match self.find_account(account.id).await? {
                    Some(_) => Err(StoreError::BalanceMismatch(account.id)),
                    None => Err(StoreError::AccountMissing(account.id)),
                }
            }
            Err(e) => {
                abort(&mut session).await;
                Err(conflict_or(e, account.id))
            }
        }
    }

    async fn latest_balance_at(
        &self,
        account_id: ObjectId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Decimal>> {
        let opts = FindOneOptions::builder()
            .sort(doc! { "date": -1, "_id": -1 })
            .build();

        let latest = self
            .operations()
            .find_one(
                doc! {
                    "account_id": account_id,
                    "date": { "$lte": bson::DateTime::from_chrono(at) },
                },
                opts,
            )
            .await?;

        Ok(latest.map(|op| op.account_balance))
    }

    async fn operations_between(
        &self,
        account_id: ObjectId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<Operation>> {
        self.find_operations(
            doc! {
                "account_id": account_id,
                "date": {
                    "$gte": bson::DateTime::from_chrono(from),
                    "$lte": bson::DateTime::from_chrono(to),
                },
            },
            doc! { "date": 1, "_id": 1 },
        )
        .await
    }

    async fn operations_for(&self, account_id: ObjectId) -> StoreResult<Vec<Operation>> {
        self.find_operations(doc! { "account_id": account_id }, doc! { "date": 1, "_id": 1 })
            .await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}
