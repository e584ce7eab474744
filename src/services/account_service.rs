use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;

use crate::{
    error::LedgerError,
    models::{Account, AccountDto, Operation},
    AppState,
};

/// Creates an account with a zero balance. Username validation happens in
/// the controller.
pub async fn create_account(state: &AppState, username: &str) -> Result<Account, LedgerError> {
    let acc = Account::new(username);
    state.store.insert_account(&acc).await?;

    tracing::info!(account_id = %acc.id, "account created");
    Ok(acc)
}

/// Loads the stored account entity.
pub async fn find_account(state: &AppState, id: ObjectId) -> Result<Account, LedgerError> {
    state
        .store
        .find_account(id)
        .await?
        .ok_or(LedgerError::AccountNotFound)
}

/// Loads the account together with its operations, as served to clients.
pub async fn find_account_dto(state: &AppState, id: ObjectId) -> Result<AccountDto, LedgerError> {
    let acc = find_account(state, id).await?;
    let operations = state.store.operations_for(acc.id).await?;
    Ok(AccountDto::from_parts(&acc, &operations))
}

pub async fn update_account(
    state: &AppState,
    id: ObjectId,
    new_username: &str,
) -> Result<AccountDto, LedgerError> {
    if !state.store.set_username(id, new_username).await? {
        return Err(LedgerError::AccountNotFound);
    }

    tracing::info!(account_id = %id, "account renamed");
    find_account_dto(state, id).await
}

/// Persists a balance the caller already changed on `account`, together
/// with the operation that changed it. The store refuses the write if the
/// stored balance is no longer `previous_balance`.
pub async fn persist_balance_change(
    state: &AppState,
    account: &Account,
    previous_balance: Decimal,
    operation: &Operation,
) -> Result<(), LedgerError> {
    state
        .store
        .commit_operation(account, previous_balance, operation)
        .await?;
    Ok(())
}

pub async fn delete_account(state: &AppState, id: ObjectId) -> Result<(), LedgerError> {
    // wait for in-flight operations on this account
    let _guard = state.locks.acquire(id).await;

    if !state.store.delete_account(id).await? {
        return Err(LedgerError::AccountNotFound);
    }

    tracing::info!(account_id = %id, "account deleted with its operations");
    Ok(())
}

pub async fn current_balance(state: &AppState, id: ObjectId) -> Result<Decimal, LedgerError> {
    Ok(find_account(state, id).await?.balance)
}

/// Balance as of `at`: the snapshot of the latest operation dated at or
/// before it, or zero when the account had no operations yet.
pub async fn balance_at_date(
    state: &AppState,
    id: ObjectId,
    at: DateTime<Utc>,
) -> Result<Decimal, LedgerError> {
    let acc = find_account(state, id).await?;
    let balance = state.store.latest_balance_at(acc.id, at).await?;
    Ok(balance.unwrap_or(Decimal::ZERO))
}
