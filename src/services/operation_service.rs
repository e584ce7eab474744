use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;

use crate::{
    error::LedgerError,
    models::{Operation, OperationDto, OperationType},
    AppState,
};

use super::account_service;

/// Balance after applying one operation of `amount` to `balance`.
pub fn apply(balance: Decimal, amount: Decimal, kind: OperationType) -> Result<Decimal, LedgerError> {
    match kind {
        OperationType::Deposit => balance
            .checked_add(amount)
            .ok_or(LedgerError::InvalidAmount),
        OperationType::Withdraw => {
            if balance < amount {
                return Err(LedgerError::InsufficientFunds);
            }
            Ok(balance - amount)
        }
    }
}

pub async fn process_operation(
    state: &AppState,
    account_id: ObjectId,
    amount: Decimal,
    kind: OperationType,
) -> Result<OperationDto, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }

    let _guard = state.locks.acquire(account_id).await;

    let mut acc = account_service::find_account(state, account_id).await?;

    let previous_balance = acc.balance;
    acc.balance = apply(previous_balance, amount, kind)?;

    let operation = Operation::record(&acc, amount, kind);
    account_service::persist_balance_change(state, &acc, previous_balance, &operation).await?;

    tracing::info!(
        account_id = %acc.id,
        operation_id = %operation.id,
        kind = %kind,
        %amount,
        balance = %acc.balance,
        "operation committed"
    );

    Ok(OperationDto::from(&operation))
}

/// Operations of the account dated within `[from, to]`, oldest first.
pub async fn operations_in_range(
    state: &AppState,
    account_id: ObjectId,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<OperationDto>, LedgerError> {
    let acc = account_service::find_account(state, account_id).await?;

    let operations = state.store.operations_between(acc.id, from, to).await?;
    Ok(operations.iter().map(OperationDto::from).collect())
}
