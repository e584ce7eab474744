use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use mongodb::bson::oid::ObjectId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<ObjectId, Arc<AsyncMutex<()>>>;

/// One async mutex per account. Balance changes hold it across the whole
/// read-modify-write so two requests on the same account run one at a time.
///
/// Entries only live while someone holds or waits for them.
#[derive(Clone, Default)]
pub struct AccountLocks {
    inner: Arc<Mutex<LockMap>>,
}

/// Held lock on one account. Dropping the last holder removes the entry.
pub struct AccountGuard {
    locks: AccountLocks,
    account_id: ObjectId,
    guard: OwnedMutexGuard<()>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, account_id: ObjectId) -> AccountGuard {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.entry(account_id).or_default().clone()
        };

        AccountGuard {
            locks: self.clone(),
            account_id,
            guard: lock.lock_owned().await,
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for AccountGuard {
    fn drop(&mut self) {
        let mut map = self
            .locks
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // the map and this guard are the only owners: nobody is waiting
        let idle = map.get(&self.account_id).is_some_and(|lock| {
            Arc::ptr_eq(lock, OwnedMutexGuard::mutex(&self.guard)) && Arc::strong_count(lock) <= 2
        });
        if idle {
            map.remove(&self.account_id);
        }
    }
}
