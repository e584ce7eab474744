//! Library entrypoint for RustLedger.
//!
//! The binary only wires configuration, storage and the router together;
//! integration tests under `tests/` build the same `AppState` around an
//! in-memory store.

pub mod config;
pub mod error;
pub mod models;
pub mod store;

#[path = "middleware/error_status.rs"]
pub mod error_status;

pub mod services;

pub mod controllers;
pub mod routes;

use config::Settings;
use services::account_locks::AccountLocks;
use store::SharedStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub settings: Settings,
    pub locks: AccountLocks,
}

impl AppState {
    pub fn new(store: SharedStore, settings: Settings) -> Self {
        Self {
            store,
            settings,
            locks: AccountLocks::new(),
        }
    }
}
