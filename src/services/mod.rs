pub mod account_locks;

pub mod account_service;
pub mod operation_service;
