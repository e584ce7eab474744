pub mod account;
pub mod operation;
pub mod dto;

use chrono::{DateTime, SubsecRound, Utc};

pub use account::Account;
pub use operation::{Operation, OperationType};
pub use dto::{AccountDto, OperationDto};

/// Current time at millisecond precision, the resolution MongoDB stores dates with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
