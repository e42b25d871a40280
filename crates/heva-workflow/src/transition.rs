//! User status state machine.
//!
//! `pending` moves to `approved` or `rejected`; both are terminal.

use heva_core::error::{HevaError, HevaResult};
use heva_core::models::user::UserStatus;

/// An admin's verdict on a pending account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target(self) -> UserStatus {
        match self {
            Decision::Approve => UserStatus::Approved,
            Decision::Reject => UserStatus::Rejected,
        }
    }
}

/// Status after applying `decision` to an account in `current`.
pub fn decide(current: UserStatus, decision: Decision) -> HevaResult<UserStatus> {
    match current {
        UserStatus::Pending => Ok(decision.target()),
        UserStatus::Approved | UserStatus::Rejected => Err(HevaError::InvalidTransition {
            entity: "user".into(),
            from: current.to_string(),
            to: decision.target().to_string(),
        }),
    }
}
