//! Authentication error types.

use heva_core::error::HevaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is pending approval")]
    AccountPending,

    #[error("account was rejected")]
    AccountRejected,

    #[error("session is invalid")]
    SessionInvalid,

    #[error("session has expired")]
    SessionExpired,
}

impl From<AuthError> for HevaError {
    fn from(err: AuthError) -> Self {
        HevaError::AuthenticationFailed {
            reason: err.to_string(),
        }
    }
}
