//! HEVA Auth: resolves a login to a user and tracks who the current
//! actor of a session is.
//!
//! Credential checking is delegated to an [`Authenticator`]; the
//! default [`PasswordIgnored`] accepts any password.

pub mod authenticator;
pub mod config;
pub mod error;
pub mod service;

pub use authenticator::{Authenticator, PasswordIgnored};
pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{LoginInput, LoginOutput, SessionService};
