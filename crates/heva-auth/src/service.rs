//! Session service: login, logout and current-actor resolution.

use chrono::{DateTime, TimeDelta, Utc};
use heva_core::error::{HevaError, HevaResult};
use heva_core::models::session::CreateSession;
use heva_core::models::user::{User, UserStatus};
use heva_core::repository::{SessionRepository, UserRepository};
use tracing::{info, warn};
use uuid::Uuid;

use crate::authenticator::Authenticator;
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Session ID (pass to `current_actor` and `logout`).
    pub session_id: Uuid,
    /// The authenticated user as stored at login time.
    pub user: User,
    /// Session lifetime in seconds.
    pub expires_in: u64,
}

/// Session service.
///
/// Generic over repository implementations and the credential check,
/// so the auth layer has no dependency on the store crate.
pub struct SessionService<U: UserRepository, S: SessionRepository, A: Authenticator> {
    user_repo: U,
    session_repo: S,
    authenticator: A,
    config: AuthConfig,
}

impl<U: UserRepository, S: SessionRepository, A: Authenticator> SessionService<U, S, A> {
    pub fn new(user_repo: U, session_repo: S, authenticator: A, config: AuthConfig) -> Self {
        Self {
            user_repo,
            session_repo,
            authenticator,
            config,
        }
    }

    /// Resolve credentials to an approved user.
    async fn authenticate(&self, email: &str, password: &str) -> HevaResult<User> {
        // 1. Look up user by email.
        let user = match self.user_repo.get_by_email(email).await {
            Ok(u) => u,
            Err(HevaError::NotFound { .. }) => return Err(AuthError::InvalidCredentials.into()),
            Err(e) => return Err(e),
        };

        // 2. Verify credential.
        if !self.authenticator.verify(&user, password)? {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Check account status.
        match user.status {
            UserStatus::Approved => Ok(user),
            UserStatus::Pending => Err(AuthError::AccountPending.into()),
            UserStatus::Rejected => Err(AuthError::AccountRejected.into()),
        }
    }

    /// Expiry of a session opened now. A lifetime too large for the
    /// clock is a configuration error, not a panic.
    fn session_expiry(&self) -> HevaResult<DateTime<Utc>> {
        let secs = self.config.session_lifetime_secs;
        i64::try_from(secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                HevaError::Internal(format!("session lifetime of {secs}s is out of range"))
            })
    }

    /// Authenticate by email and password and open a session.
    ///
    /// Unknown emails, failed credential checks, pending accounts and
    /// rejected accounts fail with distinct reasons.
    pub async fn login(&self, input: LoginInput) -> HevaResult<LoginOutput> {
        let user = self
            .authenticate(&input.email, &input.password)
            .await
            .inspect_err(|e| warn!(email = %input.email, error = %e, "Login failed"))?;

        let expires_at = self.session_expiry()?;
        let session = self
            .session_repo
            .create(CreateSession {
                user_id: user.id.clone(),
                expires_at,
            })
            .await?;

        info!(
            user_id = %user.id,
            role = %user.role(),
            session_id = %session.id,
            "User logged in"
        );

        Ok(LoginOutput {
            session_id: session.id,
            user,
            expires_in: self.config.session_lifetime_secs,
        })
    }

    /// True iff `email` names an approved user whose credential passes.
    ///
    /// Does not say why a login would fail and does not open a session.
    /// Storage failures still surface as errors.
    pub async fn login_ok(&self, email: &str, password: &str) -> HevaResult<bool> {
        match self.authenticate(email, password).await {
            Ok(_) => Ok(true),
            Err(HevaError::AuthenticationFailed { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// The user behind `session_id`, re-read from the store.
    ///
    /// Expired sessions and sessions whose user was deleted or is no
    /// longer approved are invalidated and rejected.
    pub async fn current_actor(&self, session_id: Uuid) -> HevaResult<User> {
        let session = match self.session_repo.get_by_id(session_id).await {
            Ok(s) => s,
            Err(HevaError::NotFound { .. }) => return Err(AuthError::SessionInvalid.into()),
            Err(e) => return Err(e),
        };

        if session.expires_at <= Utc::now() {
            self.session_repo.invalidate(session_id).await?;
            return Err(AuthError::SessionExpired.into());
        }

        let user = match self.user_repo.get_by_id(&session.user_id).await {
            Ok(u) if u.status == UserStatus::Approved => u,
            Ok(_) | Err(HevaError::NotFound { .. }) => {
                self.session_repo.invalidate(session_id).await?;
                warn!(
                    session_id = %session_id,
                    user_id = %session.user_id,
                    "Session ended: user no longer eligible"
                );
                return Err(AuthError::SessionInvalid.into());
            }
            Err(e) => return Err(e),
        };

        Ok(user)
    }

    /// Invalidate a single session.
    pub async fn logout(&self, session_id: Uuid) -> HevaResult<()> {
        self.session_repo.invalidate(session_id).await?;
        info!(session_id = %session_id, "Session closed");
        Ok(())
    }

    /// Invalidate every session of a user.
    pub async fn revoke_all_sessions(&self, user_id: &str) -> HevaResult<u64> {
        self.session_repo.invalidate_user_sessions(user_id).await
    }
}
