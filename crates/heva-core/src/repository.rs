//! Repository trait definitions for data access abstraction.
//!
//! Repositories are dumb keyed collections: they preserve insertion
//! order and perform no validation. Business rules live in the
//! workflow engine. All operations are async so a real backing store
//! can be dropped in later.

use uuid::Uuid;

use crate::error::HevaResult;
use crate::models::{
    business::Business,
    session::{CreateSession, Session},
    user::User,
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Append a user. An empty `id` is replaced with a fresh one.
    fn insert(&self, user: User) -> impl Future<Output = HevaResult<User>> + Send;
    fn get_by_id(&self, id: &str) -> impl Future<Output = HevaResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = HevaResult<User>> + Send;
    /// Replace the record with the same id, keeping its position.
    fn replace(&self, user: User) -> impl Future<Output = HevaResult<User>> + Send;
    fn remove_by_id(&self, id: &str) -> impl Future<Output = HevaResult<()>> + Send;
    /// All users in insertion order.
    fn list(&self) -> impl Future<Output = HevaResult<Vec<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Businesses
// ---------------------------------------------------------------------------

pub trait BusinessRepository: Send + Sync {
    /// Append a business. An empty `id` is replaced with a fresh one.
    fn insert(&self, business: Business) -> impl Future<Output = HevaResult<Business>> + Send;
    fn get_by_id(&self, id: &str) -> impl Future<Output = HevaResult<Business>> + Send;
    /// Replace the record with the same id, keeping its position.
    fn replace(&self, business: Business) -> impl Future<Output = HevaResult<Business>> + Send;
    fn remove_by_id(&self, id: &str) -> impl Future<Output = HevaResult<()>> + Send;
    /// All businesses in insertion order.
    fn list(&self) -> impl Future<Output = HevaResult<Vec<Business>>> + Send;
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = HevaResult<Session>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = HevaResult<Session>> + Send;
    /// Invalidate a single session.
    fn invalidate(&self, id: Uuid) -> impl Future<Output = HevaResult<()>> + Send;
    /// Invalidate all sessions for a user (e.g., when the user is deleted).
    fn invalidate_user_sessions(
        &self,
        user_id: &str,
    ) -> impl Future<Output = HevaResult<u64>> + Send;
}
