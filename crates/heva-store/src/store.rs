//! Shared in-memory tables.

use std::sync::Arc;

use heva_core::models::{business::Business, session::Session, user::User};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: Vec<User>,
    pub(crate) businesses: Vec<Business>,
    pub(crate) sessions: Vec<Session>,
}

/// Handle to the process-wide record store.
///
/// Cloning the handle shares the same tables, so a mutation through
/// any repository is visible to every reader immediately.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn tables(&self) -> &RwLock<Tables> {
        &self.tables
    }
}

/// Fresh opaque record id.
pub(crate) fn next_id() -> String {
    Uuid::new_v4().to_string()
}
