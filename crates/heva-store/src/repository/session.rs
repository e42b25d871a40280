//! In-memory implementation of [`SessionRepository`].

use chrono::Utc;
use heva_core::error::HevaResult;
use heva_core::models::session::{CreateSession, Session};
use heva_core::repository::SessionRepository;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::MemoryStore;

#[derive(Debug, Clone)]
pub struct MemSessionRepository {
    store: MemoryStore,
}

impl MemSessionRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

impl SessionRepository for MemSessionRepository {
    async fn create(&self, input: CreateSession) -> HevaResult<Session> {
        let session = Session {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            expires_at: input.expires_at,
            created_at: Utc::now(),
        };

        let mut tables = self.store.tables().write().await;
        tables.sessions.push(session.clone());
        Ok(session)
    }

    async fn get_by_id(&self, id: Uuid) -> HevaResult<Session> {
        let tables = self.store.tables().read().await;
        tables
            .sessions
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("session", id.to_string()).into())
    }

    async fn invalidate(&self, id: Uuid) -> HevaResult<()> {
        let mut tables = self.store.tables().write().await;
        tables.sessions.retain(|s| s.id != id);
        Ok(())
    }

    async fn invalidate_user_sessions(&self, user_id: &str) -> HevaResult<u64> {
        let mut tables = self.store.tables().write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|s| s.user_id != user_id);
        Ok((before - tables.sessions.len()) as u64)
    }
}
