//! In-memory implementation of [`UserRepository`].

use heva_core::error::HevaResult;
use heva_core::models::user::User;
use heva_core::repository::UserRepository;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{MemoryStore, next_id};

/// In-memory implementation of the User repository.
#[derive(Debug, Clone)]
pub struct MemUserRepository {
    store: MemoryStore,
}

impl MemUserRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

impl UserRepository for MemUserRepository {
    async fn insert(&self, mut user: User) -> HevaResult<User> {
        let mut tables = self.store.tables().write().await;

        if user.id.is_empty() {
            user.id = next_id();
        } else if tables.users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::DuplicateId {
                entity: "user".into(),
                id: user.id,
            }
            .into());
        }

        debug!(user_id = %user.id, role = %user.role(), "Inserting user");
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: &str) -> HevaResult<User> {
        let tables = self.store.tables().read().await;
        tables
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("user", id).into())
    }

    async fn get_by_email(&self, email: &str) -> HevaResult<User> {
        let tables = self.store.tables().read().await;
        tables
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| StoreError::not_found("user", format!("email={email}")).into())
    }

    async fn replace(&self, user: User) -> HevaResult<User> {
        let mut tables = self.store.tables().write().await;
        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| StoreError::not_found("user", user.id.clone()))?;

        debug!(user_id = %user.id, "Replacing user");
        *slot = user.clone();
        Ok(user)
    }

    async fn remove_by_id(&self, id: &str) -> HevaResult<()> {
        let mut tables = self.store.tables().write().await;
        let position = tables
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| StoreError::not_found("user", id))?;

        debug!(user_id = %id, "Removing user");
        tables.users.remove(position);
        Ok(())
    }

    async fn list(&self) -> HevaResult<Vec<User>> {
        let tables = self.store.tables().read().await;
        Ok(tables.users.clone())
    }
}
