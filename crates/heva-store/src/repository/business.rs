//! In-memory implementation of [`BusinessRepository`].

use heva_core::error::HevaResult;
use heva_core::models::business::Business;
use heva_core::repository::BusinessRepository;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{MemoryStore, next_id};

/// In-memory implementation of the Business repository.
#[derive(Debug, Clone)]
pub struct MemBusinessRepository {
    store: MemoryStore,
}

impl MemBusinessRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

impl BusinessRepository for MemBusinessRepository {
    async fn insert(&self, mut business: Business) -> HevaResult<Business> {
        let mut tables = self.store.tables().write().await;

        if business.id.is_empty() {
            business.id = next_id();
        } else if tables.businesses.iter().any(|b| b.id == business.id) {
            return Err(StoreError::DuplicateId {
                entity: "business".into(),
                id: business.id,
            }
            .into());
        }

        debug!(business_id = %business.id, beneficiary_id = %business.beneficiary_id, "Inserting business");
        tables.businesses.push(business.clone());
        Ok(business)
    }

    async fn get_by_id(&self, id: &str) -> HevaResult<Business> {
        let tables = self.store.tables().read().await;
        tables
            .businesses
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("business", id).into())
    }

    async fn replace(&self, business: Business) -> HevaResult<Business> {
        let mut tables = self.store.tables().write().await;
        let slot = tables
            .businesses
            .iter_mut()
            .find(|b| b.id == business.id)
            .ok_or_else(|| StoreError::not_found("business", business.id.clone()))?;

        debug!(business_id = %business.id, "Replacing business");
        *slot = business.clone();
        Ok(business)
    }

    async fn remove_by_id(&self, id: &str) -> HevaResult<()> {
        let mut tables = self.store.tables().write().await;
        let position = tables
            .businesses
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| StoreError::not_found("business", id))?;

        debug!(business_id = %id, "Removing business");
        tables.businesses.remove(position);
        Ok(())
    }

    async fn list(&self) -> HevaResult<Vec<Business>> {
        let tables = self.store.tables().read().await;
        Ok(tables.businesses.clone())
    }
}
