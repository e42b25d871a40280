//! Seed loading.
//!
//! A seed file is a JSON document with `users` and `businesses` arrays
//! in the camelCase record shape. Records are inserted in file order
//! through the regular repositories, so ids and display order are kept.

use std::path::Path;

use heva_core::error::HevaResult;
use heva_core::models::{business::Business, user::User};
use heva_core::repository::{BusinessRepository, UserRepository};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StoreError;
use crate::repository::{MemBusinessRepository, MemUserRepository};
use crate::store::MemoryStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub businesses: Vec<Business>,
}

/// Number of records a seed added to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub businesses: usize,
}

/// Read and parse a seed file.
pub fn load_seed(path: &Path) -> Result<Seed, StoreError> {
    let raw = std::fs::read_to_string(path)?;
    let seed = serde_json::from_str(&raw)?;
    Ok(seed)
}

/// Insert every seed record into `store`.
///
/// Stops at the first record whose id is already present; records
/// inserted before that point stay in the store.
pub async fn apply_seed(store: &MemoryStore, seed: Seed) -> HevaResult<SeedSummary> {
    let users = MemUserRepository::new(store.clone());
    let businesses = MemBusinessRepository::new(store.clone());

    let mut summary = SeedSummary {
        users: 0,
        businesses: 0,
    };

    for user in seed.users {
        users.insert(user).await?;
        summary.users += 1;
    }
    for business in seed.businesses {
        businesses.insert(business).await?;
        summary.businesses += 1;
    }

    info!(
        users = summary.users,
        businesses = summary.businesses,
        "Seed applied"
    );

    Ok(summary)
}
