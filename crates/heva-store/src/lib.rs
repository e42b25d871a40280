//! HEVA Store: the in-memory record store and its repository
//! implementations.
//!
//! This crate provides:
//! - The shared store handle ([`MemoryStore`])
//! - Repository implementations for the `heva-core` traits
//! - Seed loading from a JSON file ([`load_seed`], [`apply_seed`])
//! - Error types ([`StoreError`])

mod error;
pub mod repository;
mod seed;
mod store;

pub use error::StoreError;
pub use seed::{Seed, SeedSummary, apply_seed, load_seed};
pub use store::MemoryStore;
