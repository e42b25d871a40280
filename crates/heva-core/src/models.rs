//! Domain models for HEVA.
//!
//! These are the core types shared across all crates.

pub mod business;
pub mod county;
pub mod session;
pub mod user;
pub mod vulnerable_group;
