//! HEVA Core: domain model, closed enumerations, error taxonomy and
//! repository traits shared by every other crate in the workspace.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{HevaError, HevaResult};
