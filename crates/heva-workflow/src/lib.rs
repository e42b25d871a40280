//! HEVA Workflow: who may see and change which records, and how user
//! status moves.
//!
//! The service is generic over repository traits so the workflow layer
//! has no dependency on the store crate.

pub mod filter;
pub mod service;
pub mod transition;
pub mod validation;

pub use filter::BeneficiaryFilter;
pub use service::WorkflowService;
pub use transition::{Decision, decide};
