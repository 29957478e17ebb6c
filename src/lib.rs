//! idlectl library
//!
//! Core functionality for the idlectl CLI: the per-kind finding engine,
//! static pricing table, report aggregation, and the collaborator traits
//! (metrics source, resource inventory) with their AWS implementations.

pub mod aws;
pub mod config;
pub mod error;
pub mod export;
pub mod inventory;
pub mod metrics;
pub mod pricing;
pub mod report;
pub mod scan;
pub mod utils;

// Re-export commonly used types
pub use report::Report;
pub use scan::types::{Finding, IssueType, Resource, ResourceKind, ResourceState, Severity};
