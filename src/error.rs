//! Error types for idlectl
//!
//! This module defines the error handling strategy for idlectl. There are two
//! error types: `IdlectlError` (main error enum) and `ConfigError`
//! (configuration-specific).
//!
//! ## Error Handling Philosophy
//!
//! Library code uses `crate::error::Result<T>` which returns `IdlectlError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling. The
//! conversion happens at the CLI boundary using `anyhow::Error::from` to
//! preserve error chains.
//!
//! This split exists because:
//! - Library code benefits from structured error types for programmatic handling
//! - CLI code benefits from `anyhow`'s context chains and user-friendly display
//!
//! ## Failure Taxonomy
//!
//! - `Config`: malformed or invalid configuration. Fatal at startup; the
//!   process reports the error and exits before any scan work begins.
//! - `Inventory`: an inventory listing call failed. Caught at the per-kind
//!   scan boundary; that kind yields an empty finding set and the scan
//!   continues with the remaining kinds.
//! - `Report`/`Io`/`Json`: output-write failures. Fatal, since the scan's
//!   report is its only product.
//!
//! Metric retrieval failures never surface here: the metrics source swallows
//! them and reports an empty sample sequence. No retries are implemented
//! anywhere; a failed call is a permanent "no data" result for that call.

use crate::scan::types::ResourceKind;
use thiserror::Error;

/// Main error type for idlectl
#[derive(Error, Debug)]
pub enum IdlectlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Inventory error: {kind} - {message}")]
    Inventory {
        kind: ResourceKind,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("AWS SDK error: {0}")]
    Aws(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, IdlectlError>;
