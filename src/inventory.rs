//! Resource inventory abstraction
//!
//! One inventory per resource kind enumerates the resources to evaluate.
//! Unlike the metrics source, inventory failures do propagate. The scan
//! loop catches them at the kind boundary, logs, and continues with the
//! remaining kinds.

use crate::error::Result;
use crate::scan::types::{Resource, ResourceKind};
use async_trait::async_trait;

/// Enumerates resources of one kind with their static attributes
#[async_trait]
pub trait ResourceInventory: Send + Sync {
    fn kind(&self) -> ResourceKind;

    async fn list_resources(&self) -> Result<Vec<Resource>>;
}
