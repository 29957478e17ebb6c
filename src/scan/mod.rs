//! Finding engine
//!
//! One scanner per resource kind, all sharing the `ResourceScanner`
//! contract: evaluate a single resource snapshot into zero or more
//! findings. Evaluation is sequential: each kind is scanned to completion
//! before the next, and each resource to completion before the next. A
//! scanner reads only the resource's own data plus immutable configuration
//! and pricing.

pub mod compute;
pub mod database;
pub mod storage;
pub mod types;

pub use compute::ComputeScanner;
pub use database::DatabaseScanner;
pub use storage::StorageScanner;

use crate::config::{ExclusionRule, ScanConfig};
use crate::inventory::ResourceInventory;
use crate::metrics::MetricsSource;
use crate::pricing::PricingTable;
use crate::scan::types::{Finding, Resource, ResourceKind};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{error, info};

/// Per-kind evaluation contract
///
/// A resource may legitimately yield zero, one, or multiple findings.
#[async_trait]
pub trait ResourceScanner: Send + Sync {
    fn kind(&self) -> ResourceKind;

    async fn evaluate(
        &self,
        resource: &Resource,
        metrics: &dyn MetricsSource,
        pricing: &PricingTable,
    ) -> Vec<Finding>;
}

/// Dispatch table from resource kind to its scanner
pub fn scanner_for(kind: ResourceKind, config: &ScanConfig) -> Box<dyn ResourceScanner> {
    match kind {
        ResourceKind::Compute => Box::new(ComputeScanner::new(config.compute.clone())),
        ResourceKind::Storage => Box::new(StorageScanner::new(config.storage.clone())),
        ResourceKind::Database => Box::new(DatabaseScanner::new(config.database.clone())),
    }
}

/// Whether any tag on the resource matches an exclusion rule
///
/// A match short-circuits all further evaluation for that resource.
pub fn is_excluded(resource: &Resource, rules: &[ExclusionRule]) -> bool {
    rules.iter().any(|rule| rule.matches(&resource.tags))
}

/// Trailing metric window ending now
pub(crate) fn trailing_window(days: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = Utc::now();
    (end - Duration::days(days as i64), end)
}

/// Round a statistic for metadata to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scan every kind in inventory order, sequentially per resource
///
/// An inventory failure is caught here: the kind contributes an empty
/// finding set and the scan continues with the remaining kinds.
pub async fn run_scan(
    inventories: &[Box<dyn ResourceInventory>],
    metrics: &dyn MetricsSource,
    pricing: &PricingTable,
    config: &ScanConfig,
) -> Vec<(ResourceKind, Vec<Finding>)> {
    let mut results = Vec::new();

    for inventory in inventories {
        let kind = inventory.kind();
        let scanner = scanner_for(kind, config);

        let resources = match inventory.list_resources().await {
            Ok(resources) => resources,
            Err(e) => {
                error!("Failed to list {} resources: {}", kind, e);
                results.push((kind, Vec::new()));
                continue;
            }
        };

        info!("Evaluating {} {} resource(s)", resources.len(), kind);

        let mut findings = Vec::new();
        for resource in &resources {
            findings.extend(scanner.evaluate(resource, metrics, pricing).await);
        }

        info!("{}: {} finding(s)", kind, findings.len());
        results.push((kind, findings));
    }

    results
}
