//! AWS-backed implementations of the scan collaborators
//!
//! Inventories wrap one describe call per kind; the metrics source wraps
//! CloudWatch `GetMetricStatistics`. Credential resolution follows the SDK
//! default chain.

mod inventory;
mod metrics;

pub use inventory::{EbsInventory, Ec2Inventory, RdsInventory};
pub use metrics::CloudWatchMetrics;

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Load the shared SDK configuration, optionally overriding the region
pub async fn load_sdk_config(region: Option<String>) -> SdkConfig {
    let loader = aws_config::defaults(BehaviorVersion::latest());
    match region {
        Some(region) => loader.region(Region::new(region)).load().await,
        None => loader.load().await,
    }
}

/// Region name the scan is labeled with, from the resolved SDK config
pub fn resolved_region(sdk_config: &SdkConfig) -> String {
    sdk_config
        .region()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
