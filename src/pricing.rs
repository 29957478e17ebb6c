//! Static pricing tables for savings estimates
//!
//! Simplified on-demand pricing (would use the AWS Pricing API in
//! production). Compute and database rates are hourly per size class;
//! storage rates are per GB-month per volume type. Missing entries fall
//! back to a kind-specific default rate rather than erroring.

use crate::scan::types::ResourceKind;

/// Billing hours in a month used for monthly projections
pub const HOURS_PER_MONTH: f64 = 730.0;

const DEFAULT_HOURLY_RATE: f64 = 0.05;
const DEFAULT_GB_MONTH_RATE: f64 = 0.10;

#[derive(Debug, Clone, Copy, Default)]
pub struct PricingTable;

impl PricingTable {
    pub fn new() -> Self {
        Self
    }

    /// Hourly on-demand rate for a compute or database size class
    pub fn hourly_rate(&self, kind: ResourceKind, size_class: &str) -> f64 {
        match kind {
            ResourceKind::Compute => match size_class {
                "t2.micro" => 0.0116,
                "t2.small" => 0.023,
                "t2.medium" => 0.0464,
                "t3.micro" => 0.0104,
                "t3.small" => 0.0208,
                "t3.medium" => 0.0416,
                "m5.large" => 0.096,
                "m5.xlarge" => 0.192,
                _ => DEFAULT_HOURLY_RATE,
            },
            ResourceKind::Database => match size_class {
                "db.t3.micro" => 0.017,
                "db.t3.small" => 0.034,
                "db.t3.medium" => 0.068,
                "db.m5.large" => 0.192,
                "db.m5.xlarge" => 0.384,
                _ => DEFAULT_HOURLY_RATE,
            },
            // Storage is billed per GB-month, not hourly
            ResourceKind::Storage => 0.0,
        }
    }

    /// Per GB-month rate for a storage volume type
    pub fn gb_month_rate(&self, volume_type: &str) -> f64 {
        match volume_type {
            "gp2" => 0.10,
            "gp3" => 0.08,
            "io1" | "io2" => 0.125,
            "st1" => 0.045,
            "sc1" => 0.025,
            _ => DEFAULT_GB_MONTH_RATE,
        }
    }

    /// Monthly cost projection for an hourly-billed resource
    pub fn estimate_monthly_cost(
        &self,
        kind: ResourceKind,
        size_class: &str,
        hours_per_month: f64,
    ) -> f64 {
        self.hourly_rate(kind, size_class) * hours_per_month
    }

    /// Monthly cost of a storage volume
    pub fn monthly_storage_cost(&self, volume_type: &str, size_gb: i64) -> f64 {
        self.gb_month_rate(volume_type) * size_gb as f64
    }
}
