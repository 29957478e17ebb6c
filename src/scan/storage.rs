//! Storage volume scanner
//!
//! Flags unattached volumes and attached volumes with negligible I/O
//! activity over the trailing window.

use crate::config::StorageConfig;
use crate::metrics::{MetricsSource, Statistic};
use crate::pricing::PricingTable;
use crate::scan::types::{Finding, IssueType, Resource, ResourceKind, ResourceState, Severity};
use crate::scan::{is_excluded, round2, trailing_window, ResourceScanner};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

const READ_OPS_METRIC: &str = "VolumeReadOps";
const WRITE_OPS_METRIC: &str = "VolumeWriteOps";

/// Days unattached after which the finding escalates to High
const UNATTACHED_HIGH_AFTER_DAYS: i64 = 30;

/// Severity of an unattached-volume finding by its age in days
pub fn unattached_severity(days_unattached: i64) -> Severity {
    if days_unattached > UNATTACHED_HIGH_AFTER_DAYS {
        Severity::High
    } else {
        Severity::Medium
    }
}

/// Severity of a low-I/O finding for attached volumes
pub fn iops_severity(daily_avg_ops: f64) -> Severity {
    if daily_avg_ops == 0.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

pub struct StorageScanner {
    config: StorageConfig,
}

impl StorageScanner {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    fn unattached_finding(&self, resource: &Resource, pricing: &PricingTable) -> Finding {
        let size_gb = resource.size_gb.unwrap_or(0);
        let monthly_cost = pricing.monthly_storage_cost(&resource.size_class, size_gb);
        let days_unattached = resource
            .age_days(chrono::Utc::now())
            .unwrap_or(0)
            .max(0);

        Finding::new(
            resource,
            IssueType::Unattached,
            format!(
                "Volume {} ({}GB {}) has been unattached for {} days",
                resource.id, size_gb, resource.size_class, days_unattached
            ),
            monthly_cost,
            "Delete if no longer needed, or attach to an instance if required",
            unattached_severity(days_unattached),
            json!({
                "volume_type": resource.size_class,
                "size_gb": size_gb,
                "region": resource.region,
                "days_unattached": days_unattached,
                "created_at": resource.created_at.map(|t| t.to_rfc3339()),
            }),
        )
    }
}

#[async_trait]
impl ResourceScanner for StorageScanner {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Storage
    }

    async fn evaluate(
        &self,
        resource: &Resource,
        metrics_source: &dyn MetricsSource,
        pricing: &PricingTable,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();

        if is_excluded(resource, &self.config.exclude_tags) {
            debug!("Excluding volume {} due to tags", resource.id);
            return findings;
        }

        if !self.config.include_volume_types.contains(&resource.size_class) {
            return findings;
        }

        match &resource.state {
            ResourceState::Unattached => {
                findings.push(self.unattached_finding(resource, pricing));
            }
            ResourceState::Attached => {
                let (start, end) = trailing_window(self.config.days_to_check);
                let read_ops = metrics_source
                    .get_samples(
                        &resource.id,
                        ResourceKind::Storage,
                        READ_OPS_METRIC,
                        start,
                        end,
                        Statistic::Sum,
                    )
                    .await;
                let write_ops = metrics_source
                    .get_samples(
                        &resource.id,
                        ResourceKind::Storage,
                        WRITE_OPS_METRIC,
                        start,
                        end,
                        Statistic::Sum,
                    )
                    .await;

                if read_ops.is_empty() && write_ops.is_empty() {
                    warn!("No I/O metrics available for volume {}", resource.id);
                    return findings;
                }

                let total_read_ops: f64 = read_ops.iter().sum();
                let total_write_ops: f64 = write_ops.iter().sum();
                let daily_avg_ops =
                    (total_read_ops + total_write_ops) / self.config.days_to_check as f64;

                if daily_avg_ops < self.config.iops_threshold {
                    let size_gb = resource.size_gb.unwrap_or(0);
                    let monthly_cost =
                        pricing.monthly_storage_cost(&resource.size_class, size_gb);
                    // Half of the full deletion cost: the volume may still be needed
                    let monthly_savings = monthly_cost * 0.5;

                    findings.push(Finding::new(
                        resource,
                        IssueType::LowUtilization,
                        format!(
                            "Volume {} has low utilization: {:.1} operations/day average",
                            resource.id, daily_avg_ops
                        ),
                        monthly_savings,
                        "Review if the volume is needed or consider a smaller volume size",
                        iops_severity(daily_avg_ops),
                        json!({
                            "volume_type": resource.size_class,
                            "size_gb": size_gb,
                            "region": resource.region,
                            "daily_avg_operations": round2(daily_avg_ops),
                            "total_read_ops": total_read_ops,
                            "total_write_ops": total_write_ops,
                            "days_analyzed": self.config.days_to_check,
                        }),
                    ));
                }
            }
            _ => {}
        }

        findings
    }
}
