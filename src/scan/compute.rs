//! Compute instance scanner
//!
//! Flags stopped instances and running instances whose trailing mean CPU
//! utilization falls below the configured threshold.

use crate::config::ComputeConfig;
use crate::metrics::{self, MetricsSource, Statistic};
use crate::pricing::{PricingTable, HOURS_PER_MONTH};
use crate::scan::types::{Finding, IssueType, Resource, ResourceKind, ResourceState, Severity};
use crate::scan::{is_excluded, round2, trailing_window, ResourceScanner};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

const CPU_METRIC: &str = "CPUUtilization";

/// Severity of a low-CPU finding for compute instances
pub fn cpu_severity(mean_cpu: f64) -> Severity {
    if mean_cpu < 1.0 {
        Severity::High
    } else {
        Severity::Medium
    }
}

pub struct ComputeScanner {
    config: ComputeConfig,
}

impl ComputeScanner {
    pub fn new(config: ComputeConfig) -> Self {
        Self { config }
    }

    fn stopped_finding(&self, resource: &Resource, pricing: &PricingTable) -> Finding {
        let monthly_savings = pricing.estimate_monthly_cost(
            ResourceKind::Compute,
            &resource.size_class,
            HOURS_PER_MONTH,
        );

        Finding::new(
            resource,
            IssueType::Stopped,
            format!(
                "Instance {} ({}) has been stopped",
                resource.id, resource.size_class
            ),
            monthly_savings,
            "Consider terminating if no longer needed, or start if required",
            Severity::Medium,
            json!({
                "size_class": resource.size_class,
                "region": resource.region,
                "created_at": resource.created_at.map(|t| t.to_rfc3339()),
            }),
        )
    }
}

#[async_trait]
impl ResourceScanner for ComputeScanner {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Compute
    }

    async fn evaluate(
        &self,
        resource: &Resource,
        metrics_source: &dyn MetricsSource,
        pricing: &PricingTable,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();

        if is_excluded(resource, &self.config.exclude_tags) {
            debug!("Excluding instance {} due to tags", resource.id);
            return findings;
        }

        if self
            .config
            .exclude_instance_types
            .contains(&resource.size_class)
        {
            return findings;
        }

        match &resource.state {
            ResourceState::Terminated => return findings,
            ResourceState::Stopped => {
                findings.push(self.stopped_finding(resource, pricing));
            }
            ResourceState::Running => {
                let (start, end) = trailing_window(self.config.days_to_check);
                let samples = metrics_source
                    .get_samples(
                        &resource.id,
                        ResourceKind::Compute,
                        CPU_METRIC,
                        start,
                        end,
                        Statistic::Average,
                    )
                    .await;

                let Some(avg_cpu) = metrics::mean(&samples) else {
                    // Might be a very new instance or metrics disabled
                    warn!("No CPU metrics available for instance {}", resource.id);
                    return findings;
                };
                let max_cpu = metrics::max(&samples).unwrap_or(avg_cpu);

                if avg_cpu < self.config.cpu_threshold {
                    let monthly_savings = pricing.estimate_monthly_cost(
                        ResourceKind::Compute,
                        &resource.size_class,
                        HOURS_PER_MONTH,
                    );

                    findings.push(Finding::new(
                        resource,
                        IssueType::LowUtilization,
                        format!(
                            "Instance {} has low CPU utilization: {:.1}% average",
                            resource.id, avg_cpu
                        ),
                        monthly_savings,
                        "Consider downsizing to a smaller instance type or terminating if unused",
                        cpu_severity(avg_cpu),
                        json!({
                            "size_class": resource.size_class,
                            "region": resource.region,
                            "avg_cpu_utilization": round2(avg_cpu),
                            "max_cpu_utilization": round2(max_cpu),
                            "days_analyzed": self.config.days_to_check,
                            "created_at": resource.created_at.map(|t| t.to_rfc3339()),
                        }),
                    ));
                }
            }
            _ => {}
        }

        findings
    }
}
