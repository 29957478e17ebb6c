//! Database instance scanner
//!
//! Flags available databases with low trailing CPU utilization and, as an
//! independent check, low connection counts. One database may yield both
//! findings in a single scan.

use crate::config::DatabaseConfig;
use crate::metrics::{self, MetricsSource, Statistic};
use crate::pricing::{PricingTable, HOURS_PER_MONTH};
use crate::scan::types::{Finding, IssueType, Resource, ResourceKind, ResourceState, Severity};
use crate::scan::{is_excluded, round2, trailing_window, ResourceScanner};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

const CPU_METRIC: &str = "CPUUtilization";
const CONNECTIONS_METRIC: &str = "DatabaseConnections";

/// Severity of a low-CPU finding for databases
pub fn cpu_severity(mean_cpu: f64) -> Severity {
    if mean_cpu < 2.0 {
        Severity::High
    } else {
        Severity::Medium
    }
}

/// Severity of a low-connection-count finding
pub fn connection_severity(mean_connections: f64) -> Severity {
    if mean_connections < 1.0 {
        Severity::High
    } else {
        Severity::Medium
    }
}

pub struct DatabaseScanner {
    config: DatabaseConfig,
}

impl DatabaseScanner {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    async fn check_cpu(
        &self,
        resource: &Resource,
        metrics_source: &dyn MetricsSource,
        pricing: &PricingTable,
    ) -> Option<Finding> {
        let (start, end) = trailing_window(self.config.days_to_check);
        let samples = metrics_source
            .get_samples(
                &resource.id,
                ResourceKind::Database,
                CPU_METRIC,
                start,
                end,
                Statistic::Average,
            )
            .await;

        let Some(avg_cpu) = metrics::mean(&samples) else {
            warn!("No CPU metrics available for database {}", resource.id);
            return None;
        };

        if avg_cpu >= self.config.cpu_threshold {
            return None;
        }

        let monthly_savings = pricing.estimate_monthly_cost(
            ResourceKind::Database,
            &resource.size_class,
            HOURS_PER_MONTH,
        );

        Some(Finding::new(
            resource,
            IssueType::LowUtilization,
            format!(
                "Database instance {} has low CPU utilization: {:.1}% average",
                resource.id, avg_cpu
            ),
            monthly_savings,
            "Consider downsizing to a smaller instance class or review if the database is needed",
            cpu_severity(avg_cpu),
            json!({
                "size_class": resource.size_class,
                "engine": resource.engine,
                "region": resource.region,
                "avg_cpu_utilization": round2(avg_cpu),
                "days_analyzed": self.config.days_to_check,
            }),
        ))
    }

    async fn check_connections(
        &self,
        resource: &Resource,
        metrics_source: &dyn MetricsSource,
        pricing: &PricingTable,
    ) -> Option<Finding> {
        let (start, end) = trailing_window(self.config.days_to_check);
        let samples = metrics_source
            .get_samples(
                &resource.id,
                ResourceKind::Database,
                CONNECTIONS_METRIC,
                start,
                end,
                Statistic::Average,
            )
            .await;

        let Some(avg_connections) = metrics::mean(&samples) else {
            warn!(
                "No connection metrics available for database {}",
                resource.id
            );
            return None;
        };

        if avg_connections >= self.config.connection_threshold {
            return None;
        }

        let monthly_savings = pricing.estimate_monthly_cost(
            ResourceKind::Database,
            &resource.size_class,
            HOURS_PER_MONTH,
        );

        Some(Finding::new(
            resource,
            IssueType::LowConnectionCount,
            format!(
                "Database instance {} has low connection count: {:.1} average",
                resource.id, avg_connections
            ),
            monthly_savings,
            "Review if the database is actively used or consider consolidating databases",
            connection_severity(avg_connections),
            json!({
                "size_class": resource.size_class,
                "engine": resource.engine,
                "region": resource.region,
                "avg_connections": round2(avg_connections),
                "days_analyzed": self.config.days_to_check,
            }),
        ))
    }
}

#[async_trait]
impl ResourceScanner for DatabaseScanner {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Database
    }

    async fn evaluate(
        &self,
        resource: &Resource,
        metrics_source: &dyn MetricsSource,
        pricing: &PricingTable,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();

        if is_excluded(resource, &self.config.exclude_tags) {
            debug!("Excluding database {} due to tags", resource.id);
            return findings;
        }

        if resource.state != ResourceState::Available {
            return findings;
        }

        if let Some(engine) = &resource.engine {
            if self.config.exclude_engines.contains(engine) {
                return findings;
            }
        }

        // Too new to judge; unknown creation time passes the gate
        if let Some(age_days) = resource.age_days(chrono::Utc::now()) {
            if age_days < self.config.minimum_age_days as i64 {
                debug!(
                    "Skipping database {} - too new ({} days)",
                    resource.id, age_days
                );
                return findings;
            }
        }

        // CPU and connection checks are independent; both may fire
        if let Some(finding) = self.check_cpu(resource, metrics_source, pricing).await {
            findings.push(finding);
        }
        if let Some(finding) = self
            .check_connections(resource, metrics_source, pricing)
            .await
        {
            findings.push(finding);
        }

        findings
    }
}
