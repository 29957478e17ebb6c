//! Type definitions for the finding engine
//!
//! Contains data structures for representing scanned resources and the
//! findings they yield. Resources are read-only snapshots fetched once per
//! scan; findings are immutable once constructed and are never mutated by
//! the aggregation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of cloud object under evaluation
///
/// Determines which inventory, metrics namespace, and rule set apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Compute,
    Storage,
    Database,
}

impl ResourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Compute => "compute",
            ResourceKind::Storage => "storage",
            ResourceKind::Database => "database",
        }
    }

    /// Human-facing label used in report headings
    pub const fn label(self) -> &'static str {
        match self {
            ResourceKind::Compute => "Compute (EC2)",
            ResourceKind::Storage => "Storage (EBS)",
            ResourceKind::Database => "Database (RDS)",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource states across all kinds
///
/// Compute uses Running/Stopped/Terminated, storage uses
/// Attached/Unattached, databases use Available. Anything a provider
/// reports that does not map onto these lands in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceState {
    Running,
    Stopped,
    Terminated,
    Attached,
    Unattached,
    Available,
    Other(String),
}

/// A cloud resource snapshot under evaluation
///
/// `size_class` is the pricing tier: instance type for compute, volume type
/// for storage, instance class for databases. `size_gb` is only populated
/// for storage volumes and `engine` only for databases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub kind: ResourceKind,
    pub size_class: String,
    pub state: ResourceState,
    pub tags: Vec<(String, String)>,
    pub created_at: Option<DateTime<Utc>>,
    pub region: String,
    pub size_gb: Option<i64>,
    pub engine: Option<String>,
}

impl Resource {
    /// Days elapsed since the resource was created, if known
    pub fn age_days(&self, now: DateTime<Utc>) -> Option<i64> {
        self.created_at
            .map(|t| now.signed_duration_since(t).num_days())
    }
}

/// Type of cost-saving issue detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Stopped,
    Unattached,
    LowUtilization,
    LowConnectionCount,
}

impl IssueType {
    pub const fn as_str(self) -> &'static str {
        match self {
            IssueType::Stopped => "stopped",
            IssueType::Unattached => "unattached",
            IssueType::LowUtilization => "low_utilization",
            IssueType::LowConnectionCount => "low_connection_count",
        }
    }
}

/// Finding severity, ordered from least to most urgent
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected cost-saving opportunity
///
/// Tied to one resource and one issue type. `metadata` carries the size
/// class, region, and the statistic values that triggered the finding, so a
/// reviewer can audit the decision without re-querying metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub resource_id: String,
    pub resource_kind: ResourceKind,
    pub issue_type: IssueType,
    pub description: String,
    pub estimated_monthly_savings: f64,
    pub recommendation: String,
    pub severity: Severity,
    pub metadata: serde_json::Value,
    pub detected_at: DateTime<Utc>,
}

impl Finding {
    /// Build a finding with the detection timestamp stamped at construction
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resource: &Resource,
        issue_type: IssueType,
        description: impl Into<String>,
        estimated_monthly_savings: f64,
        recommendation: impl Into<String>,
        severity: Severity,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            resource_id: resource.id.clone(),
            resource_kind: resource.kind,
            issue_type,
            description: description.into(),
            estimated_monthly_savings: estimated_monthly_savings.max(0.0),
            recommendation: recommendation.into(),
            severity,
            metadata,
            detected_at: Utc::now(),
        }
    }
}
