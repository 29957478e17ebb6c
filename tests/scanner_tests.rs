//! Behavior tests for the per-kind finding scanners
//!
//! Each scanner is driven against canned resource snapshots and metric
//! sequences, covering exclusion short-circuits, state rules, threshold
//! comparisons, and severity escalation.

mod common;

use common::{compute_resource, database_resource, storage_resource, StaticMetrics};
use idlectl::config::{ComputeConfig, DatabaseConfig, ExclusionRule, StorageConfig};
use idlectl::pricing::PricingTable;
use idlectl::scan::types::{IssueType, ResourceState, Severity};
use idlectl::scan::{ComputeScanner, DatabaseScanner, ResourceScanner, StorageScanner};

fn pricing() -> PricingTable {
    PricingTable::new()
}

// ---------------------------------------------------------------------------
// Compute
// ---------------------------------------------------------------------------

#[tokio::test]
async fn compute_excluded_tag_suppresses_all_findings() {
    let config = ComputeConfig {
        exclude_tags: vec![ExclusionRule::Key("DoNotOptimize".to_string())],
        ..Default::default()
    };
    let scanner = ComputeScanner::new(config);

    let mut resource = compute_resource("i-1", "t3.micro", ResourceState::Stopped);
    resource.tags = vec![("DoNotOptimize".to_string(), "true".to_string())];

    let findings = scanner
        .evaluate(&resource, &StaticMetrics::new(), &pricing())
        .await;
    assert!(findings.is_empty());
}

#[tokio::test]
async fn compute_key_value_exclusion_requires_exact_value() {
    let config = ComputeConfig {
        exclude_tags: vec![ExclusionRule::Pair {
            key: "Environment".to_string(),
            value: "production".to_string(),
        }],
        ..Default::default()
    };
    let scanner = ComputeScanner::new(config);

    let mut resource = compute_resource("i-1", "t3.micro", ResourceState::Stopped);
    resource.tags = vec![("Environment".to_string(), "staging".to_string())];

    // Value differs, so the exclusion does not apply
    let findings = scanner
        .evaluate(&resource, &StaticMetrics::new(), &pricing())
        .await;
    assert_eq!(findings.len(), 1);
}

#[tokio::test]
async fn compute_terminated_yields_nothing() {
    let scanner = ComputeScanner::new(ComputeConfig::default());
    let resource = compute_resource("i-1", "t3.micro", ResourceState::Terminated);

    let findings = scanner
        .evaluate(&resource, &StaticMetrics::new(), &pricing())
        .await;
    assert!(findings.is_empty());
}

#[tokio::test]
async fn compute_excluded_instance_type_skipped() {
    let scanner = ComputeScanner::new(ComputeConfig::default());
    // t3.nano is in the default exclude list
    let resource = compute_resource("i-1", "t3.nano", ResourceState::Stopped);

    let findings = scanner
        .evaluate(&resource, &StaticMetrics::new(), &pricing())
        .await;
    assert!(findings.is_empty());
}

#[tokio::test]
async fn compute_stopped_instance_priced_by_size_class() {
    let scanner = ComputeScanner::new(ComputeConfig::default());
    let resource = compute_resource("i-1", "t2.micro", ResourceState::Stopped);

    let findings = scanner
        .evaluate(&resource, &StaticMetrics::new(), &pricing())
        .await;

    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.issue_type, IssueType::Stopped);
    assert_eq!(finding.severity, Severity::Medium);
    // 0.0116/hr * 730 hours
    assert!((finding.estimated_monthly_savings - 8.468).abs() < 0.001);
}

#[tokio::test]
async fn compute_low_cpu_severity_escalates_below_one_percent() {
    let scanner = ComputeScanner::new(ComputeConfig::default());
    let resource = compute_resource("i-1", "t3.micro", ResourceState::Running);

    let metrics = StaticMetrics::new().with_samples("i-1", "CPUUtilization", vec![0.4, 0.5, 0.6]);
    let findings = scanner.evaluate(&resource, &metrics, &pricing()).await;

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].issue_type, IssueType::LowUtilization);
    assert_eq!(findings[0].severity, Severity::High);
    assert_eq!(findings[0].metadata["avg_cpu_utilization"], 0.5);
    assert_eq!(findings[0].metadata["max_cpu_utilization"], 0.6);
}

#[tokio::test]
async fn compute_low_cpu_above_one_percent_is_medium() {
    let scanner = ComputeScanner::new(ComputeConfig::default());
    let resource = compute_resource("i-1", "t3.micro", ResourceState::Running);

    let metrics = StaticMetrics::new().with_samples("i-1", "CPUUtilization", vec![4.0, 4.0]);
    let findings = scanner.evaluate(&resource, &metrics, &pricing()).await;

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Medium);
}

#[tokio::test]
async fn compute_busy_instance_yields_nothing() {
    let scanner = ComputeScanner::new(ComputeConfig::default());
    let resource = compute_resource("i-1", "t3.micro", ResourceState::Running);

    let metrics = StaticMetrics::new().with_samples("i-1", "CPUUtilization", vec![40.0, 60.0]);
    let findings = scanner.evaluate(&resource, &metrics, &pricing()).await;

    assert!(findings.is_empty());
}

#[tokio::test]
async fn compute_missing_metrics_never_flags() {
    let scanner = ComputeScanner::new(ComputeConfig::default());
    let resource = compute_resource("i-1", "t3.micro", ResourceState::Running);

    // No samples registered: absence of data, not zero utilization
    let findings = scanner
        .evaluate(&resource, &StaticMetrics::new(), &pricing())
        .await;
    assert!(findings.is_empty());
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn storage_unattached_old_volume_is_high_severity() {
    let scanner = StorageScanner::new(StorageConfig::default());
    let resource = storage_resource("vol-1", "gp2", 100, ResourceState::Unattached, 45);

    let findings = scanner
        .evaluate(&resource, &StaticMetrics::new(), &pricing())
        .await;

    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.issue_type, IssueType::Unattached);
    assert_eq!(finding.severity, Severity::High);
    // 100 GB * $0.10/GB-month
    assert!((finding.estimated_monthly_savings - 10.0).abs() < 1e-9);
}

#[tokio::test]
async fn storage_excluded_tag_suppresses_all_findings() {
    let config = StorageConfig {
        exclude_tags: vec![ExclusionRule::Key("KeepForever".to_string())],
        ..Default::default()
    };
    let scanner = StorageScanner::new(config);

    let mut resource = storage_resource("vol-1", "gp2", 100, ResourceState::Unattached, 45);
    resource.tags = vec![("KeepForever".to_string(), "yes".to_string())];

    let findings = scanner
        .evaluate(&resource, &StaticMetrics::new(), &pricing())
        .await;
    assert!(findings.is_empty());
}

#[tokio::test]
async fn storage_unattached_recent_volume_is_medium() {
    let scanner = StorageScanner::new(StorageConfig::default());
    let resource = storage_resource("vol-1", "gp2", 100, ResourceState::Unattached, 10);

    let findings = scanner
        .evaluate(&resource, &StaticMetrics::new(), &pricing())
        .await;

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Medium);
}

#[tokio::test]
async fn storage_volume_type_outside_include_list_skipped() {
    let scanner = StorageScanner::new(StorageConfig::default());
    let resource = storage_resource("vol-1", "standard", 100, ResourceState::Unattached, 45);

    let findings = scanner
        .evaluate(&resource, &StaticMetrics::new(), &pricing())
        .await;
    assert!(findings.is_empty());
}

#[tokio::test]
async fn storage_idle_attached_volume_savings_are_halved() {
    let scanner = StorageScanner::new(StorageConfig::default());
    let resource = storage_resource("vol-1", "gp2", 100, ResourceState::Attached, 45);

    let metrics = StaticMetrics::new()
        .with_samples("vol-1", "VolumeReadOps", vec![0.0, 0.0])
        .with_samples("vol-1", "VolumeWriteOps", vec![0.0]);
    let findings = scanner.evaluate(&resource, &metrics, &pricing()).await;

    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.issue_type, IssueType::LowUtilization);
    // Zero activity escalates over merely-low activity
    assert_eq!(finding.severity, Severity::Medium);
    // Half of the $10.00 full deletion cost
    assert!((finding.estimated_monthly_savings - 5.0).abs() < 1e-9);
}

#[tokio::test]
async fn storage_low_but_nonzero_activity_is_low_severity() {
    let scanner = StorageScanner::new(StorageConfig::default());
    let resource = storage_resource("vol-1", "gp2", 100, ResourceState::Attached, 45);

    // 3.5 total ops over the default 7-day window -> 0.5 ops/day
    let metrics = StaticMetrics::new()
        .with_samples("vol-1", "VolumeReadOps", vec![2.0])
        .with_samples("vol-1", "VolumeWriteOps", vec![1.5]);
    let findings = scanner.evaluate(&resource, &metrics, &pricing()).await;

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Low);
}

#[tokio::test]
async fn storage_missing_metrics_never_flags() {
    let scanner = StorageScanner::new(StorageConfig::default());
    let resource = storage_resource("vol-1", "gp2", 100, ResourceState::Attached, 45);

    let findings = scanner
        .evaluate(&resource, &StaticMetrics::new(), &pricing())
        .await;
    assert!(findings.is_empty());
}

#[tokio::test]
async fn storage_busy_volume_yields_nothing() {
    let scanner = StorageScanner::new(StorageConfig::default());
    let resource = storage_resource("vol-1", "gp2", 100, ResourceState::Attached, 45);

    let metrics = StaticMetrics::new()
        .with_samples("vol-1", "VolumeReadOps", vec![5000.0])
        .with_samples("vol-1", "VolumeWriteOps", vec![5000.0]);
    let findings = scanner.evaluate(&resource, &metrics, &pricing()).await;

    assert!(findings.is_empty());
}

// ---------------------------------------------------------------------------
// Database
// ---------------------------------------------------------------------------

#[tokio::test]
async fn database_low_cpu_and_low_connections_both_fire() {
    let scanner = DatabaseScanner::new(DatabaseConfig::default());
    let resource = database_resource("db-1", "db.t3.micro", "postgres", 10);

    let metrics = StaticMetrics::new()
        .with_samples("db-1", "CPUUtilization", vec![0.5, 0.5])
        .with_samples("db-1", "DatabaseConnections", vec![0.2, 0.2]);
    let findings = scanner.evaluate(&resource, &metrics, &pricing()).await;

    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0].issue_type, IssueType::LowUtilization);
    assert_eq!(findings[0].severity, Severity::High);
    assert_eq!(findings[1].issue_type, IssueType::LowConnectionCount);
    assert_eq!(findings[1].severity, Severity::High);
}

#[tokio::test]
async fn database_excluded_tag_suppresses_all_findings() {
    let config = DatabaseConfig {
        exclude_tags: vec![ExclusionRule::Pair {
            key: "Environment".to_string(),
            value: "production".to_string(),
        }],
        ..Default::default()
    };
    let scanner = DatabaseScanner::new(config);

    let mut resource = database_resource("db-1", "db.t3.micro", "postgres", 30);
    resource.tags = vec![("Environment".to_string(), "production".to_string())];

    let metrics = StaticMetrics::new()
        .with_samples("db-1", "CPUUtilization", vec![0.1])
        .with_samples("db-1", "DatabaseConnections", vec![0.0]);
    let findings = scanner.evaluate(&resource, &metrics, &pricing()).await;

    assert!(findings.is_empty());
}

#[tokio::test]
async fn database_not_available_yields_nothing() {
    let scanner = DatabaseScanner::new(DatabaseConfig::default());
    let mut resource = database_resource("db-1", "db.t3.micro", "postgres", 10);
    resource.state = ResourceState::Other("stopped".to_string());

    let metrics = StaticMetrics::new()
        .with_samples("db-1", "CPUUtilization", vec![0.1])
        .with_samples("db-1", "DatabaseConnections", vec![0.0]);
    let findings = scanner.evaluate(&resource, &metrics, &pricing()).await;

    assert!(findings.is_empty());
}

#[tokio::test]
async fn database_too_new_to_judge() {
    let scanner = DatabaseScanner::new(DatabaseConfig::default());
    // 3 days old, below the default 7-day minimum
    let resource = database_resource("db-1", "db.t3.micro", "postgres", 3);

    let metrics = StaticMetrics::new()
        .with_samples("db-1", "CPUUtilization", vec![0.1])
        .with_samples("db-1", "DatabaseConnections", vec![0.0]);
    let findings = scanner.evaluate(&resource, &metrics, &pricing()).await;

    assert!(findings.is_empty());
}

#[tokio::test]
async fn database_unknown_age_passes_gate() {
    let scanner = DatabaseScanner::new(DatabaseConfig::default());
    let mut resource = database_resource("db-1", "db.t3.micro", "postgres", 10);
    resource.created_at = None;

    let metrics = StaticMetrics::new()
        .with_samples("db-1", "CPUUtilization", vec![0.5])
        .with_samples("db-1", "DatabaseConnections", vec![50.0]);
    let findings = scanner.evaluate(&resource, &metrics, &pricing()).await;

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].issue_type, IssueType::LowUtilization);
}

#[tokio::test]
async fn database_excluded_engine_skipped() {
    let config = DatabaseConfig {
        exclude_engines: vec!["aurora-mysql".to_string()],
        ..Default::default()
    };
    let scanner = DatabaseScanner::new(config);
    let resource = database_resource("db-1", "db.t3.micro", "aurora-mysql", 30);

    let metrics = StaticMetrics::new()
        .with_samples("db-1", "CPUUtilization", vec![0.1])
        .with_samples("db-1", "DatabaseConnections", vec![0.0]);
    let findings = scanner.evaluate(&resource, &metrics, &pricing()).await;

    assert!(findings.is_empty());
}

#[tokio::test]
async fn database_moderate_cpu_is_medium_and_connections_quiet() {
    let scanner = DatabaseScanner::new(DatabaseConfig::default());
    let resource = database_resource("db-1", "db.t3.micro", "postgres", 30);

    let metrics = StaticMetrics::new()
        .with_samples("db-1", "CPUUtilization", vec![5.0, 5.0])
        .with_samples("db-1", "DatabaseConnections", vec![10.0, 10.0]);
    let findings = scanner.evaluate(&resource, &metrics, &pricing()).await;

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].issue_type, IssueType::LowUtilization);
    assert_eq!(findings[0].severity, Severity::Medium);
}

#[tokio::test]
async fn database_missing_metrics_never_flags() {
    let scanner = DatabaseScanner::new(DatabaseConfig::default());
    let resource = database_resource("db-1", "db.t3.micro", "postgres", 30);

    let findings = scanner
        .evaluate(&resource, &StaticMetrics::new(), &pricing())
        .await;
    assert!(findings.is_empty());
}
