//! Report aggregation and console summary
//!
//! Merges per-kind finding sets into a single report with summary totals.
//! Totals are always recomputed in full from the finding list, never
//! incrementally, so they cannot drift from the findings they describe.

use crate::config::ScanConfig;
use crate::scan::types::{Finding, ResourceKind, Severity};
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Table};
use console::style;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregated result of one full scan across all resource kinds
///
/// Owns its finding sequence exclusively; findings keep per-kind scan order
/// and discovery order within a kind. Duplicate resource findings (two
/// issue types for one resource) are both retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub scan_timestamp: DateTime<Utc>,
    pub total_findings: usize,
    pub total_estimated_monthly_savings: f64,
    pub findings: Vec<Finding>,
    pub configuration: ScanConfig,
}

impl Report {
    /// Recompute summary totals from the finding list
    pub fn recompute_totals(findings: &[Finding]) -> (usize, f64) {
        let total_savings = findings
            .iter()
            .map(|f| f.estimated_monthly_savings)
            .sum::<f64>();
        (findings.len(), total_savings)
    }

    /// Findings grouped by kind, preserving discovery order within each group
    pub fn findings_by_kind(&self) -> Vec<(ResourceKind, Vec<&Finding>)> {
        let mut groups: Vec<(ResourceKind, Vec<&Finding>)> = Vec::new();
        for finding in &self.findings {
            match groups.iter_mut().find(|(k, _)| *k == finding.resource_kind) {
                Some((_, group)) => group.push(finding),
                None => groups.push((finding.resource_kind, vec![finding])),
            }
        }
        groups
    }
}

/// Merge per-kind results into a report, stamping the scan time
pub fn aggregate(
    kind_results: Vec<(ResourceKind, Vec<Finding>)>,
    config: &ScanConfig,
) -> Report {
    let findings: Vec<Finding> = kind_results
        .into_iter()
        .flat_map(|(_, findings)| findings)
        .collect();

    let (total_findings, total_estimated_monthly_savings) =
        Report::recompute_totals(&findings);

    Report {
        scan_timestamp: Utc::now(),
        total_findings,
        total_estimated_monthly_savings,
        findings,
        configuration: config.clone(),
    }
}

/// Print the human-facing scan summary to stdout
pub fn print_summary(report: &Report) {
    println!("{}", "=".repeat(80));
    println!("Idle Resource Scan Summary");
    println!("{}", "=".repeat(80));
    println!(
        "Timestamp: {}",
        report.scan_timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    let mut kind_counts: HashMap<ResourceKind, usize> = HashMap::new();
    for finding in &report.findings {
        *kind_counts.entry(finding.resource_kind).or_insert(0) += 1;
    }
    for kind in [
        ResourceKind::Compute,
        ResourceKind::Storage,
        ResourceKind::Database,
    ] {
        println!(
            "  {} {} finding(s)",
            style(format!("{}:", kind.label())).dim(),
            kind_counts.get(&kind).copied().unwrap_or(0)
        );
    }
    println!();

    if !report.findings.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            "Resource", "Kind", "Issue", "Severity", "Savings/mo",
        ]);

        for finding in &report.findings {
            let severity_cell = match finding.severity {
                Severity::High => {
                    Cell::new(finding.severity.as_str()).fg(comfy_table::Color::Red)
                }
                Severity::Medium => {
                    Cell::new(finding.severity.as_str()).fg(comfy_table::Color::Yellow)
                }
                Severity::Low => {
                    Cell::new(finding.severity.as_str()).fg(comfy_table::Color::Green)
                }
            };

            table.add_row(vec![
                Cell::new(&finding.resource_id),
                Cell::new(finding.resource_kind.as_str()),
                Cell::new(finding.issue_type.as_str()),
                severity_cell,
                Cell::new(format!("${:.2}", finding.estimated_monthly_savings)),
            ]);
        }

        println!("{table}");
        println!();
    }

    println!(
        "  {} {}",
        style("Total findings:").dim(),
        report.total_findings
    );
    println!(
        "  {} {}",
        style("Potential monthly savings:").dim(),
        style(format!("${:.2}", report.total_estimated_monthly_savings))
            .green()
            .bold()
    );
}
