//! Report sinks
//!
//! Two built-in formats: a structured JSON serialization with every field
//! preserved, and a self-contained HTML document grouped by resource kind
//! with summary totals. A write failure propagates: the report is the
//! scan's only product.

use crate::error::{IdlectlError, Result};
use crate::report::Report;
use crate::scan::types::{Finding, Severity};
use crate::utils::{ensure_parent_dir, escape_html};
use std::path::Path;
use tracing::info;

/// Write a report to `path` in the requested format ("json" or "html")
pub fn write_report(report: &Report, format: &str, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(report)?;
            std::fs::write(path, json)?;
        }
        "html" => {
            let html = generate_html(report);
            std::fs::write(path, html)?;
        }
        _ => {
            return Err(IdlectlError::Validation {
                field: "format".to_string(),
                reason: format!("Unsupported report format: {}. Use 'json' or 'html'", format),
            });
        }
    }

    info!("Report written to {}", path.display());
    Ok(())
}

fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "high",
        Severity::Medium => "medium",
        Severity::Low => "low",
    }
}

fn push_finding(html: &mut String, finding: &Finding) {
    html.push_str(&format!(
        r#"            <div class="finding {}">
                <div class="finding-header">
                    <span class="resource-id">{}</span>
                    <span class="savings">${:.2}/month</span>
                </div>
                <p>{}</p>
                <div class="recommendation"><strong>Recommendation:</strong> {}</div>
                <div class="metadata">Severity: {} | Issue: {}</div>
"#,
        severity_class(finding.severity),
        escape_html(&finding.resource_id),
        finding.estimated_monthly_savings,
        escape_html(&finding.description),
        escape_html(&finding.recommendation),
        finding.severity,
        finding.issue_type.as_str(),
    ));

    if let Some(metadata) = finding.metadata.as_object() {
        if !metadata.is_empty() {
            html.push_str("                <div class=\"metadata\">");
            let details: Vec<String> = metadata
                .iter()
                .map(|(k, v)| format!("{}: {}", escape_html(k), escape_html(&v.to_string())))
                .collect();
            html.push_str(&details.join(" | "));
            html.push_str("</div>\n");
        }
    }

    html.push_str("            </div>\n");
}

/// Render the report as a self-contained HTML document
pub fn generate_html(report: &Report) -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Idle Resource Report</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }
        .container { max-width: 1200px; margin: 0 auto; background: white; padding: 20px; border-radius: 8px; }
        .header { text-align: center; margin-bottom: 30px; }
        .summary { display: flex; justify-content: space-around; margin-bottom: 30px; }
        .summary-card { background: #f8f9fa; padding: 20px; border-radius: 8px; text-align: center; min-width: 150px; }
        .summary-card .value { font-size: 2em; font-weight: bold; color: #28a745; }
        .kind-header { background: #007bff; color: white; padding: 10px; border-radius: 4px; }
        .finding { background: #f8f9fa; margin: 10px 0; padding: 15px; border-left: 4px solid #007bff; }
        .finding.high { border-left-color: #dc3545; }
        .finding.medium { border-left-color: #ffc107; }
        .finding.low { border-left-color: #28a745; }
        .finding-header { display: flex; justify-content: space-between; align-items: center; }
        .resource-id { font-family: monospace; background: #e9ecef; padding: 2px 6px; border-radius: 3px; }
        .savings { font-weight: bold; color: #28a745; }
        .recommendation { margin-top: 10px; padding: 10px; background: #e7f3ff; border-radius: 4px; }
        .metadata { margin-top: 10px; font-size: 0.9em; color: #666; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Idle Resource Report</h1>
"#,
    );

    html.push_str(&format!(
        "            <p>Generated on {}</p>\n        </div>\n",
        report.scan_timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    html.push_str(&format!(
        r#"        <div class="summary">
            <div class="summary-card">
                <h3>Total Findings</h3>
                <div class="value">{}</div>
            </div>
            <div class="summary-card">
                <h3>Potential Monthly Savings</h3>
                <div class="value">${:.2}</div>
            </div>
        </div>
"#,
        report.total_findings, report.total_estimated_monthly_savings
    ));

    for (kind, findings) in report.findings_by_kind() {
        html.push_str(&format!(
            "        <div class=\"kind-section\">\n            <h2 class=\"kind-header\">{} ({} finding(s))</h2>\n",
            escape_html(kind.label()),
            findings.len()
        ));
        for finding in findings {
            push_finding(&mut html, finding);
        }
        html.push_str("        </div>\n");
    }

    html.push_str("    </div>\n</body>\n</html>\n");
    html
}
