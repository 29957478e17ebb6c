//! Metrics source abstraction
//!
//! The finding engine consumes utilization metrics through this trait so
//! the threshold logic stays testable without CloudWatch access. A source
//! never raises to the caller: internal faults are swallowed, logged, and
//! reported as an empty sample sequence. An empty sequence means absence of
//! data, not zero utilization, and the engine must not emit a utilization
//! finding from it.

use crate::scan::types::ResourceKind;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Aggregation statistic applied per sample window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Average,
    Sum,
    Maximum,
}

impl Statistic {
    pub const fn as_str(self) -> &'static str {
        match self {
            Statistic::Average => "Average",
            Statistic::Sum => "Sum",
            Statistic::Maximum => "Maximum",
        }
    }
}

/// Provider of utilization metric samples
///
/// Returned samples are ordered by time ascending, one value per
/// aggregation period.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn get_samples(
        &self,
        resource_id: &str,
        kind: ResourceKind,
        metric_name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        statistic: Statistic,
    ) -> Vec<f64>;
}

/// Arithmetic mean of a sample sequence, None when empty
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// Largest sample in a sequence, None when empty
pub fn max(samples: &[f64]) -> Option<f64> {
    samples.iter().copied().fold(None, |acc, v| match acc {
        Some(m) if m >= v => Some(m),
        _ => Some(v),
    })
}
