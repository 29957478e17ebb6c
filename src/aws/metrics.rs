//! CloudWatch-backed metrics source
//!
//! Wraps `GetMetricStatistics` with hourly periods. Faults never propagate:
//! any SDK error is logged and reported as an empty sample sequence, which
//! the finding engine treats as absence of data.

use crate::metrics::{MetricsSource, Statistic};
use crate::scan::types::ResourceKind;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudwatch::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudwatch::types::{Dimension, Statistic as CwStatistic};
use chrono::{DateTime, Utc};
use tracing::error;

const PERIOD_SECONDS: i32 = 3600;

/// Namespace and dimension name for a resource kind's metrics
const fn namespace_and_dimension(kind: ResourceKind) -> (&'static str, &'static str) {
    match kind {
        ResourceKind::Compute => ("AWS/EC2", "InstanceId"),
        ResourceKind::Storage => ("AWS/EBS", "VolumeId"),
        ResourceKind::Database => ("AWS/RDS", "DBInstanceIdentifier"),
    }
}

pub struct CloudWatchMetrics {
    client: aws_sdk_cloudwatch::Client,
}

impl CloudWatchMetrics {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudwatch::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl MetricsSource for CloudWatchMetrics {
    async fn get_samples(
        &self,
        resource_id: &str,
        kind: ResourceKind,
        metric_name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        statistic: Statistic,
    ) -> Vec<f64> {
        let (namespace, dimension_name) = namespace_and_dimension(kind);

        let dimension = match Dimension::builder()
            .name(dimension_name)
            .value(resource_id)
            .build()
        {
            Ok(dimension) => dimension,
            Err(e) => {
                error!("Invalid metric dimension for {}: {}", resource_id, e);
                return Vec::new();
            }
        };

        let cw_statistic = match statistic {
            Statistic::Average => CwStatistic::Average,
            Statistic::Sum => CwStatistic::Sum,
            Statistic::Maximum => CwStatistic::Maximum,
        };

        let result = self
            .client
            .get_metric_statistics()
            .namespace(namespace)
            .metric_name(metric_name)
            .dimensions(dimension)
            .start_time(AwsDateTime::from_secs(start.timestamp()))
            .end_time(AwsDateTime::from_secs(end.timestamp()))
            .period(PERIOD_SECONDS)
            .statistics(cw_statistic)
            .send()
            .await;

        match result {
            Ok(response) => {
                let mut datapoints = response.datapoints().to_vec();
                // Datapoints arrive unordered; samples must be time-ascending
                datapoints.sort_by_key(|d| d.timestamp().map(|t| t.secs()));
                datapoints
                    .iter()
                    .filter_map(|d| match statistic {
                        Statistic::Average => d.average(),
                        Statistic::Sum => d.sum(),
                        Statistic::Maximum => d.maximum(),
                    })
                    .collect()
            }
            Err(e) => {
                error!(
                    "Error getting CloudWatch metrics for {}: {}",
                    resource_id, e
                );
                Vec::new()
            }
        }
    }
}
