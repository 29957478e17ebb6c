//! Shared test doubles for scanner and pipeline tests

// Not every test binary uses every fixture
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use idlectl::error::{IdlectlError, Result};
use idlectl::inventory::ResourceInventory;
use idlectl::metrics::{MetricsSource, Statistic};
use idlectl::scan::types::{Resource, ResourceKind, ResourceState};
use std::collections::HashMap;

/// Metrics source returning canned samples keyed by (resource id, metric name)
#[derive(Default)]
pub struct StaticMetrics {
    samples: HashMap<(String, String), Vec<f64>>,
}

impl StaticMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(
        mut self,
        resource_id: &str,
        metric_name: &str,
        samples: Vec<f64>,
    ) -> Self {
        self.samples.insert(
            (resource_id.to_string(), metric_name.to_string()),
            samples,
        );
        self
    }
}

#[async_trait]
impl MetricsSource for StaticMetrics {
    async fn get_samples(
        &self,
        resource_id: &str,
        _kind: ResourceKind,
        metric_name: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        _statistic: Statistic,
    ) -> Vec<f64> {
        self.samples
            .get(&(resource_id.to_string(), metric_name.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

/// Inventory returning a fixed resource list
pub struct StaticInventory {
    kind: ResourceKind,
    resources: Vec<Resource>,
}

impl StaticInventory {
    pub fn new(kind: ResourceKind, resources: Vec<Resource>) -> Self {
        Self { kind, resources }
    }
}

#[async_trait]
impl ResourceInventory for StaticInventory {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    async fn list_resources(&self) -> Result<Vec<Resource>> {
        Ok(self.resources.clone())
    }
}

/// Inventory that always fails, simulating a provider outage
pub struct FailingInventory {
    kind: ResourceKind,
}

impl FailingInventory {
    pub fn new(kind: ResourceKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl ResourceInventory for FailingInventory {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    async fn list_resources(&self) -> Result<Vec<Resource>> {
        Err(IdlectlError::Aws("simulated provider outage".to_string()))
    }
}

pub fn compute_resource(id: &str, size_class: &str, state: ResourceState) -> Resource {
    Resource {
        id: id.to_string(),
        kind: ResourceKind::Compute,
        size_class: size_class.to_string(),
        state,
        tags: Vec::new(),
        created_at: Some(Utc::now() - Duration::days(60)),
        region: "us-east-1".to_string(),
        size_gb: None,
        engine: None,
    }
}

pub fn storage_resource(
    id: &str,
    volume_type: &str,
    size_gb: i64,
    state: ResourceState,
    age_days: i64,
) -> Resource {
    Resource {
        id: id.to_string(),
        kind: ResourceKind::Storage,
        size_class: volume_type.to_string(),
        state,
        tags: Vec::new(),
        created_at: Some(Utc::now() - Duration::days(age_days)),
        region: "us-east-1".to_string(),
        size_gb: Some(size_gb),
        engine: None,
    }
}

pub fn database_resource(id: &str, size_class: &str, engine: &str, age_days: i64) -> Resource {
    Resource {
        id: id.to_string(),
        kind: ResourceKind::Database,
        size_class: size_class.to_string(),
        state: ResourceState::Available,
        tags: Vec::new(),
        created_at: Some(Utc::now() - Duration::days(age_days)),
        region: "us-east-1".to_string(),
        size_gb: None,
        engine: Some(engine.to_string()),
    }
}
