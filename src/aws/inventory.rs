//! AWS resource inventories
//!
//! One inventory per kind, each a single describe call mapped onto the
//! engine's `Resource` snapshot. SDK failures are surfaced as `Inventory`
//! errors; the scan loop handles them at the kind boundary.

use crate::error::{IdlectlError, Result};
use crate::inventory::ResourceInventory;
use crate::scan::types::{Resource, ResourceKind, ResourceState};
use async_trait::async_trait;
use aws_config::SdkConfig;

fn inventory_error(kind: ResourceKind, message: String) -> IdlectlError {
    IdlectlError::Inventory {
        kind,
        message,
        source: None,
    }
}

/// EC2 instance inventory
pub struct Ec2Inventory {
    client: aws_sdk_ec2::Client,
    region: String,
}

impl Ec2Inventory {
    pub fn new(sdk_config: &SdkConfig, region: String) -> Self {
        Self {
            client: aws_sdk_ec2::Client::new(sdk_config),
            region,
        }
    }
}

#[async_trait]
impl ResourceInventory for Ec2Inventory {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Compute
    }

    async fn list_resources(&self) -> Result<Vec<Resource>> {
        let response = self.client.describe_instances().send().await.map_err(|e| {
            inventory_error(
                ResourceKind::Compute,
                format!("Failed to list instances: {}", e),
            )
        })?;

        let mut resources = Vec::new();
        for reservation in response.reservations() {
            for instance in reservation.instances() {
                let Some(instance_id) = instance.instance_id() else {
                    continue;
                };

                let size_class = instance
                    .instance_type()
                    .map(|t| t.as_str().to_string())
                    .unwrap_or_else(|| "unknown".to_string());

                let state = match instance
                    .state()
                    .and_then(|s| s.name())
                    .map(|s| s.as_str())
                {
                    Some("running") => ResourceState::Running,
                    Some("stopped") => ResourceState::Stopped,
                    Some("terminated") => ResourceState::Terminated,
                    Some(other) => ResourceState::Other(other.to_string()),
                    None => ResourceState::Other("unknown".to_string()),
                };

                let tags: Vec<(String, String)> = instance
                    .tags()
                    .iter()
                    .filter_map(|tag| {
                        tag.key()
                            .zip(tag.value())
                            .map(|(k, v)| (k.to_string(), v.to_string()))
                    })
                    .collect();

                let created_at = instance
                    .launch_time()
                    .and_then(|t| chrono::DateTime::from_timestamp(t.secs(), 0));

                resources.push(Resource {
                    id: instance_id.to_string(),
                    kind: ResourceKind::Compute,
                    size_class,
                    state,
                    tags,
                    created_at,
                    region: self.region.clone(),
                    size_gb: None,
                    engine: None,
                });
            }
        }

        Ok(resources)
    }
}

/// EBS volume inventory
pub struct EbsInventory {
    client: aws_sdk_ec2::Client,
    region: String,
}

impl EbsInventory {
    pub fn new(sdk_config: &SdkConfig, region: String) -> Self {
        Self {
            client: aws_sdk_ec2::Client::new(sdk_config),
            region,
        }
    }
}

#[async_trait]
impl ResourceInventory for EbsInventory {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Storage
    }

    async fn list_resources(&self) -> Result<Vec<Resource>> {
        let response = self.client.describe_volumes().send().await.map_err(|e| {
            inventory_error(
                ResourceKind::Storage,
                format!("Failed to list volumes: {}", e),
            )
        })?;

        let mut resources = Vec::new();
        for volume in response.volumes() {
            let Some(volume_id) = volume.volume_id() else {
                continue;
            };

            let size_class = volume
                .volume_type()
                .map(|t| t.as_str().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            // "available" means unattached for EBS
            let state = match volume.state().map(|s| s.as_str()) {
                Some("available") => ResourceState::Unattached,
                Some("in-use") => ResourceState::Attached,
                Some(other) => ResourceState::Other(other.to_string()),
                None => ResourceState::Other("unknown".to_string()),
            };

            let tags: Vec<(String, String)> = volume
                .tags()
                .iter()
                .filter_map(|tag| {
                    tag.key()
                        .zip(tag.value())
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                })
                .collect();

            let created_at = volume
                .create_time()
                .and_then(|t| chrono::DateTime::from_timestamp(t.secs(), 0));

            resources.push(Resource {
                id: volume_id.to_string(),
                kind: ResourceKind::Storage,
                size_class,
                state,
                tags,
                created_at,
                region: self.region.clone(),
                size_gb: volume.size().map(|s| s as i64),
                engine: None,
            });
        }

        Ok(resources)
    }
}

/// RDS database instance inventory
pub struct RdsInventory {
    client: aws_sdk_rds::Client,
    region: String,
}

impl RdsInventory {
    pub fn new(sdk_config: &SdkConfig, region: String) -> Self {
        Self {
            client: aws_sdk_rds::Client::new(sdk_config),
            region,
        }
    }
}

#[async_trait]
impl ResourceInventory for RdsInventory {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Database
    }

    async fn list_resources(&self) -> Result<Vec<Resource>> {
        let response = self
            .client
            .describe_db_instances()
            .send()
            .await
            .map_err(|e| {
                inventory_error(
                    ResourceKind::Database,
                    format!("Failed to list database instances: {}", e),
                )
            })?;

        let mut resources = Vec::new();
        for db_instance in response.db_instances() {
            let Some(db_identifier) = db_instance.db_instance_identifier() else {
                continue;
            };

            let size_class = db_instance
                .db_instance_class()
                .unwrap_or("unknown")
                .to_string();

            let state = match db_instance.db_instance_status() {
                Some("available") => ResourceState::Available,
                Some(other) => ResourceState::Other(other.to_string()),
                None => ResourceState::Other("unknown".to_string()),
            };

            let tags: Vec<(String, String)> = db_instance
                .tag_list()
                .iter()
                .filter_map(|tag| {
                    tag.key()
                        .zip(tag.value())
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                })
                .collect();

            let created_at = db_instance
                .instance_create_time()
                .and_then(|t| chrono::DateTime::from_timestamp(t.secs(), 0));

            resources.push(Resource {
                id: db_identifier.to_string(),
                kind: ResourceKind::Database,
                size_class,
                state,
                tags,
                created_at,
                region: self.region.clone(),
                size_gb: None,
                engine: db_instance.engine().map(|e| e.to_string()),
            });
        }

        Ok(resources)
    }
}
