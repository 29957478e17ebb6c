use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Tag-based opt-out that suppresses all findings for a resource
///
/// Either a bare tag key (matches any value) or a key/value pair. Value
/// comparison is string equality only; numeric tag values must be written
/// as strings in the config to match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExclusionRule {
    Key(String),
    Pair { key: String, value: String },
}

impl ExclusionRule {
    /// Whether any tag on the resource matches this rule
    pub fn matches(&self, tags: &[(String, String)]) -> bool {
        tags.iter().any(|(k, v)| match self {
            ExclusionRule::Key(key) => k == key,
            ExclusionRule::Pair { key, value } => k == key && v == value,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeConfig {
    /// Mean CPU percent below which a running instance is flagged
    pub cpu_threshold: f64,
    /// Trailing metric window in days
    pub days_to_check: u32,
    pub exclude_instance_types: Vec<String>,
    pub exclude_tags: Vec<ExclusionRule>,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            cpu_threshold: 5.0,
            days_to_check: 14,
            exclude_instance_types: vec!["t2.nano".to_string(), "t3.nano".to_string()],
            exclude_tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Mean CPU percent below which an available database is flagged
    pub cpu_threshold: f64,
    /// Mean connection count below which a database is flagged
    pub connection_threshold: f64,
    pub days_to_check: u32,
    pub exclude_engines: Vec<String>,
    /// Databases younger than this are too new to judge
    pub minimum_age_days: u32,
    pub exclude_tags: Vec<ExclusionRule>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            cpu_threshold: 10.0,
            connection_threshold: 5.0,
            days_to_check: 14,
            exclude_engines: Vec::new(),
            minimum_age_days: 7,
            exclude_tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub days_to_check: u32,
    /// Mean operations per day below which an attached volume is flagged
    pub iops_threshold: f64,
    pub exclude_tags: Vec<ExclusionRule>,
    pub include_volume_types: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            days_to_check: 7,
            iops_threshold: 1.0,
            exclude_tags: Vec::new(),
            include_volume_types: vec![
                "gp2".to_string(),
                "gp3".to_string(),
                "io1".to_string(),
                "io2".to_string(),
            ],
        }
    }
}

/// Immutable scan configuration passed down the call chain
///
/// Resolution is layered: built-in defaults, overridden by whatever fields
/// the loaded TOML document names, then validated and clamped once. Nothing
/// downstream mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub region: Option<String>,
    pub compute: ComputeConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

const MAX_DAYS_TO_CHECK: u32 = 90;

impl ScanConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .idlectl.toml in current dir, then ~/.config/idlectl/config.toml
            let local = PathBuf::from(".idlectl.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("idlectl").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".idlectl.toml"))
            }
        };

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: ScanConfig = toml::from_str(&content).map_err(|e| {
                ConfigError::ParseError(format!("{}: {}", config_path.display(), e))
            })?;
            config
        } else {
            if path.is_some() {
                warn!(
                    "Config file not found: {}, using default thresholds",
                    config_path.display()
                );
            }
            ScanConfig::default()
        };

        config.clamp_thresholds();
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Clamp out-of-range values with a warning instead of rejecting them
    ///
    /// CPU thresholds are percentages and cap at 100; metric windows are
    /// limited to 1..=90 days (CloudWatch retention at hourly resolution).
    pub fn clamp_thresholds(&mut self) {
        if self.compute.cpu_threshold > 100.0 {
            warn!("compute cpu_threshold > 100%, clamping to 100");
            self.compute.cpu_threshold = 100.0;
        }
        if self.database.cpu_threshold > 100.0 {
            warn!("database cpu_threshold > 100%, clamping to 100");
            self.database.cpu_threshold = 100.0;
        }

        for (section, days) in [
            ("compute", &mut self.compute.days_to_check),
            ("database", &mut self.database.days_to_check),
            ("storage", &mut self.storage.days_to_check),
        ] {
            if *days > MAX_DAYS_TO_CHECK {
                warn!("{} days_to_check > {}, clamping", section, MAX_DAYS_TO_CHECK);
                *days = MAX_DAYS_TO_CHECK;
            } else if *days < 1 {
                warn!("{} days_to_check < 1, clamping", section);
                *days = 1;
            }
        }
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = ScanConfig::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = ScanConfig::default();
        assert_eq!(config.compute.cpu_threshold, 5.0);
        assert_eq!(config.compute.days_to_check, 14);
        assert_eq!(config.database.cpu_threshold, 10.0);
        assert_eq!(config.database.connection_threshold, 5.0);
        assert_eq!(config.database.minimum_age_days, 7);
        assert_eq!(config.storage.days_to_check, 7);
        assert_eq!(config.storage.iops_threshold, 1.0);
        assert_eq!(config.storage.include_volume_types.len(), 4);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let config = ScanConfig::default();
        assert!(config.save(&config_path).is_ok());
        assert!(config_path.exists());

        let loaded = ScanConfig::load(Some(&config_path)).unwrap();
        assert_eq!(loaded.compute.cpu_threshold, config.compute.cpu_threshold);
        assert_eq!(loaded.storage.days_to_check, config.storage.days_to_check);
    }

    #[test]
    fn test_config_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let fake_path = temp_dir.path().join("nonexistent.toml");

        // Should return default config
        let config = ScanConfig::load(Some(&fake_path)).unwrap();
        assert_eq!(config.database.minimum_age_days, 7);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");
        std::fs::write(&config_path, "invalid toml content {").unwrap();

        let result = ScanConfig::load(Some(&config_path));
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        std::fs::write(&config_path, "[compute]\ncpu_threshold = 2.5\n").unwrap();

        let config = ScanConfig::load(Some(&config_path)).unwrap();
        assert_eq!(config.compute.cpu_threshold, 2.5);
        // Unnamed fields keep their defaults
        assert_eq!(config.compute.days_to_check, 14);
        assert_eq!(config.database.cpu_threshold, 10.0);
    }

    #[test]
    fn test_clamp_thresholds() {
        let mut config = ScanConfig::default();
        config.compute.cpu_threshold = 150.0;
        config.database.cpu_threshold = 101.0;
        config.compute.days_to_check = 365;
        config.storage.days_to_check = 0;

        config.clamp_thresholds();

        assert_eq!(config.compute.cpu_threshold, 100.0);
        assert_eq!(config.database.cpu_threshold, 100.0);
        assert_eq!(config.compute.days_to_check, 90);
        assert_eq!(config.storage.days_to_check, 1);
    }

    #[test]
    fn test_exclusion_rule_parsing() {
        let toml_str = r#"
[compute]
exclude_tags = ["Environment", { key = "Team", value = "platform" }]
"#;
        let config: ScanConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.compute.exclude_tags.len(), 2);
        assert_eq!(
            config.compute.exclude_tags[0],
            ExclusionRule::Key("Environment".to_string())
        );
    }

    #[test]
    fn test_exclusion_rule_matching() {
        let tags = vec![
            ("Environment".to_string(), "production".to_string()),
            ("Team".to_string(), "ml".to_string()),
        ];

        assert!(ExclusionRule::Key("Environment".to_string()).matches(&tags));
        assert!(!ExclusionRule::Key("Owner".to_string()).matches(&tags));
        assert!(ExclusionRule::Pair {
            key: "Team".to_string(),
            value: "ml".to_string()
        }
        .matches(&tags));
        // Value comparison is exact string equality
        assert!(!ExclusionRule::Pair {
            key: "Team".to_string(),
            value: "ML".to_string()
        }
        .matches(&tags));
    }
}
