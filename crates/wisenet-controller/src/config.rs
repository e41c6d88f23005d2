//! Controller configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use wisenet_protocol::NodeAddress;

/// Controller configuration, loaded from a YAML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Network id served by this controller
    #[serde(default = "default_network_id")]
    pub network_id: u8,

    /// The controller's sink address (`"high.low"`)
    #[serde(with = "addr_string", default = "default_sink")]
    pub sink: NodeAddress,

    /// Location of the path-metadata table
    #[serde(default = "default_paths_file")]
    pub paths_file: PathBuf,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

fn default_network_id() -> u8 {
    1
}

fn default_sink() -> NodeAddress {
    NodeAddress::new(0, 0)
}

fn default_paths_file() -> PathBuf {
    PathBuf::from("paths.txt")
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            network_id: default_network_id(),
            sink: default_sink(),
            paths_file: default_paths_file(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

/// Serialize a [`NodeAddress`] as its `"high.low"` string form
mod addr_string {
    use serde::{Deserialize, Deserializer, Serializer};
    use wisenet_protocol::NodeAddress;

    pub fn serialize<S: Serializer>(addr: &NodeAddress, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&addr.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NodeAddress, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
