//! # Configuration
//!
//! Optional TOML file for the demo binary.
//!
//! ```toml
//! [copy]
//! max_graph_size = 5000
//! ```
//!
//! Precedence: `--max-graph-size` on the command line, then the file, then
//! the engine default.

use replica_core::{CopyConfig, ReplicaError};
use serde::Deserialize;
use std::path::Path;

/// Maximum config file size (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

/// Contents of a configuration file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub copy: CopyConfig,
}

impl AppConfig {
    /// Parse configuration text.
    pub fn from_toml(text: &str) -> Result<Self, ReplicaError> {
        toml::from_str(text).map_err(|e| ReplicaError::InvalidConfig(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ReplicaError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            ReplicaError::IoError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ReplicaError::InvalidConfig(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            ReplicaError::IoError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }
}

/// Resolve the effective copy configuration and validate it.
pub fn resolve(
    path: Option<&Path>,
    max_graph_size: Option<usize>,
) -> Result<CopyConfig, ReplicaError> {
    let mut config = match path {
        Some(path) => AppConfig::load(path)?.copy,
        None => CopyConfig::default(),
    };
    if let Some(max_graph_size) = max_graph_size {
        config.max_graph_size = max_graph_size;
    }
    config.validate()?;

    tracing::debug!(max_graph_size = config.max_graph_size, "copy configuration resolved");
    Ok(config)
}
