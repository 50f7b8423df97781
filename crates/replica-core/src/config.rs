//! # Copy Configuration
//!
//! Tunables of the copy engine. Deserializable so that applications can load
//! them from their own configuration files.

use crate::primitives::MAX_OBJECT_GRAPH_SIZE;
use crate::types::ReplicaError;
use serde::{Deserialize, Serialize};

/// Configuration of one [`crate::DeepCopier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CopyConfig {
    /// Ceiling on nodes visited by one top-level copy.
    pub max_graph_size: usize,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            max_graph_size: MAX_OBJECT_GRAPH_SIZE,
        }
    }
}

impl CopyConfig {
    /// Configuration with a custom ceiling.
    #[must_use]
    pub fn with_max_graph_size(max_graph_size: usize) -> Self {
        Self { max_graph_size }
    }

    /// Reject configurations no copy could succeed under.
    pub fn validate(&self) -> Result<(), ReplicaError> {
        if self.max_graph_size == 0 {
            return Err(ReplicaError::InvalidConfig(
                "max_graph_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
