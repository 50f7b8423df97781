//! Tests for TOML configuration loading and command-line overrides.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use replica::config::{AppConfig, resolve};
use replica_core::{CopyConfig, MAX_OBJECT_GRAPH_SIZE, ReplicaError};
use std::io::Write;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// =============================================================================
// PARSING
// =============================================================================

#[test]
fn test_empty_file_uses_defaults() {
    let config = AppConfig::from_toml("").unwrap();
    assert_eq!(config.copy, CopyConfig::default());
}

#[test]
fn test_copy_table_is_read() {
    let config = AppConfig::from_toml("[copy]\nmax_graph_size = 5000\n").unwrap();
    assert_eq!(config.copy.max_graph_size, 5000);
}

#[test]
fn test_unknown_keys_are_rejected() {
    let result = AppConfig::from_toml("[copy]\nmax_depth = 5\n");
    assert!(matches!(result, Err(ReplicaError::InvalidConfig(_))));

    let result = AppConfig::from_toml("[server]\nport = 80\n");
    assert!(matches!(result, Err(ReplicaError::InvalidConfig(_))));
}

#[test]
fn test_wrong_type_is_rejected() {
    let result = AppConfig::from_toml("[copy]\nmax_graph_size = \"big\"\n");
    assert!(matches!(result, Err(ReplicaError::InvalidConfig(_))));
}

// =============================================================================
// RESOLUTION
// =============================================================================

#[test]
fn test_no_file_no_override_is_default() {
    let config = resolve(None, None).unwrap();
    assert_eq!(config.max_graph_size, MAX_OBJECT_GRAPH_SIZE);
}

#[test]
fn test_file_is_loaded() {
    let file = config_file("[copy]\nmax_graph_size = 4200\n");
    let config = resolve(Some(file.path()), None).unwrap();
    assert_eq!(config.max_graph_size, 4200);
}

#[test]
fn test_flag_overrides_file() {
    let file = config_file("[copy]\nmax_graph_size = 4200\n");
    let config = resolve(Some(file.path()), Some(10)).unwrap();
    assert_eq!(config.max_graph_size, 10);
}

#[test]
fn test_zero_ceiling_is_rejected() {
    let result = resolve(None, Some(0));
    assert!(matches!(result, Err(ReplicaError::InvalidConfig(_))));

    let file = config_file("[copy]\nmax_graph_size = 0\n");
    let result = resolve(Some(file.path()), None);
    assert!(matches!(result, Err(ReplicaError::InvalidConfig(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = resolve(Some(dir.path().join("absent.toml").as_path()), None);
    assert!(matches!(result, Err(ReplicaError::IoError(_))));
}

#[test]
fn test_oversized_file_is_rejected() {
    let padding = "# padding\n".repeat(8 * 1024);
    let file = config_file(&padding);
    let result = resolve(Some(file.path()), None);
    assert!(matches!(result, Err(ReplicaError::InvalidConfig(_))));
}
