//! # Replica CLI Module
//!
//! This module implements the CLI interface for Replica.
//!
//! ## Available Commands
//!
//! - `demo` - Copy a sample person and show both side by side
//! - `ring` - Copy a circular chain of cars
//! - `tricky` - Copy objects with awkward constructors

mod commands;

use clap::{Parser, Subcommand};
use replica_core::ReplicaError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Replica - deep copies of arbitrary object graphs
///
/// Builds sample graphs, copies them and reports how the copy relates to
/// the original.
#[derive(Parser, Debug)]
#[command(name = "replica")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Maximum nodes visited per copy (overrides the config file)
    #[arg(short, long, global = true)]
    pub max_graph_size: Option<usize>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy a sample person with a reading list
    Demo,

    /// Copy a circular chain of cars
    Ring {
        /// Number of cars in the ring
        #[arg(short, long, default_value = "1000")]
        size: usize,
    },

    /// Copy objects whose constructors get in the way
    Tricky,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), ReplicaError> {
    let config = crate::config::resolve(cli.config.as_deref(), cli.max_graph_size)?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Ring { size }) => cmd_ring(&config, json_mode, size),
        Some(Commands::Tricky) => cmd_tricky(&config, json_mode),
        // No subcommand - run the demo by default
        Some(Commands::Demo) | None => cmd_demo(&config, json_mode),
    }
}
