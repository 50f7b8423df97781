//! # Replica - Deep Copy Demo
//!
//! The demo binary for the Replica deep-copy engine.
//!
//! This application provides:
//! - CLI commands that build sample object graphs and copy them
//! - Optional TOML configuration of the copy ceiling
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │          apps/replica (THE BINARY)        │
//! │                                           │
//! │   ┌─────────────┐     ┌──────────────┐    │
//! │   │    CLI      │     │   Samples    │    │
//! │   │   (clap)    │     │  (Man, Car)  │    │
//! │   └──────┬──────┘     └──────┬───────┘    │
//! │          └─────────┬─────────┘            │
//! │                    ▼                      │
//! │           ┌────────────────┐              │
//! │           │  replica-core  │              │
//! │           │  (THE LOGIC)   │              │
//! │           └────────────────┘              │
//! └───────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! replica demo
//! replica ring --size 1000
//! replica tricky --json-mode
//! replica --config replica.toml --max-graph-size 5000 ring --size 2400
//! ```

use clap::Parser;
use replica::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing. REPLICA_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("REPLICA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "replica=info,replica_core=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Replica startup banner.
fn print_banner() {
    println!(
        r#"
  Replica v{}

  Independent • Cycle-safe • Aliasing-preserving
"#,
        env!("CARGO_PKG_VERSION")
    );
}
