//! Tests for the demo commands and the reports they print.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use replica::cli::{Cli, Commands, demo_report, execute, ring_report, tricky_report};
use replica_core::{CopyConfig, CopyError, ReplicaError};

// =============================================================================
// ARGUMENT PARSING
// =============================================================================

#[test]
fn test_parse_ring_with_global_flags() {
    let cli = Cli::try_parse_from([
        "replica",
        "--max-graph-size",
        "5000",
        "ring",
        "--size",
        "2400",
        "--json-mode",
    ])
    .unwrap();

    assert_eq!(cli.max_graph_size, Some(5000));
    assert!(cli.json_mode);
    assert!(matches!(cli.command, Some(Commands::Ring { size: 2400 })));
}

#[test]
fn test_parse_defaults() {
    let cli = Cli::try_parse_from(["replica", "ring"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Ring { size: 1000 })));
    assert!(cli.config.is_none());
    assert!(!cli.quiet);
}

#[test]
fn test_execute_rejects_zero_ceiling() {
    let cli = Cli::try_parse_from(["replica", "--max-graph-size", "0", "--quiet", "demo"]).unwrap();
    assert!(matches!(execute(cli), Err(ReplicaError::InvalidConfig(_))));
}

// =============================================================================
// DEMO
// =============================================================================

#[test]
fn test_demo_copy_is_independent_twin() {
    let report = demo_report(&CopyConfig::default()).unwrap();

    assert!(report.independent_twin);
    assert_ne!(report.original.identity, report.copy.identity);
    assert_ne!(report.original.books_identity, report.copy.books_identity);
    assert_eq!(report.original.name, report.copy.name);
    assert_eq!(report.copy.name, "Sid");
    assert_eq!(report.copy.age, "91");
    assert_eq!(report.copy.books, vec!["dark-blue", "the second"]);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["independent_twin"], true);
}

// =============================================================================
// RING
// =============================================================================

#[test]
fn test_ring_counts_visits() {
    let report = ring_report(&CopyConfig::default(), 1000).unwrap();

    assert!(report.independent_twin);
    assert_eq!(report.copied_nodes, 1000);
    // car + id per car, then the closing link back to the head
    assert_eq!(report.visits, 2001);
}

#[test]
fn test_ring_above_ceiling_fails() {
    let err = ring_report(&CopyConfig::default(), 2000).unwrap_err();
    assert!(matches!(
        err.copy_error(),
        Some(CopyError::SizeLimit { limit: 3000, .. })
    ));
    assert!(err.to_string().starts_with("Unable to make deep copy of Car@"));
}

#[test]
fn test_ring_with_raised_ceiling() {
    let report = ring_report(&CopyConfig::with_max_graph_size(5000), 2000).unwrap();
    assert!(report.independent_twin);
}

#[test]
fn test_empty_ring_rejected() {
    let result = ring_report(&CopyConfig::default(), 0);
    assert!(matches!(result, Err(ReplicaError::InvalidConfig(_))));
}

// =============================================================================
// TRICKY
// =============================================================================

#[test]
fn test_tricky_outcomes() {
    let outcomes = tricky_report(&CopyConfig::default()).unwrap();
    assert_eq!(outcomes.len(), 4);

    let copied: Vec<bool> = outcomes.iter().map(|o| o.copied).collect();
    assert_eq!(copied, vec![true, true, false, false]);

    let non_canonical = &outcomes[2];
    assert!(non_canonical.errors[0].starts_with("Unable to make deep copy of HalfBuilt@"));
    assert_eq!(
        non_canonical.errors[1],
        "No canonical constructor HalfBuilt(int, Object)"
    );

    let general = &outcomes[3];
    assert_eq!(general.errors[1], "Failed instantiation for class: Grumpy");
    assert_eq!(
        general.errors.last().map(String::as_str),
        Some("illegal argument: intentional error")
    );
}
