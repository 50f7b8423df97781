//! # CLI Command Implementations
//!
//! Each command builds a report (serializable, so `--json-mode` can print
//! it as is) and then prints it.

use crate::samples::{make_ring, sample_man, tricky_samples};
use replica_core::{
    CopyConfig, DeepCopier, GraphCopier, ObjRef, PlanCache, ReplicaError, Value,
    distinct_structurally_equal,
};
use serde::Serialize;
use std::error::Error as _;

fn print_json<T: Serialize>(report: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(report).unwrap_or_default()
    );
}

fn text_of(object: &ObjRef, field: &str) -> Result<String, ReplicaError> {
    Ok(object.get(field)?.to_string())
}

// =============================================================================
// DEMO COMMAND
// =============================================================================

/// One side of the demo comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ManView {
    pub identity: String,
    pub name: String,
    pub age: String,
    pub books_identity: String,
    pub books: Vec<String>,
}

impl ManView {
    fn of(man: &ObjRef) -> Result<Self, ReplicaError> {
        let books = man.get("favorite_books")?;
        Ok(Self {
            identity: format!("{:?}", man),
            name: text_of(man, "name")?,
            age: text_of(man, "age")?,
            books_identity: books.to_string(),
            books: books
                .as_array()
                .map(|array| array.to_vec().iter().map(ToString::to_string).collect())
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    pub original: ManView,
    pub copy: ManView,
    pub independent_twin: bool,
}

/// Copy the sample person.
pub fn demo_report(config: &CopyConfig) -> Result<DemoReport, ReplicaError> {
    let original = sample_man("Sid", 91, &["dark-blue", "the second"])?;
    let copy = DeepCopier::new().with_config(config.clone()).copy(&original)?;

    Ok(DemoReport {
        original: ManView::of(&original)?,
        copy: ManView::of(&copy)?,
        independent_twin: distinct_structurally_equal(
            &Value::Object(original),
            &Value::Object(copy),
        ),
    })
}

/// Show a person and its copy side by side.
pub fn cmd_demo(config: &CopyConfig, json_mode: bool) -> Result<(), ReplicaError> {
    let report = demo_report(config)?;

    if json_mode {
        print_json(&report);
        return Ok(());
    }

    let rows = [
        ("Object", &report.original.identity, &report.copy.identity),
        ("Name", &report.original.name, &report.copy.name),
        ("Age", &report.original.age, &report.copy.age),
        (
            "Books",
            &report.original.books_identity,
            &report.copy.books_identity,
        ),
    ];

    println!("Replica Demo");
    println!("============");
    println!("{:<8} {:<28} {:<28}", "", "Original", "Copy");
    for (label, original, copy) in rows {
        println!("{:<8} {:<28} {:<28}", label, original, copy);
    }
    println!(
        "{:<8} {:<28} {:<28}",
        "",
        report.original.books.join(", "),
        report.copy.books.join(", ")
    );
    println!();
    println!("Independent twin: {}", report.independent_twin);

    Ok(())
}

// =============================================================================
// RING COMMAND
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RingReport {
    pub size: usize,
    pub visits: usize,
    pub copied_nodes: usize,
    pub independent_twin: bool,
}

/// Copy a ring of `size` cars.
pub fn ring_report(config: &CopyConfig, size: usize) -> Result<RingReport, ReplicaError> {
    if size == 0 {
        return Err(ReplicaError::InvalidConfig(
            "ring size must be at least 1".to_string(),
        ));
    }

    let head = Value::Object(make_ring(size)?);
    let mut copier = GraphCopier::new(PlanCache::global(), config);
    let copy = copier
        .copy(&head)
        .map_err(|cause| ReplicaError::CopyFailed {
            original: head.to_string(),
            cause,
        })?;

    tracing::info!(size, visits = copier.visits(), "ring copied");

    Ok(RingReport {
        size,
        visits: copier.visits(),
        copied_nodes: copier.copied_nodes(),
        independent_twin: distinct_structurally_equal(&head, &copy),
    })
}

/// Copy a circular chain of cars and report on it.
pub fn cmd_ring(config: &CopyConfig, json_mode: bool, size: usize) -> Result<(), ReplicaError> {
    let report = ring_report(config, size)?;

    if json_mode {
        print_json(&report);
        return Ok(());
    }

    println!("Replica Ring Copy");
    println!("=================");
    println!("Cars:             {}", report.size);
    println!("Nodes Visited:    {}", report.visits);
    println!("Nodes Copied:     {}", report.copied_nodes);
    println!("Ceiling:          {}", config.max_graph_size);
    println!("Independent Twin: {}", report.independent_twin);

    Ok(())
}

// =============================================================================
// TRICKY COMMAND
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TrickyOutcome {
    pub name: String,
    pub expectation: String,
    pub copied: bool,
    /// Top-level error followed by its causes, outermost first.
    pub errors: Vec<String>,
}

/// Copy every tricky sample. Copy failures are outcomes, not errors.
pub fn tricky_report(config: &CopyConfig) -> Result<Vec<TrickyOutcome>, ReplicaError> {
    let copier = DeepCopier::new().with_config(config.clone());

    let outcomes = tricky_samples()?
        .into_iter()
        .map(|sample| {
            let (copied, errors) = match copier.copy(&sample.original) {
                Ok(copy) => (
                    distinct_structurally_equal(
                        &Value::Object(sample.original),
                        &Value::Object(copy),
                    ),
                    Vec::new(),
                ),
                Err(err) => (false, error_chain(&err)),
            };
            TrickyOutcome {
                name: sample.name.to_string(),
                expectation: sample.expectation.to_string(),
                copied,
                errors,
            }
        })
        .collect();
    Ok(outcomes)
}

fn error_chain(err: &ReplicaError) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}

/// Copy objects with awkward constructors and print what happened.
pub fn cmd_tricky(config: &CopyConfig, json_mode: bool) -> Result<(), ReplicaError> {
    let outcomes = tricky_report(config)?;

    if json_mode {
        print_json(&outcomes);
        return Ok(());
    }

    println!("Replica Tricky Constructors");
    println!("===========================");
    for outcome in &outcomes {
        println!();
        println!("{} ({})", outcome.name, outcome.expectation);
        if outcome.copied {
            println!("  copied");
        }
        for (depth, message) in outcome.errors.iter().enumerate() {
            println!("  {}{}", "  ".repeat(depth), message);
        }
    }

    Ok(())
}
