//! # Engine Primitives
//!
//! Hardcoded runtime constants for the Replica copy engine.
//!
//! These are compiled into the binary. Only the graph-size ceiling can be
//! overridden, through [`crate::CopyConfig`].

/// Default ceiling on the number of nodes visited by one top-level copy.
///
/// - Every recursive visit counts, leaves included.
/// - Exceeding it aborts the copy with a size-limit failure.
/// - Bounds worst-case work; runaway recursion becomes a reported error.
pub const MAX_OBJECT_GRAPH_SIZE: usize = 3000;

/// Stack space that must remain before recursing into the next node.
///
/// If less than this remains, the stack is grown first.
pub const RED_ZONE: usize = 100 * 1024;

/// Stack space allocated each time the stack is grown (1MB).
pub const STACK_PER_RECURSION: usize = 1024 * 1024;
