//! # Replica
//!
//! Library half of the demo binary: command line, configuration and the
//! sample graphs the commands copy.

pub mod cli;
pub mod config;
pub mod samples;
