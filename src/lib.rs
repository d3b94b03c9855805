//! `bike-trends` library crate.
//!
//! The binary (`bikes`) is a thin wrapper around this library so that:
//!
//! - the aggregation pipeline is testable without spawning processes
//! - the CLI and the TUI share one code path from CSV to ordered rows
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod plot;
pub mod report;
pub mod tui;
