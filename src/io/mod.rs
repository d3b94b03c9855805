//! Input/output helpers.
//!
//! - CSV ingest (`ingest`)
//! - aggregate exports to CSV (`export`)
//! - aggregate JSON read/write (`rows`)

pub mod export;
pub mod ingest;
pub mod rows;

pub use export::*;
pub use ingest::*;
pub use rows::*;
