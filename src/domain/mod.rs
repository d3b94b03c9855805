//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw input rows (`Record`) and the metric columns they carry (`Metric`)
//! - derived features (`FeatureSet`, `TimeOfDay`, `WeatherCategory`)
//! - grouping (`Dimension`, `GroupKey`) and output rows (`AggregateRow`)
//! - dashboard-level settings (`Analysis`, `DashboardConfig`)

pub mod types;

pub use types::*;
