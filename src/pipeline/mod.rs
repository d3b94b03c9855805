//! Feature derivation and aggregation.
//!
//! Everything here is a pure function over an input slice:
//!
//! - derive calendar/time-of-day features per record (`features`)
//! - group by a dimension and average a metric (`aggregate`)
//! - reorder groups into their fixed display sequence (`order`)
//!
//! Callers pass records in and get rows out; nothing is cached between calls.

pub mod aggregate;
pub mod error;
pub mod features;
pub mod order;

pub use aggregate::*;
pub use error::*;
pub use features::*;
pub use order::*;

use crate::domain::{AggregateRow, Dimension, Metric, Record};

/// `aggregate` followed by `order_groups`.
pub fn aggregate_ordered(
    records: &[Record],
    dimension: Dimension,
    metric: Metric,
) -> Result<Vec<AggregateRow>, PipelineError> {
    let rows = aggregate(records, dimension, metric)?;
    order_groups(rows, dimension)
}
