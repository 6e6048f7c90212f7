use polars::prelude::*;
use tracing::{debug, warn};

use crate::core::types::{BucketDescriptor, BucketLayout, Range};

/// Source of the raw records behind a bucket.
///
/// Returning `None` means nothing is known about the cell; the hover panel then
/// shows only the derived summary.
pub trait CellValuesLookup {
    fn values_in_cell(&self, cell: &BucketDescriptor) -> Option<Vec<DataFrame>>;
}

impl<F> CellValuesLookup for F
where
    F: Fn(&BucketDescriptor) -> Option<Vec<DataFrame>>,
{
    fn values_in_cell(&self, cell: &BucketDescriptor) -> Option<Vec<DataFrame>> {
        self(cell)
    }
}

/// Lookup that never finds anything.
pub struct NoRawRecords;

impl CellValuesLookup for NoRawRecords {
    fn values_in_cell(&self, _cell: &BucketDescriptor) -> Option<Vec<DataFrame>> {
        None
    }
}

/// Filters a frame of raw records down to the rows inside a bucket.
///
/// x is matched as `[min, max)`. y follows the bucket layout: `[min, max)` for
/// `Minimum`, `(min, max]` for `LessThanOrEqual`. Absent bounds are unbounded.
#[derive(Clone)]
pub struct FrameCellLookup {
    frame: DataFrame,
    x_field: String,
    y_field: String,
    layout: BucketLayout,
    max_rows: Option<usize>,
}

impl FrameCellLookup {
    pub fn new(frame: DataFrame, x_field: &str, y_field: &str, layout: BucketLayout) -> Self {
        Self {
            frame,
            x_field: x_field.to_string(),
            y_field: y_field.to_string(),
            layout,
            max_rows: None,
        }
    }

    /// Cap the number of rows returned per cell.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    fn cell_filter(&self, cell: &BucketDescriptor) -> Expr {
        range_expr(&self.x_field, &cell.x_range, true)
            .and(range_expr(&self.y_field, &cell.y_range, self.layout.closed_low()))
    }
}

/// Expression form of `Range::contains`.
fn range_expr(field: &str, range: &Range, closed_low: bool) -> Expr {
    let value = col(field).cast(DataType::Float64);
    let mut expr = lit(true);
    if let Some(min) = range.min {
        let above = if closed_low {
            value.clone().gt_eq(lit(min))
        } else {
            value.clone().gt(lit(min))
        };
        expr = expr.and(above);
    }
    if let Some(max) = range.max {
        let below = if closed_low {
            value.lt(lit(max))
        } else {
            value.lt_eq(lit(max))
        };
        expr = expr.and(below);
    }
    expr
}

impl CellValuesLookup for FrameCellLookup {
    fn values_in_cell(&self, cell: &BucketDescriptor) -> Option<Vec<DataFrame>> {
        let mut query = self.frame.clone().lazy().filter(self.cell_filter(cell));
        if let Some(max_rows) = self.max_rows {
            query = query.limit(max_rows as IdxSize);
        }
        match query.collect() {
            Ok(df) if df.height() > 0 => {
                debug!(rows = df.height(), "raw records found for cell");
                Some(vec![df])
            }
            Ok(_) => None,
            Err(e) => {
                warn!("raw record lookup failed: {e}");
                None
            }
        }
    }
}
