use std::collections::HashSet;
use std::ops::Range as IndexRange;

use polars::prelude::{DataFrame, DataType};
use tracing::{debug, warn};

use crate::core::types::{BucketLayout, BucketMetadata, COUNT_FIELD, X_MIN_FIELD, Y_MIN_FIELD};
use crate::errors::{HoverError, HoverResult};

/// Column-major heatmap bucket table.
///
/// Buckets are grouped by x-column: every column is a contiguous run of exactly
/// `y_bucket_count` rows sharing the same `x_min`, ordered by increasing y. The
/// layout is checked once at construction so hover-time lookups can trust it.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketTable {
    x_min: Vec<f64>,
    y_min: Vec<f64>,
    count: Vec<f64>,
    pub x_bucket_size: f64,
    pub y_bucket_size: f64,
    pub y_bucket_count: usize,
    pub y_layout: BucketLayout,
}

impl BucketTable {
    /// Build a table from raw columns, filling missing metadata from the data.
    pub fn new(
        x_min: Vec<f64>,
        y_min: Vec<f64>,
        count: Vec<f64>,
        metadata: &BucketMetadata,
    ) -> HoverResult<Self> {
        if x_min.len() != y_min.len() || x_min.len() != count.len() {
            return Err(HoverError::LengthMismatch {
                x_min: x_min.len(),
                y_min: y_min.len(),
                count: count.len(),
            });
        }

        let metadata = Self::infer_metadata(&x_min, &y_min, metadata);
        let table = Self {
            x_bucket_size: metadata
                .x_bucket_size
                .ok_or(HoverError::IncompleteMetadata("xBucketSize"))?,
            y_bucket_size: metadata
                .y_bucket_size
                .ok_or(HoverError::IncompleteMetadata("yBucketSize"))?,
            y_bucket_count: metadata
                .y_bucket_count
                .ok_or(HoverError::IncompleteMetadata("yBucketCount"))?,
            y_layout: metadata.y_layout.unwrap_or_default(),
            x_min,
            y_min,
            count,
        };
        table.validate()?;

        debug!(
            buckets = table.len(),
            y_bucket_count = table.y_bucket_count,
            layout = %table.y_layout,
            "ingested bucket table"
        );
        Ok(table)
    }

    /// Read the `xMin`, `yMin` and `count` columns out of a polars frame.
    pub fn from_frame(df: &DataFrame, metadata: &BucketMetadata) -> HoverResult<Self> {
        let x_min = float_column(df, X_MIN_FIELD)?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        let y_min = float_column(df, Y_MIN_FIELD)?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        let count = float_column(df, COUNT_FIELD)?
            .into_iter()
            .map(|v| v.unwrap_or(0.0))
            .collect();
        Self::new(x_min, y_min, count, metadata)
    }

    /// Fill in whatever metadata the caller left out.
    ///
    /// `y_bucket_count` is the length of the first column, `x_bucket_size` the gap
    /// between the first two distinct x values and `y_bucket_size` the gap between
    /// the first two y values of the first column. Fields that cannot be derived
    /// stay `None`.
    fn infer_metadata(x_min: &[f64], y_min: &[f64], given: &BucketMetadata) -> BucketMetadata {
        let first_run = x_min
            .first()
            .map(|first| x_min.iter().take_while(|x| *x == first).count())
            .unwrap_or(0);

        let y_bucket_count = given.y_bucket_count.or(Some(first_run));

        let x_bucket_size = given.x_bucket_size.or_else(|| {
            let next = x_min.get(first_run)?;
            let inferred = next - x_min[0];
            warn!(inferred, "xBucketSize not provided; inferred from column spacing");
            Some(inferred)
        });

        let y_bucket_size = given.y_bucket_size.or_else(|| {
            if first_run < 2 {
                return None;
            }
            let inferred = y_min.get(1)? - y_min.first()?;
            warn!(inferred, "yBucketSize not provided; inferred from bucket spacing");
            Some(inferred)
        });

        BucketMetadata {
            x_bucket_size,
            y_bucket_size,
            y_bucket_count,
            y_layout: given.y_layout,
        }
    }

    /// Check the column-contiguity invariant.
    fn validate(&self) -> HoverResult<()> {
        let mut seen: HashSet<u64> = HashSet::new();
        let mut start = 0;
        while start < self.x_min.len() {
            let x = self.x_min[start];
            if x.is_nan() {
                return Err(HoverError::InvalidLayout {
                    row: start,
                    reason: "xMin is null".to_string(),
                });
            }
            // 0.0 and -0.0 compare equal; give them one key
            let key = if x == 0.0 { 0 } else { x.to_bits() };
            if !seen.insert(key) {
                return Err(HoverError::InvalidLayout {
                    row: start,
                    reason: format!("column xMin={x} is not contiguous"),
                });
            }

            let mut end = start + 1;
            while end < self.x_min.len() && self.x_min[end] == x {
                if self.y_min[end] < self.y_min[end - 1] {
                    return Err(HoverError::InvalidLayout {
                        row: end,
                        reason: format!("yMin decreases within column xMin={x}"),
                    });
                }
                end += 1;
            }

            let run = end - start;
            if self.y_bucket_count > 0 && run != self.y_bucket_count {
                return Err(HoverError::InvalidLayout {
                    row: start,
                    reason: format!(
                        "column xMin={x} has {run} buckets, expected {}",
                        self.y_bucket_count
                    ),
                });
            }
            start = end;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.x_min.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_min.is_empty()
    }

    pub fn x_min(&self) -> &[f64] {
        &self.x_min
    }

    pub fn y_min(&self) -> &[f64] {
        &self.y_min
    }

    pub fn count(&self) -> &[f64] {
        &self.count
    }

    /// First row of the x-column containing `index`, found by walking back while
    /// the x value stays the same.
    pub fn column_start(&self, index: usize) -> usize {
        let x = self.x_min[index];
        let mut start = index;
        while start > 0 && self.x_min[start - 1] == x {
            start -= 1;
        }
        start
    }

    /// Rows of the x-column containing `index`, clamped to the table end.
    pub fn column_rows(&self, index: usize) -> IndexRange<usize> {
        let start = self.column_start(index);
        let end = (start + self.y_bucket_count).min(self.len());
        start..end
    }

    /// Row ranges of every x-column, left to right.
    pub fn columns(&self) -> Vec<IndexRange<usize>> {
        let mut columns = Vec::new();
        let mut start = 0;
        while start < self.len() {
            let x = self.x_min[start];
            let mut end = start + 1;
            while end < self.len() && self.x_min[end] == x {
                end += 1;
            }
            columns.push(start..end);
            start = end;
        }
        columns
    }
}

fn float_column(df: &DataFrame, name: &'static str) -> HoverResult<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .map_err(|_| HoverError::MissingColumn(name))?;
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    let values = series.f64()?.into_iter().collect();
    Ok(values)
}
