//! Maps a flat hover index onto the bucket it lands in.
use polars::prelude::DataFrame;
use tracing::debug;

use crate::core::bucket_table::BucketTable;
use crate::core::types::{BucketDescriptor, BucketLayout, BucketMetadata, Range};

/// Resolve the bucket under `index`.
///
/// Returns `None` when the index is outside the table. The y bounds come from the
/// hovered column itself, so a bucket on the edge of its column gets an absent
/// bound rather than one borrowed from the neighboring column.
pub fn resolve(table: &BucketTable, index: usize) -> Option<BucketDescriptor> {
    if index >= table.len() {
        return None;
    }

    let column_start = table.column_start(index);
    let y_value_idx = (index - column_start) as isize;

    let (y_min_idx, y_max_idx) = match table.y_layout {
        BucketLayout::Minimum => (y_value_idx, y_value_idx + 1),
        BucketLayout::LessThanOrEqual => (y_value_idx - 1, y_value_idx),
    };

    let x_min = table.x_min()[index];
    Some(BucketDescriptor {
        x_range: Range {
            min: Some(x_min),
            max: Some(x_min + table.x_bucket_size),
            delta: table.x_bucket_size,
        },
        y_range: Range {
            min: column_y(table, column_start, y_min_idx),
            max: column_y(table, column_start, y_max_idx),
            delta: table.y_bucket_size,
        },
        count: table.count()[index],
    })
}

/// y value at position `pos` of the column beginning at `column_start`.
fn column_y(table: &BucketTable, column_start: usize, pos: isize) -> Option<f64> {
    if pos < 0 || pos as usize >= table.y_bucket_count {
        return None;
    }
    table.y_min().get(column_start + pos as usize).copied()
}

/// Ingest `frame` and resolve `index` against it.
///
/// Any ingest failure (missing column, broken layout) yields an empty list so the
/// hover panel can degrade instead of failing.
pub fn resolve_all(
    frame: Option<&DataFrame>,
    metadata: &BucketMetadata,
    index: usize,
) -> Vec<BucketDescriptor> {
    let Some(frame) = frame else {
        return Vec::new();
    };
    match BucketTable::from_frame(frame, metadata) {
        Ok(table) => resolve(&table, index).into_iter().collect(),
        Err(e) => {
            debug!("bucket table unavailable for hover: {e}");
            Vec::new()
        }
    }
}
