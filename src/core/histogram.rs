use serde::Serialize;

use crate::core::bucket_table::BucketTable;

/// Pixel-space rectangle. Coordinates are signed so that rounding overshoot is
/// representable; the rasterizer clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }
}

/// One bar of the hover histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistogramBar {
    /// Row of the bucket in the flattened table.
    pub bucket_index: usize,
    pub rect: PixelRect,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramGeometry {
    pub width: u32,
    pub height: u32,
    pub bars: Vec<HistogramBar>,
}

impl HistogramGeometry {
    fn empty(width: u32, height: u32) -> Self {
        Self { width, height, bars: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &HistogramBar> {
        self.bars.iter().filter(|b| b.highlighted)
    }

    pub fn normal(&self) -> impl Iterator<Item = &HistogramBar> {
        self.bars.iter().filter(|b| !b.highlighted)
    }
}

/// Round half up, so 2.5 -> 3 and -2.5 -> -2.
fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

/// Lay out the bars for the column that contains `index`.
///
/// Bars are normalized to the tallest bucket of the column and placed at
/// `j / (y_bucket_count + 1)` of the width, leaving a gutter on the right. Empty
/// buckets are skipped. A column with no counts, a zero `y_bucket_count` or an
/// index past the table end produces no bars.
pub fn histogram_geometry(
    table: &BucketTable,
    index: usize,
    width: u32,
    height: u32,
) -> HistogramGeometry {
    let y_bucket_count = table.y_bucket_count;
    if y_bucket_count == 0 || index >= table.len() {
        return HistogramGeometry::empty(width, height);
    }

    let rows = table.column_rows(index);
    let counts = &table.count()[rows.clone()];
    let max_count = counts.iter().copied().fold(0.0_f64, f64::max);
    if max_count <= 0.0 {
        return HistogramGeometry::empty(width, height);
    }

    let w = f64::from(width);
    let h = f64::from(height);
    let bar_width = round_half_up(w / y_bucket_count as f64);

    let bars = rows
        .zip(counts.iter())
        .enumerate()
        .filter(|(_, (_, count))| **count > 0.0)
        .map(|(j, (k, count))| {
            let height_frac = count / max_count;
            let x_frac = j as f64 / (y_bucket_count + 1) as f64;
            HistogramBar {
                bucket_index: k,
                rect: PixelRect {
                    x: round_half_up(w * x_frac),
                    y: round_half_up(h * (1.0 - height_frac)),
                    width: bar_width,
                    height: round_half_up(h * height_frac),
                },
                highlighted: k == index,
            }
        })
        .collect();

    HistogramGeometry { width, height, bars }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{BucketLayout, BucketMetadata};
    use pretty_assertions::assert_eq;

    fn single_column(counts: Vec<f64>) -> BucketTable {
        let n = counts.len();
        BucketTable::new(
            vec![0.0; n],
            (0..n).map(|i| i as f64 * 10.0).collect(),
            counts,
            &BucketMetadata {
                x_bucket_size: Some(60.0),
                y_bucket_size: Some(10.0),
                y_bucket_count: Some(n),
                y_layout: Some(BucketLayout::Minimum),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(0.0), 0);
    }

    #[test]
    fn test_skips_empty_bucket_and_highlights_hovered() {
        let table = single_column(vec![5.0, 0.0, 9.0]);
        let geom = histogram_geometry(&table, 2, 150, 50);

        let indices: Vec<usize> = geom.bars.iter().map(|b| b.bucket_index).collect();
        assert_eq!(indices, vec![0, 2]);

        let hovered = geom.bars[1];
        assert!(hovered.highlighted);
        assert_eq!(hovered.rect, PixelRect { x: 75, y: 0, width: 50, height: 50 });

        let first = geom.bars[0];
        assert!(!first.highlighted);
        // 5/9 of 50px = 27.78 -> 28, top at 22.22 -> 22
        assert_eq!(first.rect, PixelRect { x: 0, y: 22, width: 50, height: 28 });
    }

    #[test]
    fn test_all_zero_column_has_no_bars() {
        let table = single_column(vec![0.0, 0.0, 0.0]);
        let geom = histogram_geometry(&table, 1, 150, 50);
        assert!(geom.is_empty());
    }

    #[test]
    fn test_only_hovered_column_is_scanned() {
        let table = BucketTable::new(
            vec![0.0, 0.0, 60.0, 60.0],
            vec![0.0, 10.0, 0.0, 10.0],
            vec![100.0, 100.0, 1.0, 2.0],
            &BucketMetadata {
                x_bucket_size: Some(60.0),
                y_bucket_size: Some(10.0),
                y_bucket_count: Some(2),
                y_layout: None,
            },
        )
        .unwrap();
        let geom = histogram_geometry(&table, 2, 90, 40);
        assert_eq!(geom.bars.len(), 2);
        assert_eq!(geom.bars[0].bucket_index, 2);
        assert!(geom.bars[0].highlighted);
        assert_eq!(geom.bars[0].rect.height, 20);
        assert_eq!(geom.bars[1].rect.height, 40);
    }

    #[test]
    fn test_bars_stay_within_canvas() {
        let counts: Vec<f64> = (0..17).map(|i| ((i * 7) % 11) as f64).collect();
        let table = single_column(counts);
        for (w, h) in [(150u32, 50u32), (300, 100), (17, 3), (1, 1)] {
            let geom = histogram_geometry(&table, 4, w, h);
            for bar in &geom.bars {
                assert!(bar.rect.x >= 0);
                assert!(bar.rect.y >= 0);
                assert!(bar.rect.right() <= i64::from(w) + 1, "{bar:?} overflows {w}");
                assert!(bar.rect.bottom() <= i64::from(h) + 1, "{bar:?} overflows {h}");
            }
        }
    }

    #[test]
    fn test_index_past_end_is_empty() {
        let table = single_column(vec![1.0, 2.0]);
        assert!(histogram_geometry(&table, 2, 10, 10).is_empty());
    }
}
