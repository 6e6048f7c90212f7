use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Column names a bucket table must carry.
pub const X_MIN_FIELD: &str = "xMin";
pub const Y_MIN_FIELD: &str = "yMin";
pub const COUNT_FIELD: &str = "count";

/// How the stored y value relates to the bucket it labels
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(ascii_case_insensitive)]
pub enum BucketLayout {
    /// The stored value is the lower bound of the bucket.
    #[default]
    #[serde(alias = "ge")]
    #[strum(to_string = "minimum", serialize = "ge", serialize = "min")]
    Minimum,
    /// The stored value is the upper bound of the bucket.
    #[serde(alias = "le")]
    #[strum(to_string = "lessThanOrEqual", serialize = "le")]
    LessThanOrEqual,
}

impl BucketLayout {
    /// Whether a bucket includes its lower bound on the y axis.
    pub fn closed_low(self) -> bool {
        self == BucketLayout::Minimum
    }
}

/// Scalar metadata that travels with a bucket table.
///
/// Every field is optional because the upstream payload may omit them; a table can
/// only be resolved once all of them are known (see `BucketTable::new`).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketMetadata {
    pub x_bucket_size: Option<f64>,
    pub y_bucket_size: Option<f64>,
    pub y_bucket_count: Option<usize>,
    pub y_layout: Option<BucketLayout>,
}

/// One axis of a bucket. A bound is `None` when the bucket sits on the edge of its
/// column and has no neighbor to borrow the bound from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub delta: f64,
}

impl Range {
    /// True when `value` falls within the range, treating absent bounds as open.
    ///
    /// `closed_low` selects which side is inclusive: `[min, max)` when true,
    /// `(min, max]` otherwise.
    pub fn contains(&self, value: f64, closed_low: bool) -> bool {
        let above = match self.min {
            Some(min) if closed_low => value >= min,
            Some(min) => value > min,
            None => true,
        };
        let below = match self.max {
            Some(max) if closed_low => value < max,
            Some(max) => value <= max,
            None => true,
        };
        above && below
    }
}

/// The resolved ranges and count of the bucket under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketDescriptor {
    pub x_range: Range,
    pub y_range: Range,
    pub count: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_layout_from_str() {
        assert_eq!(BucketLayout::from_str("minimum").unwrap(), BucketLayout::Minimum);
        assert_eq!(BucketLayout::from_str("GE").unwrap(), BucketLayout::Minimum);
        assert_eq!(BucketLayout::from_str("le").unwrap(), BucketLayout::LessThanOrEqual);
        assert_eq!(
            BucketLayout::from_str("lessThanOrEqual").unwrap(),
            BucketLayout::LessThanOrEqual
        );
        assert!(BucketLayout::from_str("upper").is_err());
    }

    #[test]
    fn test_layout_display() {
        assert_eq!(BucketLayout::Minimum.to_string(), "minimum");
        assert_eq!(BucketLayout::LessThanOrEqual.to_string(), "lessThanOrEqual");
    }

    #[test]
    fn test_layout_serde_alias() {
        let layout: BucketLayout = serde_json::from_str("\"le\"").unwrap();
        assert_eq!(layout, BucketLayout::LessThanOrEqual);
        let json = serde_json::to_string(&BucketLayout::Minimum).unwrap();
        assert_eq!(json, "\"minimum\"");
    }

    #[test]
    fn test_range_contains() {
        let range = Range { min: Some(0.0), max: Some(10.0), delta: 10.0 };
        assert!(range.contains(0.0, true));
        assert!(!range.contains(10.0, true));
        assert!(!range.contains(0.0, false));
        assert!(range.contains(10.0, false));

        let open_low = Range { min: None, max: Some(10.0), delta: 10.0 };
        assert!(open_low.contains(-1e9, false));
        assert!(!open_low.contains(11.0, false));
    }

    #[test]
    fn test_layout_closed_side() {
        assert!(BucketLayout::Minimum.closed_low());
        assert!(!BucketLayout::LessThanOrEqual.closed_low());
    }
}
