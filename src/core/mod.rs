pub mod bucket_table;
pub mod histogram;
pub mod resolver;
pub mod types;

pub use bucket_table::BucketTable;
pub use histogram::{HistogramBar, HistogramGeometry, PixelRect, histogram_geometry};
pub use resolver::{resolve, resolve_all};
pub use types::*;
