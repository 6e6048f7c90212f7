#![allow(clippy::collapsible_if)]

pub mod config;
pub mod core;
pub mod errors;
pub mod hover;
pub mod loader;
pub mod logging;
pub mod render;
pub mod tui;

// Re-export commonly used types
pub use crate::core::{BucketDescriptor, BucketLayout, BucketMetadata, BucketTable, Range, resolve, resolve_all};
pub use crate::errors::{HoverError, HoverResult};
pub use crate::hover::{CellValuesLookup, FrameCellLookup, HeatmapData, HoverLayer, HoverOptions, heatmap_tab};
pub use crate::render::{HistogramPalette, rasterize, render_histogram};
