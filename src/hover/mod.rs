pub mod export;
pub mod format;
pub mod lookup;
pub mod tab;

pub use export::{frame_rows, frame_to_json, layer_to_json};
pub use format::{DisplayTimeZone, format_number, format_time};
pub use lookup::{CellValuesLookup, FrameCellLookup, NoRawRecords};
pub use tab::{
    DEFAULT_LAYER_NAME, HeatmapData, HistogramStyle, HoverLayer, HoverOptions, HoverSummary,
    heatmap_tab, layer_for,
};
