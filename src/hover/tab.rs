//! Builds the heatmap entries of the hover panel.
use image::RgbaImage;
use polars::prelude::*;
use tracing::{debug, warn};

use crate::core::bucket_table::BucketTable;
use crate::core::resolver::resolve;
use crate::core::types::{BucketDescriptor, BucketMetadata};
use crate::hover::format::{DisplayTimeZone, format_number, format_time};
use crate::hover::lookup::CellValuesLookup;
use crate::render::raster::{HistogramPalette, render_histogram};

pub const DEFAULT_LAYER_NAME: &str = "Heatmap";

/// Hover payload: the bucket frame plus the metadata that came with it.
#[derive(Debug, Clone, Default)]
pub struct HeatmapData {
    pub heatmap: Option<DataFrame>,
    pub metadata: BucketMetadata,
    /// Display name of the bucket layer, shown as the entry title.
    pub display_name: Option<String>,
}

/// Size and colors of the footer histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramStyle {
    pub width: u32,
    pub height: u32,
    pub palette: HistogramPalette,
}

impl Default for HistogramStyle {
    fn default() -> Self {
        Self::from_css(150, 50, 1.0, HistogramPalette::default())
    }
}

impl HistogramStyle {
    /// Canvas size in device pixels for a CSS-sized footer.
    pub fn from_css(css_width: u32, css_height: u32, pixel_ratio: f64, palette: HistogramPalette) -> Self {
        let scale = |v: u32| (f64::from(v) * pixel_ratio).round().max(1.0) as u32;
        Self {
            width: scale(css_width),
            height: scale(css_height),
            palette,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HoverOptions {
    pub time_zone: DisplayTimeZone,
    pub show_histogram: bool,
    pub histogram: HistogramStyle,
}

/// Derived scalar fields of the hovered bucket, as a one-row frame with the x
/// bounds pre-formatted as time.
#[derive(Debug, Clone)]
pub struct HoverSummary {
    pub descriptor: BucketDescriptor,
    pub frame: DataFrame,
    time_zone: DisplayTimeZone,
}

impl HoverSummary {
    pub fn new(descriptor: BucketDescriptor, time_zone: DisplayTimeZone) -> PolarsResult<Self> {
        let time = |v: Option<f64>| v.map(|v| format_time(v, &time_zone));
        let x_min = time(descriptor.x_range.min);
        let x_max = time(descriptor.x_range.max);
        let frame = DataFrame::new(vec![
            Series::new("xMin".into(), &[x_min.as_deref()]).into(),
            Series::new("xMax".into(), &[x_max.as_deref()]).into(),
            Series::new("yMin".into(), &[descriptor.y_range.min]).into(),
            Series::new("yMax".into(), &[descriptor.y_range.max]).into(),
            Series::new("count".into(), &[descriptor.count]).into(),
        ])?;
        Ok(Self { descriptor, frame, time_zone })
    }

    /// Field name and display text for each summary column. Absent bounds are blank.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let d = &self.descriptor;
        let time = |v: Option<f64>| v.map(|v| format_time(v, &self.time_zone)).unwrap_or_default();
        let number = |v: Option<f64>| v.map(format_number).unwrap_or_default();
        vec![
            ("xMin", time(d.x_range.min)),
            ("xMax", time(d.x_range.max)),
            ("yMin", number(d.y_range.min)),
            ("yMax", number(d.y_range.max)),
            ("count", format_number(d.count)),
        ]
    }
}

/// One named entry of the hover panel.
#[derive(Debug, Clone)]
pub struct HoverLayer {
    pub name: String,
    pub header: Option<HoverSummary>,
    pub data: Vec<DataFrame>,
    pub footer: Option<RgbaImage>,
}

impl HoverLayer {
    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            header: None,
            data: Vec::new(),
            footer: None,
        }
    }
}

/// Build the hover entries for `index`.
///
/// Never fails: a missing frame or column yields a single empty `"Heatmap"` entry,
/// and a lookup miss falls back to showing just the summary.
pub fn heatmap_tab(
    data: &HeatmapData,
    index: usize,
    lookup: &dyn CellValuesLookup,
    options: &HoverOptions,
) -> Vec<HoverLayer> {
    let Some(frame) = data.heatmap.as_ref() else {
        return vec![HoverLayer::empty(DEFAULT_LAYER_NAME)];
    };
    let table = match BucketTable::from_frame(frame, &data.metadata) {
        Ok(table) => table,
        Err(e) => {
            debug!("no bucket table for hover: {e}");
            return vec![HoverLayer::empty(DEFAULT_LAYER_NAME)];
        }
    };
    vec![layer_for(&table, data.display_name.as_deref(), index, lookup, options)]
}

/// Hover entry for an already-ingested table.
pub fn layer_for(
    table: &BucketTable,
    display_name: Option<&str>,
    index: usize,
    lookup: &dyn CellValuesLookup,
    options: &HoverOptions,
) -> HoverLayer {
    let name = display_name.unwrap_or(DEFAULT_LAYER_NAME);
    let Some(descriptor) = resolve(table, index) else {
        debug!(index, len = table.len(), "hover index outside bucket table");
        return HoverLayer::empty(name);
    };
    let summary = match HoverSummary::new(descriptor, options.time_zone) {
        Ok(summary) => summary,
        Err(e) => {
            warn!("failed to build hover summary: {e}");
            return HoverLayer::empty(name);
        }
    };

    match lookup.values_in_cell(&descriptor) {
        Some(raw) => {
            let footer = options.show_histogram.then(|| {
                let style = &options.histogram;
                render_histogram(table, index, style.width, style.height, &style.palette)
            });
            HoverLayer {
                name: name.to_string(),
                header: Some(summary),
                data: raw,
                footer,
            }
        }
        None => HoverLayer {
            name: name.to_string(),
            header: None,
            data: vec![summary.frame],
            footer: None,
        },
    }
}
