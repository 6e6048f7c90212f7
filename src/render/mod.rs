pub mod color;
pub mod raster;

pub use raster::{HistogramPalette, rasterize, render_histogram, save_png};
