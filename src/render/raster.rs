use std::path::Path;

use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use tracing::{debug, trace};

use crate::core::bucket_table::BucketTable;
use crate::core::histogram::{HistogramBar, HistogramGeometry, histogram_geometry};
use crate::errors::HoverResult;
use crate::render::color::{blend_over, parse_hex_color};

pub const DEFAULT_NORMAL_FILL: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0x80]);
pub const DEFAULT_HIGHLIGHT_FILL: Rgba<u8> = Rgba([0xff, 0x00, 0x00, 0x80]);

/// Fill colors for the two bar groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramPalette {
    pub normal: Rgba<u8>,
    pub highlight: Rgba<u8>,
}

impl Default for HistogramPalette {
    fn default() -> Self {
        Self {
            normal: DEFAULT_NORMAL_FILL,
            highlight: DEFAULT_HIGHLIGHT_FILL,
        }
    }
}

impl HistogramPalette {
    pub fn from_hex(normal: &str, highlight: &str) -> HoverResult<Self> {
        Ok(Self {
            normal: parse_hex_color(normal)?,
            highlight: parse_hex_color(highlight)?,
        })
    }
}

/// Draw `geometry` onto `surface`.
///
/// The surface is cleared first. Each bar group is filled as one shape, so a pixel
/// covered by two overlapping bars of the same group is blended once. The
/// highlighted group goes last and always sits on top.
pub fn rasterize(geometry: &HistogramGeometry, surface: &mut RgbaImage, palette: &HistogramPalette) {
    for pixel in surface.pixels_mut() {
        *pixel = Rgba([0, 0, 0, 0]);
    }
    fill_group(surface, geometry.normal(), palette.normal);
    fill_group(surface, geometry.highlighted(), palette.highlight);
}

fn fill_group<'a>(
    surface: &mut RgbaImage,
    bars: impl Iterator<Item = &'a HistogramBar>,
    color: Rgba<u8>,
) {
    let (width, height) = surface.dimensions();
    let mut mask = GrayImage::new(width, height);
    let mut any = false;

    for bar in bars {
        let rect = bar.rect;
        let x0 = rect.x.clamp(0, i64::from(width));
        let x1 = rect.right().clamp(0, i64::from(width));
        let y0 = rect.y.clamp(0, i64::from(height));
        let y1 = rect.bottom().clamp(0, i64::from(height));
        trace!(bucket = bar.bucket_index, x0, x1, y0, y1, "fill bar");
        if x1 <= x0 || y1 <= y0 {
            continue;
        }
        let covered = Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0) as u32, (y1 - y0) as u32);
        draw_filled_rect_mut(&mut mask, covered, Luma([u8::MAX]));
        any = true;
    }

    if !any {
        return;
    }
    for (pixel, coverage) in surface.pixels_mut().zip(mask.pixels()) {
        if coverage[0] > 0 {
            *pixel = blend_over(*pixel, color);
        }
    }
}

/// Lay out and draw the histogram for the column under `index`.
pub fn render_histogram(
    table: &BucketTable,
    index: usize,
    width: u32,
    height: u32,
    palette: &HistogramPalette,
) -> RgbaImage {
    let geometry = histogram_geometry(table, index, width, height);
    debug!(index, bars = geometry.bars.len(), width, height, "render histogram");
    let mut surface = RgbaImage::new(width, height);
    rasterize(&geometry, &mut surface, palette);
    surface
}

/// Write a rendered histogram to disk as PNG.
pub fn save_png(surface: &RgbaImage, path: &Path) -> color_eyre::Result<()> {
    surface
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to write {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::histogram::PixelRect;
    use crate::core::types::{BucketLayout, BucketMetadata};

    fn bar(bucket_index: usize, rect: PixelRect, highlighted: bool) -> HistogramBar {
        HistogramBar { bucket_index, rect, highlighted }
    }

    #[test]
    fn test_rasterize_clears_previous_frame() {
        let mut surface = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        let geometry = HistogramGeometry { width: 4, height: 4, bars: Vec::new() };
        rasterize(&geometry, &mut surface, &HistogramPalette::default());
        assert!(surface.pixels().all(|p| *p == Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn test_overlapping_bars_of_one_group_blend_once() {
        let geometry = HistogramGeometry {
            width: 6,
            height: 2,
            bars: vec![
                bar(0, PixelRect { x: 0, y: 0, width: 4, height: 2 }, false),
                bar(1, PixelRect { x: 2, y: 0, width: 4, height: 2 }, false),
            ],
        };
        let mut surface = RgbaImage::new(6, 2);
        rasterize(&geometry, &mut surface, &HistogramPalette::default());
        assert_eq!(*surface.get_pixel(3, 1), DEFAULT_NORMAL_FILL);
        assert_eq!(*surface.get_pixel(0, 0), DEFAULT_NORMAL_FILL);
    }

    #[test]
    fn test_highlight_drawn_over_normal() {
        let geometry = HistogramGeometry {
            width: 4,
            height: 1,
            bars: vec![
                bar(1, PixelRect { x: 0, y: 0, width: 3, height: 1 }, true),
                bar(0, PixelRect { x: 1, y: 0, width: 3, height: 1 }, false),
            ],
        };
        let mut surface = RgbaImage::new(4, 1);
        rasterize(&geometry, &mut surface, &HistogramPalette::default());

        assert_eq!(*surface.get_pixel(0, 0), DEFAULT_HIGHLIGHT_FILL);
        assert_eq!(*surface.get_pixel(3, 0), DEFAULT_NORMAL_FILL);
        let overlap = *surface.get_pixel(1, 0);
        assert_eq!(overlap, blend_over(DEFAULT_NORMAL_FILL, DEFAULT_HIGHLIGHT_FILL));
        assert_eq!(overlap[0], 255);
    }

    #[test]
    fn test_bars_outside_surface_are_clipped() {
        let geometry = HistogramGeometry {
            width: 2,
            height: 2,
            bars: vec![bar(0, PixelRect { x: 1, y: -1, width: 5, height: 5 }, false)],
        };
        let mut surface = RgbaImage::new(2, 2);
        rasterize(&geometry, &mut surface, &HistogramPalette::default());
        assert_eq!(surface.get_pixel(0, 0)[3], 0);
        assert_eq!(*surface.get_pixel(1, 1), DEFAULT_NORMAL_FILL);
    }

    #[test]
    fn test_zero_sized_bar_draws_nothing() {
        let geometry = HistogramGeometry {
            width: 3,
            height: 3,
            bars: vec![bar(0, PixelRect { x: 1, y: 1, width: 0, height: 2 }, false)],
        };
        let mut surface = RgbaImage::new(3, 3);
        rasterize(&geometry, &mut surface, &HistogramPalette::default());
        assert!(surface.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_render_histogram_scenario() {
        let table = BucketTable::new(
            vec![0.0, 0.0, 0.0],
            vec![0.0, 10.0, 20.0],
            vec![5.0, 0.0, 9.0],
            &BucketMetadata {
                x_bucket_size: Some(60.0),
                y_bucket_size: Some(10.0),
                y_bucket_count: Some(3),
                y_layout: Some(BucketLayout::Minimum),
            },
        )
        .unwrap();
        let image = render_histogram(&table, 2, 150, 50, &HistogramPalette::default());
        assert_eq!(image.dimensions(), (150, 50));
        // hovered bar spans x 75..125 at full height
        assert_eq!(*image.get_pixel(100, 0), DEFAULT_HIGHLIGHT_FILL);
        // nothing drawn for the zero-count bucket
        assert_eq!(image.get_pixel(60, 10)[3], 0);
        // first bar covers rows 22..50
        assert_eq!(*image.get_pixel(10, 49), DEFAULT_NORMAL_FILL);
        assert_eq!(image.get_pixel(10, 10)[3], 0);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist.png");
        let image = RgbaImage::from_pixel(3, 2, DEFAULT_HIGHLIGHT_FILL);
        save_png(&image, &path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded, image);
    }
}
