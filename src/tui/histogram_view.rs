use image::{Rgba, RgbaImage};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

use crate::render::color::blend_over;

const UPPER_HALF: &str = "\u{2580}";

/// Downsample `image` to `cols` x `rows` terminal cells using upper half blocks:
/// the foreground carries the top pixel row, the background the bottom one.
///
/// Translucent pixels are composited over `background` first.
pub fn half_block_lines(
    image: &RgbaImage,
    cols: u16,
    rows: u16,
    background: (u8, u8, u8),
) -> Vec<Line<'static>> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || cols == 0 || rows == 0 {
        return Vec::new();
    }
    let pixel_rows = u32::from(rows) * 2;
    let base = Rgba([background.0, background.1, background.2, 255]);
    let sample = |col: u16, pixel_row: u32| -> Color {
        let x = (u32::from(col) * width / u32::from(cols)).min(width - 1);
        let y = (pixel_row * height / pixel_rows).min(height - 1);
        let p = blend_over(base, *image.get_pixel(x, y));
        Color::Rgb(p[0], p[1], p[2])
    };

    (0..rows)
        .map(|row| {
            let spans: Vec<Span<'static>> = (0..cols)
                .map(|col| {
                    let top = sample(col, u32::from(row) * 2);
                    let bottom = sample(col, u32::from(row) * 2 + 1);
                    Span::styled(UPPER_HALF, Style::default().fg(top).bg(bottom))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}
