use image::Rgba;

use crate::errors::{HoverError, HoverResult};

/// Parse `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(raw: &str) -> HoverResult<Rgba<u8>> {
    let invalid = || HoverError::InvalidColor(raw.to_string());
    let hex = raw.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    let alpha = if hex.len() == 8 { channel(6)? } else { 0xff };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

/// Source-over compositing of `src` onto `dst`, both straight (non-premultiplied) alpha.
///
/// Same math as `image::Pixel::blend`, but channels round to nearest instead of
/// truncating, so stacked translucent fills do not drift darker.
pub fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mix = |s: u8, d: u8| {
        let c = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ffffff80").unwrap(), Rgba([255, 255, 255, 128]));
        assert_eq!(parse_hex_color("#ff0000").unwrap(), Rgba([255, 0, 0, 255]));
        assert!(parse_hex_color("ff0000").is_err());
        assert!(parse_hex_color("#ff00").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
    }

    #[test]
    fn test_blend_onto_transparent_keeps_source() {
        let out = blend_over(Rgba([0, 0, 0, 0]), Rgba([255, 0, 0, 128]));
        assert_eq!(out, Rgba([255, 0, 0, 128]));
    }

    #[test]
    fn test_blend_half_red_over_half_white() {
        let out = blend_over(Rgba([255, 255, 255, 128]), Rgba([255, 0, 0, 128]));
        // alpha 0.502 + 0.502 * 0.498 = 0.752
        assert_eq!(out[3], 192);
        assert_eq!(out[0], 255);
        // 255 * 0.25 / 0.752 = 84.78, rounded rather than truncated
        assert_eq!(out[1], 85);
    }
}
