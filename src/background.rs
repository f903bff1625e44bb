//! Gradient background generation from a theme color.

use crate::geom::Canvas;

/// Neutral gray used whenever the theme color fails to parse.
pub const FALLBACK_RGB: [u8; 3] = [0x9C, 0xA3, 0xAF];

const ALPHA_START: f64 = 0.25;
const ALPHA_END: f64 = 0.125;

/// Parse a 6-hex-digit color, with or without a leading `#`.
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}

/// Theme RGB with the gray fallback applied. Never fails.
pub fn theme_rgb(theme_color: &str) -> [u8; 3] {
    match parse_hex_color(theme_color) {
        Some(rgb) => rgb,
        None => {
            tracing::debug!(theme_color, "unparseable theme color, using gray fallback");
            FALLBACK_RGB
        }
    }
}

/// Canvas-sized premultiplied RGBA8 buffer holding a linear gradient from
/// top-left to bottom-right, alpha 0.25 down to 0.125 over the theme RGB.
///
/// Deterministic: the same color string yields a byte-identical buffer.
pub fn gradient_background(theme_color: &str, canvas: Canvas) -> Vec<u8> {
    let [r, g, b] = theme_rgb(theme_color);
    let w = canvas.width as usize;
    let h = canvas.height as usize;

    // Diagonal progress; degenerate 1x1 canvas gets the start alpha.
    let span = (w.saturating_sub(1) + h.saturating_sub(1)).max(1) as f64;

    let mut out = vec![0u8; w * h * 4];
    for y in 0..h {
        for x in 0..w {
            let t = (x + y) as f64 / span;
            let alpha = ALPHA_START + t * (ALPHA_END - ALPHA_START);
            let a = ((alpha * 255.0) + 0.5).floor() as u8;
            let px = &mut out[(y * w + x) * 4..(y * w + x) * 4 + 4];
            px[0] = mul_div255(r, a);
            px[1] = mul_div255(g, a);
            px[2] = mul_div255(b, a);
            px[3] = a;
        }
    }
    out
}

fn mul_div255(c: u8, a: u8) -> u8 {
    (((u16::from(c) * u16::from(a)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_with_and_without_hash() {
        assert_eq!(parse_hex_color("#FF8000"), Some([0xFF, 0x80, 0x00]));
        assert_eq!(parse_hex_color("ff8000"), Some([0xFF, 0x80, 0x00]));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_hex_color("not-a-color"), None);
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
    }

    #[test]
    fn theme_rgb_falls_back_to_gray() {
        assert_eq!(theme_rgb("not-a-color"), FALLBACK_RGB);
        assert_eq!(theme_rgb("#112233"), [0x11, 0x22, 0x33]);
    }

    #[test]
    fn gradient_alpha_runs_top_left_to_bottom_right() {
        let canvas = Canvas {
            width: 4,
            height: 4,
        };
        let buf = gradient_background("#FFFFFF", canvas);
        let a_first = buf[3];
        let a_last = buf[buf.len() - 1];
        assert_eq!(a_first, ((0.25 * 255.0f64) + 0.5).floor() as u8);
        assert_eq!(a_last, ((0.125 * 255.0f64) + 0.5).floor() as u8);
        assert!(a_first > a_last);
    }

    #[test]
    fn gradient_is_deterministic() {
        let canvas = Canvas::THUMBNAIL;
        assert_eq!(
            gradient_background("#336699", canvas),
            gradient_background("#336699", canvas)
        );
    }

    #[test]
    fn invalid_color_matches_explicit_gray() {
        let canvas = Canvas {
            width: 8,
            height: 8,
        };
        assert_eq!(
            gradient_background("bogus", canvas),
            gradient_background("#9CA3AF", canvas)
        );
    }
}
