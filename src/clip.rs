//! Hard clipping of layer candidates at canvas bounds.
//!
//! Equivalent to CSS `overflow: hidden` on the card: pixels outside the
//! canvas are discarded, never scaled or wrapped. Clipping always runs on
//! the post-rotation bounding buffer; rotating a square can swing corners
//! back inside bounds the unrotated box never touched.

use crate::geom::Canvas;

/// The visible sub-rectangle of a layer. Unsigned and in-bounds by
/// construction: `dest + crop` extents never exceed the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipRect {
    pub crop_x: u32,
    pub crop_y: u32,
    pub crop_w: u32,
    pub crop_h: u32,
    pub dest_x: u32,
    pub dest_y: u32,
}

/// Clip a layer placed at `(dest_x, dest_y)` with `width`x`height` pixels
/// against the canvas. `None` means the layer lies fully outside; that is a
/// normal outcome (a sticker dragged off the card), not an error.
pub fn clip_to_canvas(
    dest_x: i64,
    dest_y: i64,
    width: u32,
    height: u32,
    canvas: Canvas,
) -> Option<ClipRect> {
    let mut crop_x = 0i64;
    let mut crop_y = 0i64;
    let mut w = i64::from(width);
    let mut h = i64::from(height);
    let mut dx = dest_x;
    let mut dy = dest_y;

    if dx < 0 {
        crop_x = -dx;
        w += dx;
        dx = 0;
    }
    if dy < 0 {
        crop_y = -dy;
        h += dy;
        dy = 0;
    }
    if dx + w > i64::from(canvas.width) {
        w = i64::from(canvas.width) - dx;
    }
    if dy + h > i64::from(canvas.height) {
        h = i64::from(canvas.height) - dy;
    }

    if w <= 0 || h <= 0 {
        return None;
    }

    Some(ClipRect {
        crop_x: crop_x as u32,
        crop_y: crop_y as u32,
        crop_w: w as u32,
        crop_h: h as u32,
        dest_x: dx as u32,
        dest_y: dy as u32,
    })
}
