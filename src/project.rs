//! Projection of layout records into canvas-space pixel layers.
//!
//! Each record is computed independently from its own raw percentages, so
//! fractional positions never accumulate rounding drift across layers.

use kurbo::{Affine, Point};

use crate::{
    assets::DecodedAsset,
    geom::{StickerArea, round_px},
    model::LayoutRecord,
};

/// A sticker's post-scale, post-rotation pixel buffer and its canvas
/// destination. `dest_x`/`dest_y` are signed: partially or fully off-canvas
/// placements are legitimate and resolved by the clipper.
#[derive(Clone, Debug)]
pub struct RenderedLayer {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major.
    pub data: Vec<u8>,
    pub dest_x: i64,
    pub dest_y: i64,
}

/// Project one record into a layer candidate.
///
/// The anchor is the square's top-left in canvas coordinates. Rotation keeps
/// the square's center fixed (CSS `transform: rotate`), so a rotated layer's
/// enlarged bounding buffer shifts its destination up-left by half the
/// growth on each axis.
pub fn project_layer(
    record: &LayoutRecord,
    area: StickerArea,
    asset: &DecodedAsset,
) -> RenderedLayer {
    let left = round_px(record.x / 100.0 * f64::from(area.width));
    let top = round_px(f64::from(area.top_offset) + record.y / 100.0 * f64::from(area.height));

    let size = record.size_px;
    let square = scale_to_contain(asset, size);

    if record.rotation_deg == 0.0 {
        return RenderedLayer {
            width: size,
            height: size,
            data: square,
            dest_x: left,
            dest_y: top,
        };
    }

    let rad = record.rotation_deg.to_radians();
    let (out_w, out_h) = rotated_bounds(size, rad);
    let data = rotate_square(&square, size, rad, out_w, out_h);

    RenderedLayer {
        width: out_w,
        height: out_h,
        data,
        dest_x: left - round_px(f64::from(out_w - size) / 2.0),
        dest_y: top - round_px(f64::from(out_h - size) / 2.0),
    }
}

/// Bounding box of a `size`-sided square rotated by `rad` about its center.
///
/// The epsilon snap keeps quarter-turn rotations from ceiling up a whole
/// pixel on floating-point dust.
fn rotated_bounds(size: u32, rad: f64) -> (u32, u32) {
    let (s, c) = rad.sin_cos();
    let side = f64::from(size);
    let extent = side * c.abs() + side * s.abs();
    let out = (extent - 1e-9).ceil().max(1.0) as u32;
    (out, out)
}

/// Scale the asset into a `size`-sided square, aspect-preserving, centered,
/// transparent where the aspect ratios differ. Bilinear over premultiplied
/// pixels, so edges blend against transparency rather than fringe.
fn scale_to_contain(asset: &DecodedAsset, size: u32) -> Vec<u8> {
    let side = size as usize;
    let mut out = vec![0u8; side * side * 4];
    if asset.width == 0 || asset.height == 0 || size == 0 {
        return out;
    }

    let scale = (f64::from(size) / f64::from(asset.width))
        .min(f64::from(size) / f64::from(asset.height));
    let scaled_w = f64::from(asset.width) * scale;
    let scaled_h = f64::from(asset.height) * scale;
    let off_x = (f64::from(size) - scaled_w) / 2.0;
    let off_y = (f64::from(size) - scaled_h) / 2.0;

    let src = asset.rgba8_premul.as_slice();
    for dy in 0..side {
        for dx in 0..side {
            let sx = (dx as f64 + 0.5 - off_x) / scale - 0.5;
            let sy = (dy as f64 + 0.5 - off_y) / scale - 0.5;
            let px = sample_bilinear(src, asset.width, asset.height, sx, sy);
            out[(dy * side + dx) * 4..(dy * side + dx) * 4 + 4].copy_from_slice(&px);
        }
    }
    out
}

/// Resample the square into its rotated bounding buffer via the inverse
/// affine map, output-pixel-driven so every destination texel is defined.
fn rotate_square(square: &[u8], size: u32, rad: f64, out_w: u32, out_h: u32) -> Vec<u8> {
    let src_center = f64::from(size) / 2.0;
    let inv = Affine::translate((src_center, src_center))
        * Affine::rotate(-rad)
        * Affine::translate((-f64::from(out_w) / 2.0, -f64::from(out_h) / 2.0));

    let mut out = vec![0u8; out_w as usize * out_h as usize * 4];
    for dy in 0..out_h as usize {
        for dx in 0..out_w as usize {
            let p = inv * Point::new(dx as f64 + 0.5, dy as f64 + 0.5);
            let px = sample_bilinear(square, size, size, p.x - 0.5, p.y - 0.5);
            out[(dy * out_w as usize + dx) * 4..(dy * out_w as usize + dx) * 4 + 4]
                .copy_from_slice(&px);
        }
    }
    out
}

fn texel(data: &[u8], width: u32, height: u32, x: i64, y: i64) -> [f64; 4] {
    if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
        return [0.0; 4];
    }
    let i = (y as usize * width as usize + x as usize) * 4;
    [
        f64::from(data[i]),
        f64::from(data[i + 1]),
        f64::from(data[i + 2]),
        f64::from(data[i + 3]),
    ]
}

fn sample_bilinear(data: &[u8], width: u32, height: u32, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = x - x0;
    let ty = y - y0;
    let xi = x0 as i64;
    let yi = y0 as i64;

    let mut acc = [0.0f64; 4];
    for (dy, wy) in [(0, 1.0 - ty), (1, ty)] {
        if wy == 0.0 {
            continue;
        }
        for (dx, wx) in [(0, 1.0 - tx), (1, tx)] {
            if wx == 0.0 {
                continue;
            }
            let t = texel(data, width, height, xi + dx, yi + dy);
            let w = wx * wy;
            for i in 0..4 {
                acc[i] += t[i] * w;
            }
        }
    }
    [
        (acc[0] + 0.5) as u8,
        (acc[1] + 0.5) as u8,
        (acc[2] + 0.5) as u8,
        (acc[3] + 0.5) as u8,
    ]
}
