//! Source-over compositing of clipped layers onto the background.

use crate::{
    clip::ClipRect,
    error::{ThumbsmithError, ThumbsmithResult},
    geom::Canvas,
    project::RenderedLayer,
};

pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over: `out = src + dst * (1 - src_alpha)`.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Blend the clipped sub-rectangle of `layer` onto the canvas buffer.
///
/// Callers feed layers strictly in ascending paint order; this function does
/// one layer and has no opinion about ordering.
pub fn blit_over(
    canvas_buf: &mut [u8],
    canvas: Canvas,
    layer: &RenderedLayer,
    clip: ClipRect,
) -> ThumbsmithResult<()> {
    let cw = canvas.width as usize;
    if canvas_buf.len() != cw * canvas.height as usize * 4 {
        return Err(ThumbsmithError::validation(
            "blit_over canvas buffer length mismatch",
        ));
    }
    let lw = layer.width as usize;
    if layer.data.len() != lw * layer.height as usize * 4 {
        return Err(ThumbsmithError::validation(
            "blit_over layer buffer length mismatch",
        ));
    }
    if clip.crop_x + clip.crop_w > layer.width || clip.crop_y + clip.crop_h > layer.height {
        return Err(ThumbsmithError::validation(
            "blit_over clip exceeds layer bounds",
        ));
    }
    if clip.dest_x + clip.crop_w > canvas.width || clip.dest_y + clip.crop_h > canvas.height {
        return Err(ThumbsmithError::validation(
            "blit_over clip exceeds canvas bounds",
        ));
    }

    for row in 0..clip.crop_h as usize {
        let src_y = clip.crop_y as usize + row;
        let dst_y = clip.dest_y as usize + row;
        let src_row = &layer.data[(src_y * lw + clip.crop_x as usize) * 4..]
            [..clip.crop_w as usize * 4];
        let dst_row = &mut canvas_buf[(dst_y * cw + clip.dest_x as usize) * 4..]
            [..clip.crop_w as usize * 4];
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = [10, 20, 30, 40];
        let src = [0, 0, 0, 0];
        assert_eq!(over(dst, src), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let dst = [0, 0, 0, 255];
        let src = [255, 0, 0, 255];
        assert_eq!(over(dst, src), src);
    }

    #[test]
    fn over_dst_transparent_returns_src() {
        let dst = [0, 0, 0, 0];
        let src = [100, 110, 120, 200];
        assert_eq!(over(dst, src), src);
    }

    #[test]
    fn over_half_alpha_blends() {
        let dst = [255, 255, 255, 255];
        // Premultiplied half-opaque black.
        let src = [0, 0, 0, 128];
        let out = over(dst, src);
        assert_eq!(out[3], 255);
        assert!(out[0] > 100 && out[0] < 140);
    }

    fn solid_layer(w: u32, h: u32, px: [u8; 4], dest_x: i64, dest_y: i64) -> RenderedLayer {
        RenderedLayer {
            width: w,
            height: h,
            data: px.repeat(w as usize * h as usize),
            dest_x,
            dest_y,
        }
    }

    #[test]
    fn blit_writes_only_the_clipped_window() {
        let canvas = Canvas {
            width: 8,
            height: 8,
        };
        let mut buf = vec![0u8; 8 * 8 * 4];
        let layer = solid_layer(4, 4, [255, 0, 0, 255], 2, 2);
        let clip = ClipRect {
            crop_x: 0,
            crop_y: 0,
            crop_w: 4,
            crop_h: 4,
            dest_x: 2,
            dest_y: 2,
        };
        blit_over(&mut buf, canvas, &layer, clip).unwrap();

        let px = |x: usize, y: usize| &buf[(y * 8 + x) * 4..(y * 8 + x) * 4 + 4];
        assert_eq!(px(2, 2), &[255, 0, 0, 255]);
        assert_eq!(px(5, 5), &[255, 0, 0, 255]);
        assert_eq!(px(1, 2), &[0, 0, 0, 0]);
        assert_eq!(px(6, 6), &[0, 0, 0, 0]);
    }

    #[test]
    fn blit_respects_source_crop() {
        let canvas = Canvas {
            width: 4,
            height: 4,
        };
        let mut buf = vec![0u8; 4 * 4 * 4];
        // Left half green, right half blue.
        let mut data = Vec::new();
        for _y in 0..2 {
            data.extend_from_slice(&[0, 255, 0, 255]);
            data.extend_from_slice(&[0, 0, 255, 255]);
        }
        let layer = RenderedLayer {
            width: 2,
            height: 2,
            data,
            dest_x: 0,
            dest_y: 0,
        };
        // Crop to the right column only.
        let clip = ClipRect {
            crop_x: 1,
            crop_y: 0,
            crop_w: 1,
            crop_h: 2,
            dest_x: 0,
            dest_y: 0,
        };
        blit_over(&mut buf, canvas, &layer, clip).unwrap();
        assert_eq!(&buf[0..4], &[0, 0, 255, 255]);
    }

    #[test]
    fn blit_rejects_out_of_bounds_clip() {
        let canvas = Canvas {
            width: 4,
            height: 4,
        };
        let mut buf = vec![0u8; 4 * 4 * 4];
        let layer = solid_layer(2, 2, [1, 1, 1, 255], 0, 0);
        let clip = ClipRect {
            crop_x: 0,
            crop_y: 0,
            crop_w: 3,
            crop_h: 2,
            dest_x: 0,
            dest_y: 0,
        };
        assert!(blit_over(&mut buf, canvas, &layer, clip).is_err());
    }
}
