//! Final PNG encoding of the composited canvas.

use std::io::Cursor;

use crate::{
    error::{ThumbsmithError, ThumbsmithResult},
    geom::Canvas,
};

/// Encode a premultiplied canvas buffer as a PNG byte buffer.
///
/// The only fatal error class in a render: everything upstream degrades
/// per-layer, but a thumbnail that cannot be encoded has no usable fallback.
pub fn encode_png(canvas: Canvas, premul: &[u8]) -> ThumbsmithResult<Vec<u8>> {
    let expected = canvas.width as usize * canvas.height as usize * 4;
    if premul.len() != expected {
        return Err(ThumbsmithError::encode(format!(
            "canvas buffer is {} bytes, expected {expected}",
            premul.len()
        )));
    }

    let mut straight = premul.to_vec();
    unpremultiply_rgba8_in_place(&mut straight);

    let img = image::RgbaImage::from_raw(canvas.width, canvas.height, straight)
        .ok_or_else(|| ThumbsmithError::encode("canvas buffer does not fit dimensions"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| ThumbsmithError::encode(format!("png encode failed: {e}")))?;
    Ok(out)
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            let v = (u16::from(*c) * 255 + a / 2) / a;
            *c = v.min(255) as u8;
        }
    }
}
