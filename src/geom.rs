//! Fixed thumbnail geometry and pixel rounding.

/// Raster surface bounds in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// The thumbnail surface. Dimensions never vary per call.
    pub const THUMBNAIL: Canvas = Canvas {
        width: 280,
        height: 420,
    };
}

/// The sub-region of the canvas where sticker layers may land.
///
/// `top_offset` leaves room for a label drawn by an external component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StickerArea {
    pub width: u32,
    pub height: u32,
    pub top_offset: u32,
}

impl StickerArea {
    pub const THUMBNAIL: StickerArea = StickerArea {
        width: 280,
        height: 380,
        top_offset: 40,
    };

    /// The enclosing canvas for this area (area plus label band).
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.top_offset + self.height,
        }
    }
}

/// Round-half-up to the nearest pixel.
///
/// This is the reference rounding for every coordinate in the projector and
/// clipper; `f64::round` differs at negative `.5` boundaries.
pub fn round_px(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}
