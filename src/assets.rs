//! Decoded sticker assets and the resolution capability.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;

use crate::error::ThumbsmithResult;

/// A decoded sticker image.
#[derive(Clone, Debug)]
pub struct DecodedAsset {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedAsset {
    /// Decode an encoded image (PNG, JPEG, ...) and premultiply its alpha.
    pub fn decode(bytes: &[u8]) -> ThumbsmithResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode sticker from memory")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut rgba8_premul = rgba.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);

        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Build an asset from straight-alpha RGBA8 (fixtures, upstream decoders).
    pub fn from_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> ThumbsmithResult<Self> {
        if rgba.len() != width as usize * height as usize * 4 {
            return Err(crate::ThumbsmithError::asset(
                "rgba byte length does not match dimensions",
            ));
        }
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba),
        })
    }
}

/// Caller-supplied asset lookup.
///
/// `Ok(None)` means the sticker is absent (not uploaded yet); the pipeline
/// skips that layer. An `Err` is treated the same way, so a flaky store can
/// never abort a render.
pub trait AssetResolver: Sync {
    fn resolve(&self, sticker: &str) -> ThumbsmithResult<Option<DecodedAsset>>;
}

/// In-memory resolver for tests and pre-fetched callers.
#[derive(Default)]
pub struct MemoryAssets {
    map: HashMap<String, DecodedAsset>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sticker: impl Into<String>, asset: DecodedAsset) {
        self.map.insert(sticker.into(), asset);
    }
}

impl AssetResolver for MemoryAssets {
    fn resolve(&self, sticker: &str) -> ThumbsmithResult<Option<DecodedAsset>> {
        Ok(self.map.get(sticker).cloned())
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
