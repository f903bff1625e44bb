//! The thumbnail render pipeline.
//!
//! One call is a pure function of its inputs: background, then per-record
//! resolve/project/clip with per-layer failure containment, then strictly
//! sequential source-over compositing in paint order, then PNG encode. A
//! render either yields a complete thumbnail (possibly missing skipped
//! layers) or an explicit error, never a partial image.

use rayon::prelude::*;

use crate::{
    assets::AssetResolver,
    background::gradient_background,
    clip::{ClipRect, clip_to_canvas},
    composite::blit_over,
    encode::encode_png,
    error::{ThumbsmithError, ThumbsmithResult},
    geom::{Canvas, StickerArea},
    model::LayoutRecord,
    project::{RenderedLayer, project_layer},
};

/// Why a record contributed nothing to the output.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SkipReason {
    /// The resolver reported the sticker as not (yet) available.
    AssetAbsent,
    /// The resolver errored; treated the same as absent.
    AssetFailed(String),
    /// Every pixel fell outside the canvas. Normal outcome, not logged.
    FullyClipped,
    /// Degenerate geometry (`size_px == 0` or an empty asset buffer).
    EmptyLayer,
}

/// Per-render diagnostics, in paint order.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct RenderReport {
    pub layers_total: usize,
    pub layers_drawn: usize,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Asset preparation threading. Compositing is always sequential; parallelism
/// only covers resolve/decode/project/clip, and the order-preserving collect
/// keeps the paint sequence identical either way.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    pub parallel: bool,
    pub threads: Option<usize>,
}

enum Prepared {
    Drawn(RenderedLayer, ClipRect),
    Skipped(SkipReason),
}

/// Render the fixed 280x420 thumbnail. The convenience entry point.
pub fn render_thumbnail(
    theme_color: &str,
    records: &[LayoutRecord],
    resolver: &dyn AssetResolver,
) -> ThumbsmithResult<Vec<u8>> {
    render_thumbnail_with_report(
        theme_color,
        StickerArea::THUMBNAIL,
        records,
        resolver,
        &RenderOptions::default(),
    )
    .map(|(png, _)| png)
}

/// Full pipeline with diagnostics.
#[tracing::instrument(skip(records, resolver, options), fields(records = records.len()))]
pub fn render_thumbnail_with_report(
    theme_color: &str,
    area: StickerArea,
    records: &[LayoutRecord],
    resolver: &dyn AssetResolver,
    options: &RenderOptions,
) -> ThumbsmithResult<(Vec<u8>, RenderReport)> {
    let canvas = area.canvas();
    let mut canvas_buf = gradient_background(theme_color, canvas);

    // Paint order is ascending `order`; stable sort keeps insertion order
    // among ties, matching the z-index model of the source layout store.
    let mut ordered: Vec<&LayoutRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.order);

    let prepared: Vec<Prepared> = if options.parallel {
        let pool = build_thread_pool(options.threads)?;
        pool.install(|| {
            ordered
                .par_iter()
                .map(|record| prepare_layer(record, area, canvas, resolver))
                .collect()
        })
    } else {
        ordered
            .iter()
            .map(|record| prepare_layer(record, area, canvas, resolver))
            .collect()
    };

    let mut report = RenderReport {
        layers_total: records.len(),
        ..RenderReport::default()
    };

    for (record, item) in ordered.iter().zip(prepared) {
        match item {
            Prepared::Drawn(layer, clip) => {
                blit_over(&mut canvas_buf, canvas, &layer, clip)?;
                report.layers_drawn += 1;
            }
            Prepared::Skipped(reason) => {
                match &reason {
                    SkipReason::AssetAbsent => {
                        tracing::warn!(id = %record.id, sticker = %record.sticker, "sticker asset absent, skipping layer");
                    }
                    SkipReason::AssetFailed(err) => {
                        tracing::warn!(id = %record.id, sticker = %record.sticker, error = %err, "sticker resolution failed, skipping layer");
                    }
                    SkipReason::FullyClipped | SkipReason::EmptyLayer => {}
                }
                report.skipped.push((record.id.clone(), reason));
            }
        }
    }

    let png = encode_png(canvas, &canvas_buf)?;
    Ok((png, report))
}

fn prepare_layer(
    record: &LayoutRecord,
    area: StickerArea,
    canvas: Canvas,
    resolver: &dyn AssetResolver,
) -> Prepared {
    if record.size_px == 0 {
        return Prepared::Skipped(SkipReason::EmptyLayer);
    }

    let asset = match resolver.resolve(&record.sticker) {
        Ok(Some(asset)) => asset,
        Ok(None) => return Prepared::Skipped(SkipReason::AssetAbsent),
        Err(e) => return Prepared::Skipped(SkipReason::AssetFailed(e.to_string())),
    };
    if asset.width == 0 || asset.height == 0 {
        return Prepared::Skipped(SkipReason::EmptyLayer);
    }

    let layer = project_layer(record, area, &asset);
    match clip_to_canvas(layer.dest_x, layer.dest_y, layer.width, layer.height, canvas) {
        Some(clip) => Prepared::Drawn(layer, clip),
        None => Prepared::Skipped(SkipReason::FullyClipped),
    }
}

fn build_thread_pool(threads: Option<usize>) -> ThumbsmithResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ThumbsmithError::validation(
            "render options 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ThumbsmithError::validation(format!("failed to build rayon thread pool: {e}")))
}
