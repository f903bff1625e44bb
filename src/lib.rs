#![forbid(unsafe_code)]

pub mod assets;
pub mod background;
pub mod clip;
pub mod composite;
pub mod encode;
pub mod error;
pub mod geom;
pub mod model;
pub mod pipeline;
pub mod project;

pub use assets::{AssetResolver, DecodedAsset, MemoryAssets};
pub use clip::{ClipRect, clip_to_canvas};
pub use error::{ThumbsmithError, ThumbsmithResult};
pub use geom::{Canvas, StickerArea};
pub use model::LayoutRecord;
pub use pipeline::{
    RenderOptions, RenderReport, SkipReason, render_thumbnail, render_thumbnail_with_report,
};
pub use project::{RenderedLayer, project_layer};
