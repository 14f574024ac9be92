//! RetroFX is a retro photo-filter engine.
//!
//! An image is filtered by a fixed effects pipeline (a parallel per-pixel colour pass followed by
//! ordered compositing stages) driven by a preset catalog of analog film looks. The public
//! surface is:
//!
//! - [`presets`] and [`EffectParameters`] describing a look
//! - [`EffectsPipeline`] for one-shot filtering of an [`RgbaFrame`]
//! - [`Editor`], the interactive session with debounced re-runs, sparkle animation and export
#![forbid(unsafe_code)]

mod assets;
mod composite;
mod editor;
mod export;
mod foundation;
mod params;
mod pipeline;
mod pixel;
mod sparkle;

pub use crate::assets::source::{SourceImage, fit_within, is_image_mime, sniff_format};
pub use crate::composite::blend::{BlendMode, BlendParams};
pub use crate::composite::blur::gaussian_blur;
pub use crate::composite::stages::CompositeStage;
pub use crate::editor::config::EditorConfig;
pub use crate::editor::orchestrator::{
    Editor, EditorState, EditorStats, PollOutcome, UploadOutcome,
};
pub use crate::editor::timing::{Debouncer, FramePacer, GraceTimer};
pub use crate::export::{ExportedImage, export_filename, export_jpeg, prepare_for_export};
pub use crate::foundation::core::{Point, RgbaFrame, Vec2, ViewportClass};
pub use crate::foundation::error::{RetroError, RetroResult};
pub use crate::params::effects::{EffectKey, EffectParameters, EffectValue, apply_edit};
pub use crate::params::preset::{FilterPreset, default_preset, find_preset, presets};
pub use crate::pipeline::{EffectsPipeline, PipelineOutput, SparkleSpec};
pub use crate::pixel::pass::{CHUNK_SIZE, PixelPass};
pub use crate::sparkle::overlay::{SparkleOverlay, SparkleParticle, particle_count};
