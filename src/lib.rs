//! Shareable artifact export for a milestone-tracking app.
//!
//! A milestone or a life statistic becomes either a themed card (PNG, SVG or PDF) or an animated
//! stat video:
//!
//! - Resolve a [`SceneDescription`] from a [`Payload`], a theme and a template
//! - Preview it at a fitted scale, or capture it at a fixed pixel density
//! - Or drive the [`FrameEngine`] into a [`VideoEncoder`]
//!
//! The [`Exporter`] owns both pipelines and is the only thing that hands artifacts to the host.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Staged reveal animations and the frame loop.
pub mod animation;
/// Image decoding, fonts and text layout.
pub mod assets;
/// Video encoders.
pub mod encode;
/// Export orchestration and delivery.
pub mod export;
/// Shared primitives and the error type.
pub mod foundation;
/// Payloads and export configuration.
pub mod model;
/// Preview, raster, SVG and PDF backends.
pub mod render;
/// Template resolution into renderer-agnostic scenes.
pub mod scene;
/// Engine settings.
pub mod settings;
/// Elapsed-time statistics.
pub mod stats;
/// Color themes.
pub mod theme;

pub use crate::animation::clock::{FrameClock, SteppedClock, WallClock};
pub use crate::animation::engine::{AnimationRequest, EngineState, FrameEngine, TickOutcome};
pub use crate::encode::ffmpeg::{FfmpegEncoder, FfmpegOpts};
pub use crate::encode::sink::{EncodedStream, EncoderConfig, InMemoryEncoder, VideoEncoder};
pub use crate::export::artifact::RenderedArtifact;
pub use crate::export::host::{
    ArtifactHost, DeliveryMode, DeliveryOutcome, DirectoryHost, MemoryHost,
};
pub use crate::export::orchestrator::{ExportState, Exported, Exporter, VideoProgress};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRGBA};
pub use crate::foundation::error::{ExportError, ExportResult};
pub use crate::model::config::{
    AspectRatio, ExportConfig, OutputKind, QualityTier, StaticFormat, TemplateId, VideoStyle,
};
pub use crate::model::payload::{MilestonePayload, Payload, Profile, StatPayload, StatUnit};
pub use crate::scene::model::SceneDescription;
pub use crate::settings::{EngineSettings, VideoCodec};
pub use crate::theme::tokens::{ColorTokens, ThemeId};
