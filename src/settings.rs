//! Engine settings: defaults, a JSON file, and environment overrides, in that order.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{ExportError, ExportResult};

/// Overrides the ffmpeg binary.
pub const ENV_FFMPEG: &str = "MILESTONE_EXPORT_FFMPEG";
/// Adds a font file used by every renderer.
pub const ENV_FONT: &str = "MILESTONE_EXPORT_FONT";
/// Overrides the video frame rate.
pub const ENV_FPS: &str = "MILESTONE_EXPORT_FPS";

/// Video codecs the ffmpeg sink knows how to drive, in the container they are muxed into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    /// VP9 in WebM.
    Vp9,
    /// VP8 in WebM.
    Vp8,
    /// H.264 in MP4.
    H264,
}

impl VideoCodec {
    /// ffmpeg encoder name.
    pub fn encoder(self) -> &'static str {
        match self {
            VideoCodec::Vp9 => "libvpx-vp9",
            VideoCodec::Vp8 => "libvpx",
            VideoCodec::H264 => "libx264",
        }
    }

    /// Container file extension.
    pub fn extension(self) -> &'static str {
        match self {
            VideoCodec::Vp9 | VideoCodec::Vp8 => "webm",
            VideoCodec::H264 => "mp4",
        }
    }

    /// MIME type of the muxed stream.
    pub fn mime(self) -> &'static str {
        match self {
            VideoCodec::Vp9 => "video/webm;codecs=vp9",
            VideoCodec::Vp8 => "video/webm;codecs=vp8",
            VideoCodec::H264 => "video/mp4",
        }
    }
}

/// Runtime knobs shared by capture, the frame engine and the ffmpeg sink.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Video frames per second.
    pub fps: u32,
    /// Target video bitrate.
    pub bitrate_bps: u64,
    /// ffmpeg executable (name on `PATH` or absolute path).
    pub ffmpeg_bin: String,
    /// Extra font file loaded ahead of system fonts.
    pub font_path: Option<PathBuf>,
    /// Preview padding in CSS pixels.
    pub preview_padding_px: f64,
    /// Seed for background particles.
    pub particle_seed: u64,
    /// Upward text shift applied by the capture backend only.
    pub text_lift_px: f64,
    /// Codec preference, first supported wins.
    pub codecs: Vec<VideoCodec>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fps: 60,
            bitrate_bps: 8_000_000,
            ffmpeg_bin: "ffmpeg".to_string(),
            font_path: None,
            preview_padding_px: 20.0,
            particle_seed: 0x6d69_6c65_7374_6f6e,
            text_lift_px: 0.0,
            codecs: vec![VideoCodec::Vp9, VideoCodec::Vp8, VideoCodec::H264],
        }
    }
}

impl EngineSettings {
    /// Load from a JSON file, then apply environment overrides.
    pub fn from_path(path: &Path) -> ExportResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings from '{}'", path.display()))?;
        let settings: Self = serde_json::from_str(&text)?;
        settings.with_env_overrides()
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> ExportResult<Self> {
        Self::default().with_env_overrides()
    }

    /// Apply `MILESTONE_EXPORT_*` variables and validate.
    pub fn with_env_overrides(self) -> ExportResult<Self> {
        self.with_overrides(|k| std::env::var(k).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> ExportResult<Self> {
        if let Some(bin) = var(ENV_FFMPEG).filter(|v| !v.trim().is_empty()) {
            self.ffmpeg_bin = bin.trim().to_string();
        }
        if let Some(font) = var(ENV_FONT).filter(|v| !v.trim().is_empty()) {
            self.font_path = Some(PathBuf::from(font.trim()));
        }
        if let Some(fps) = var(ENV_FPS) {
            self.fps = fps
                .trim()
                .parse()
                .map_err(|_| ExportError::validation(format!("{ENV_FPS} must be an integer, got '{fps}'")))?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject settings no export could run with.
    pub fn validate(&self) -> ExportResult<()> {
        if self.fps == 0 {
            return Err(ExportError::validation("fps must be > 0"));
        }
        if self.bitrate_bps == 0 {
            return Err(ExportError::validation("bitrate_bps must be > 0"));
        }
        if !self.preview_padding_px.is_finite() || self.preview_padding_px < 0.0 {
            return Err(ExportError::validation("preview_padding_px must be finite and >= 0"));
        }
        if !self.text_lift_px.is_finite() {
            return Err(ExportError::validation("text_lift_px must be finite"));
        }
        if self.ffmpeg_bin.trim().is_empty() {
            return Err(ExportError::validation("ffmpeg_bin must be non-empty"));
        }
        if self.codecs.is_empty() {
            return Err(ExportError::validation("codecs must list at least one codec"));
        }
        Ok(())
    }
}
