use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;

use crate::animation::clock::FrameClock;
use crate::animation::engine::{AnimationRequest, EngineState, FrameEngine, TickOutcome};
use crate::animation::frame::VideoContent;
use crate::assets::fonts::FontBook;
use crate::assets::store::AssetStore;
use crate::encode::ffmpeg::{FfmpegEncoder, FfmpegOpts};
use crate::encode::sink::VideoEncoder;
use crate::export::artifact::RenderedArtifact;
use crate::export::filename::{artifact_filename, artifact_stem};
use crate::export::host::{ArtifactHost, DeliveryMode, DeliveryOutcome};
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{ExportError, ExportResult};
use crate::model::config::{ExportConfig, OutputKind, StaticFormat};
use crate::model::payload::{Payload, Profile};
use crate::render::capture::{CaptureTarget, capture};
use crate::render::preview::{DualRender, Viewport};
use crate::scene::build::{SceneFlags, Subject, build_scene};
use crate::scene::model::SceneDescription;
use crate::settings::EngineSettings;
use crate::theme::tokens::resolve;

/// Which pipeline currently owns the render surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportState {
    /// Nothing is open.
    Idle,
    /// An interactive preview is open.
    Previewing,
    /// A static capture is in progress.
    CapturingStatic,
    /// A video run is in flight.
    RenderingVideo,
}

/// A delivered export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exported {
    /// What was produced.
    pub artifact: RenderedArtifact,
    /// What the host did with it.
    pub outcome: DeliveryOutcome,
}

/// Progress of a video export.
#[derive(Debug)]
pub enum VideoProgress {
    /// Frames still to draw.
    Rendering {
        /// Frames pushed so far.
        drawn: u64,
        /// Frames in the run.
        total: u64,
    },
    /// Encoded and handed to the host.
    Done(Exported),
}

struct Preview {
    render: DualRender,
    assets: AssetStore,
}

struct VideoJob {
    stem: String,
    mode: DeliveryMode,
}

/// Single owner of the export pipelines; at most one export is active at a time.
pub struct Exporter<H: ArtifactHost> {
    config: ExportConfig,
    profile: Profile,
    subject: Subject,
    settings: EngineSettings,
    fonts: FontBook,
    host: H,
    engine: FrameEngine<Box<dyn VideoEncoder>>,
    state: ExportState,
    preview: Option<Preview>,
    video: Option<VideoJob>,
}

impl<H: ArtifactHost> Exporter<H> {
    /// Build an exporter that encodes video with `encoder`.
    pub fn new(
        config: ExportConfig,
        profile: Profile,
        settings: EngineSettings,
        fonts: FontBook,
        host: H,
        encoder: Box<dyn VideoEncoder>,
    ) -> ExportResult<Self> {
        config.validate()?;
        let subject = Subject::from_profile(&profile)?;
        let engine = FrameEngine::new(&settings, fonts.clone(), encoder)?;
        Ok(Self {
            config,
            profile,
            subject,
            settings,
            fonts,
            host,
            engine,
            state: ExportState::Idle,
            preview: None,
            video: None,
        })
    }

    /// Build an exporter that encodes video through the ffmpeg binary named in `settings`.
    pub fn with_ffmpeg(
        config: ExportConfig,
        profile: Profile,
        settings: EngineSettings,
        fonts: FontBook,
        host: H,
    ) -> ExportResult<Self> {
        let encoder = Box::new(FfmpegEncoder::new(FfmpegOpts::from_settings(&settings)));
        Self::new(config, profile, settings, fonts, host, encoder)
    }

    /// Current state.
    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Active configuration.
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// The host artifacts are delivered to.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The frame engine, for inspection.
    pub fn engine(&self) -> &FrameEngine<Box<dyn VideoEncoder>> {
        &self.engine
    }

    /// Replace the configuration. An open preview keeps its scene until the next `open_preview`.
    pub fn set_config(&mut self, config: ExportConfig) -> ExportResult<()> {
        config.validate()?;
        tracing::debug!(?config, "export config changed");
        self.config = config;
        Ok(())
    }

    fn scene_for(&self, payload: &Payload, now: NaiveDateTime) -> SceneDescription {
        build_scene(
            payload,
            &self.subject,
            &resolve(self.config.theme),
            self.config.template,
            self.config.aspect_ratio,
            SceneFlags::from(&self.config),
            now,
        )
    }

    fn settle(&mut self) {
        self.state = if self.preview.is_some() {
            ExportState::Previewing
        } else {
            ExportState::Idle
        };
    }

    fn cancel_video(&mut self) {
        if self.video.take().is_some() || self.engine.state() != EngineState::Idle {
            tracing::info!("cancelling in-flight video");
            self.engine.cancel();
        }
    }

    /// Open (or replace) the interactive preview and return its pixels.
    #[tracing::instrument(level = "debug", skip(self, payload))]
    pub fn open_preview(
        &mut self,
        payload: &Payload,
        viewport: Viewport,
        now: NaiveDateTime,
    ) -> ExportResult<FrameRGBA> {
        self.cancel_video();
        self.settle();
        let scene = Arc::new(self.scene_for(payload, now));
        let assets = AssetStore::prepare(&self.profile, &scene)?;
        let render = DualRender::new(scene, viewport, self.settings.preview_padding_px);
        let pixels = render.render_preview(&assets, &self.fonts)?;
        self.preview = Some(Preview { render, assets });
        self.state = ExportState::Previewing;
        Ok(pixels)
    }

    /// Refit the open preview to a new container size.
    pub fn resize_preview(&mut self, viewport: Viewport) -> ExportResult<FrameRGBA> {
        let preview = self
            .preview
            .as_mut()
            .ok_or_else(|| ExportError::validation("no preview is open"))?;
        preview.render.resize(viewport);
        preview.render.render_preview(&preview.assets, &self.fonts)
    }

    /// Scale of the open preview.
    pub fn preview_scale(&self) -> Option<f64> {
        self.preview.as_ref().map(|p| p.render.scale())
    }

    /// Close the preview. Does not touch a running video.
    pub fn close_preview(&mut self) {
        self.preview = None;
        if self.state == ExportState::Previewing {
            self.state = ExportState::Idle;
        }
    }

    /// Capture `payload` as the configured static format and deliver it.
    ///
    /// When the open preview shows the same scene, its scene and decoded images are captured
    /// directly. Cancels any video in flight. On failure no artifact is delivered and the exporter is ready
    /// for a retry.
    #[tracing::instrument(level = "info", skip(self, payload), fields(title = payload.title()))]
    pub fn export_static(
        &mut self,
        payload: &Payload,
        mode: DeliveryMode,
        now: NaiveDateTime,
    ) -> ExportResult<Exported> {
        let OutputKind::Static { format } = self.config.output else {
            return Err(ExportError::validation(
                "export config selects an animated output",
            ));
        };
        self.cancel_video();
        self.state = ExportState::CapturingStatic;
        let captured = self.capture_static(payload, format, now);
        self.settle();
        let artifact =
            captured.inspect_err(|e| tracing::warn!(error = %e, "static capture failed"))?;
        self.deliver(artifact, mode)
    }

    /// The open preview, if it shows exactly `scene`.
    fn preview_showing(&self, scene: &SceneDescription) -> Option<&Preview> {
        self.preview
            .as_ref()
            .filter(|p| p.render.scene().as_ref() == scene)
    }

    fn capture_static(
        &self,
        payload: &Payload,
        format: StaticFormat,
        now: NaiveDateTime,
    ) -> ExportResult<RenderedArtifact> {
        let scene = self.scene_for(payload, now);
        let lift = self.settings.text_lift_px;
        let bytes = match self.preview_showing(&scene) {
            Some(preview) => {
                tracing::debug!("capturing the previewed scene");
                let target = preview.render.capture_target(&preview.assets, &self.fonts, lift);
                capture(&target, self.config.quality, format)?
            }
            None => {
                let assets = AssetStore::prepare(&self.profile, &scene)?;
                let target = CaptureTarget {
                    scene: &scene,
                    assets: &assets,
                    fonts: &self.fonts,
                    text_lift_px: lift,
                };
                capture(&target, self.config.quality, format)?
            }
        };
        Ok(RenderedArtifact {
            bytes,
            mime: format.mime(),
            filename: artifact_filename(&self.subject.name, payload, now, format.extension()),
        })
    }

    fn deliver(&mut self, artifact: RenderedArtifact, mode: DeliveryMode) -> ExportResult<Exported> {
        let outcome = self.host.deliver(&artifact, mode)?;
        if let DeliveryOutcome::Skipped { reason } = &outcome {
            tracing::info!(file = %artifact.filename, reason, "delivery skipped");
        }
        Ok(Exported { artifact, outcome })
    }

    /// Begin a video export of `payload`; drive it with [`Exporter::tick`].
    ///
    /// A video already in flight is cancelled first.
    #[tracing::instrument(level = "info", skip(self, payload), fields(title = payload.title()))]
    pub fn start_animated(
        &mut self,
        payload: &Payload,
        mode: DeliveryMode,
        now: NaiveDateTime,
    ) -> ExportResult<()> {
        let OutputKind::Animated {
            duration_secs,
            style,
        } = self.config.output
        else {
            return Err(ExportError::validation("export config selects a static output"));
        };
        self.cancel_video();
        let request = AnimationRequest {
            style,
            canvas: self.config.canvas(),
            duration_secs,
            content: VideoContent::for_payload(payload, &self.subject),
        };
        if let Err(e) = self.engine.start(request) {
            self.settle();
            return Err(e);
        }
        self.video = Some(VideoJob {
            stem: artifact_stem(&self.subject.name, payload, now),
            mode,
        });
        self.state = ExportState::RenderingVideo;
        Ok(())
    }

    /// Advance the video run to `elapsed` since `start_animated`.
    pub fn tick(&mut self, elapsed: Duration) -> ExportResult<VideoProgress> {
        if self.state != ExportState::RenderingVideo {
            return Err(ExportError::validation("no video export is running"));
        }
        match self.engine.tick(elapsed) {
            Ok(TickOutcome::Pending { drawn, total }) => {
                Ok(VideoProgress::Rendering { drawn, total })
            }
            Ok(TickOutcome::Finished(stream)) => {
                let job = self
                    .video
                    .take()
                    .ok_or_else(|| ExportError::validation("video job missing"))?;
                self.settle();
                let artifact = RenderedArtifact::from_stream(stream, &job.stem);
                self.deliver(artifact, job.mode).map(VideoProgress::Done)
            }
            Err(e) => {
                self.video = None;
                self.settle();
                Err(e)
            }
        }
    }

    /// Elapsed time at which the running video next needs a tick.
    pub fn next_frame_due(&self) -> Option<Duration> {
        self.engine.next_frame_due()
    }

    /// Run a whole video export with `clock`.
    pub fn export_animated(
        &mut self,
        payload: &Payload,
        mode: DeliveryMode,
        now: NaiveDateTime,
        clock: &mut dyn FrameClock,
    ) -> ExportResult<Exported> {
        self.start_animated(payload, mode, now)?;
        loop {
            if let VideoProgress::Done(exported) = self.tick(clock.elapsed())? {
                return Ok(exported);
            }
            if let Some(due) = self.next_frame_due() {
                clock.wait_until(due);
            }
        }
    }

    /// Abandon the running video; partial output is discarded.
    pub fn cancel(&mut self) {
        self.cancel_video();
        self.settle();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/orchestrator.rs"]
mod tests;
