use std::time::Duration;

use crate::animation::background::base_color;
use crate::animation::clock::FrameClock;
use crate::animation::frame::{AnimationContext, VideoContent, compose_frame};
use crate::animation::painter::FramePainter;
use crate::assets::fonts::FontBook;
use crate::encode::sink::{EncodedStream, EncoderConfig, VideoEncoder};
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRGBA};
use crate::foundation::error::{ExportError, ExportResult};
use crate::model::config::VideoStyle;
use crate::settings::EngineSettings;

/// What to animate.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationRequest {
    /// Visual style.
    pub style: VideoStyle,
    /// Surface size; both sides must be even for yuv420p output.
    pub canvas: Canvas,
    /// Length in seconds.
    pub duration_secs: u32,
    /// Copy.
    pub content: VideoContent,
}

/// Frame engine lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// No run.
    Idle,
    /// Frames are being drawn and pushed.
    Running,
    /// The encoder is finalizing the stream.
    Finalizing,
}

/// Result of one tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// More frames to come; `drawn` frames have been pushed so far.
    Pending {
        /// Frames pushed so far.
        drawn: u64,
        /// Frames in the run.
        total: u64,
    },
    /// The run is complete.
    Finished(EncodedStream),
}

struct Run {
    ctx: AnimationContext,
    painter: FramePainter,
    next_frame: u64,
}

/// Draws staged reveal animations and streams them into a [`VideoEncoder`].
///
/// Single-threaded and cooperative: the caller drives it with [`FrameEngine::tick`], passing the
/// time elapsed since `start`.
pub struct FrameEngine<E: VideoEncoder> {
    fps: Fps,
    seed: u64,
    bitrate_bps: u64,
    fonts: FontBook,
    encoder: E,
    state: EngineState,
    run: Option<Run>,
}

impl<E: VideoEncoder> FrameEngine<E> {
    /// Create an idle engine.
    pub fn new(settings: &EngineSettings, fonts: FontBook, encoder: E) -> ExportResult<Self> {
        settings.validate()?;
        Ok(Self {
            fps: Fps::new(settings.fps, 1)?,
            seed: settings.particle_seed,
            bitrate_bps: settings.bitrate_bps,
            fonts,
            encoder,
            state: EngineState::Idle,
            run: None,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Frame rate of every run.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Context of the run in flight.
    pub fn context(&self) -> Option<&AnimationContext> {
        self.run.as_ref().map(|r| &r.ctx)
    }

    /// The encoder.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Elapsed time at which the next undrawn frame is due.
    pub fn next_frame_due(&self) -> Option<Duration> {
        let run = self.run.as_ref()?;
        let nanos = self.fps.nanos_for_frame(run.next_frame);
        Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
    }

    fn plan(&self, request: &AnimationRequest) -> ExportResult<AnimationContext> {
        AnimationContext::new(
            request.style,
            request.canvas,
            self.fps,
            request.duration_secs,
            request.content.clone(),
            self.seed,
        )
    }

    /// Begin a run: fix the surface, seed particles, open the encoder.
    #[tracing::instrument(level = "info", skip_all, fields(style = %request.style, secs = request.duration_secs))]
    pub fn start(&mut self, request: AnimationRequest) -> ExportResult<()> {
        if self.state != EngineState::Idle {
            return Err(ExportError::busy("an animation is already running"));
        }
        let ctx = self.plan(&request)?;
        let painter = FramePainter::new(&ctx, self.fonts.clone())?;
        self.encoder.begin(EncoderConfig {
            width: ctx.canvas.width,
            height: ctx.canvas.height,
            fps: self.fps,
            bitrate_bps: self.bitrate_bps,
            background: base_color(ctx.style).rgba8(255),
        })?;
        tracing::debug!(total_frames = ctx.total_frames(), "animation started");
        self.run = Some(Run {
            ctx,
            painter,
            next_frame: 0,
        });
        self.state = EngineState::Running;
        Ok(())
    }

    /// Draw every frame due by `elapsed` and finalize once the run is over.
    ///
    /// Frames already drawn are skipped; any failure aborts the run and returns to idle.
    pub fn tick(&mut self, elapsed: Duration) -> ExportResult<TickOutcome> {
        if self.state != EngineState::Running {
            return Err(ExportError::validation("no animation is running"));
        }
        match self.advance(elapsed) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::warn!(error = %e, "animation failed, aborting");
                self.cancel();
                Err(e)
            }
        }
    }

    fn advance(&mut self, elapsed: Duration) -> ExportResult<TickOutcome> {
        let target = self.fps.frames_at_nanos(elapsed.as_nanos());
        let run = self
            .run
            .as_mut()
            .ok_or_else(|| ExportError::validation("no animation is running"))?;
        let total = run.ctx.total_frames();

        while run.next_frame < total && run.next_frame <= target {
            let idx = run.next_frame;
            let ops = compose_frame(&run.ctx, idx);
            let frame = run.painter.paint(&ops)?;
            self.encoder.push_frame(FrameIndex(idx), &frame)?;
            run.next_frame += 1;
        }

        if target < total {
            return Ok(TickOutcome::Pending {
                drawn: run.next_frame,
                total,
            });
        }

        self.state = EngineState::Finalizing;
        let stream = self.encoder.finish()?;
        self.run = None;
        self.state = EngineState::Idle;
        tracing::info!(frames = stream.frames, bytes = stream.bytes.len(), "animation finished");
        Ok(TickOutcome::Finished(stream))
    }

    /// Drive a started run to completion with `clock`.
    pub fn run_to_end(&mut self, clock: &mut dyn FrameClock) -> ExportResult<EncodedStream> {
        loop {
            if let TickOutcome::Finished(stream) = self.tick(clock.elapsed())? {
                return Ok(stream);
            }
            if let Some(due) = self.next_frame_due() {
                clock.wait_until(due);
            }
        }
    }

    /// Drop the run and discard partial output. No-op when idle.
    pub fn cancel(&mut self) {
        if self.state == EngineState::Idle && self.run.is_none() {
            return;
        }
        self.encoder.abort();
        if let Some(run) = self.run.take() {
            tracing::info!(drawn = run.next_frame, "animation cancelled");
        }
        self.state = EngineState::Idle;
    }

    /// Render one frame of `request` without touching the encoder or any run in flight.
    pub fn render_still(&self, request: &AnimationRequest, frame: u64) -> ExportResult<FrameRGBA> {
        let ctx = self.plan(request)?;
        let mut painter = FramePainter::new(&ctx, self.fonts.clone())?;
        let frame = frame.min(ctx.total_frames().saturating_sub(1));
        painter.paint(&compose_frame(&ctx, frame))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/engine.rs"]
mod tests;
