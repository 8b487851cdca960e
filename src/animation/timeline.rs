use crate::foundation::core::Fps;
use crate::foundation::error::{ExportError, ExportResult};

// Stage positions are in thousandths of the run so frame math stays exact.

/// Share of the run spent on the title entrance.
pub const TITLE_PERMILLE: u64 = 150;
/// Where the first stat item starts.
pub const STATS_START_PERMILLE: u64 = 150;
/// Preferred spacing between stat item starts.
pub const STATS_STEP_PERMILLE: u64 = 100;
/// Where the finale starts.
pub const FINALE_PERMILLE: u64 = 750;
/// Stat reveal length at 60 fps.
pub const STAT_WINDOW_FRAMES_60: u64 = 40;
/// Finale reveal length at 60 fps.
pub const FINALE_WINDOW_FRAMES_60: u64 = 60;

/// A stage: first frame and length in frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Stage {
    /// First frame of the stage.
    pub start: u64,
    /// Reveal length in frames (>= 1).
    pub len: u64,
}

impl Stage {
    /// Linear progress in `[0, 1]`, or `None` before the stage starts.
    pub fn progress(&self, frame: u64) -> Option<f64> {
        if frame < self.start {
            return None;
        }
        Some(((frame - self.start) as f64 / self.len as f64).min(1.0))
    }

    /// Last frame of the reveal.
    pub fn end(&self) -> u64 {
        self.start + self.len - 1
    }
}

/// Staged reveal plan for one animated run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Timeline {
    /// Frames in the run.
    pub total_frames: u64,
    /// Title entrance.
    pub title: Stage,
    /// One stage per stat item, in reveal order.
    pub stats: Vec<Stage>,
    /// Closing number.
    pub finale: Stage,
}

fn scaled_window(frames_60: u64, fps: Fps) -> u64 {
    ((frames_60 as f64) * fps.as_f64() / 60.0).round().max(1.0) as u64
}

impl Timeline {
    /// Plan a run of `duration_secs` at `fps` revealing `stat_count` items.
    ///
    /// Stat starts are spaced by [`STATS_STEP_PERMILLE`], compressed when needed so the last one
    /// still starts before the finale.
    pub fn new(duration_secs: u32, fps: Fps, stat_count: usize) -> ExportResult<Self> {
        let total_frames = fps.secs_to_frames_floor(f64::from(duration_secs));
        if total_frames < 2 {
            return Err(ExportError::validation(format!(
                "animation needs at least 2 frames, got {total_frames}"
            )));
        }
        let at = |permille: u64| total_frames * permille / 1000;
        let clamp_len = |start: u64, len: u64| len.min(total_frames - start).max(1);

        let title = Stage {
            start: 0,
            len: (total_frames * TITLE_PERMILLE).div_ceil(1000).clamp(1, total_frames),
        };

        let finale_start = (total_frames * FINALE_PERMILLE)
            .div_ceil(1000)
            .min(total_frames - 1);
        let finale = Stage {
            start: finale_start,
            len: clamp_len(finale_start, scaled_window(FINALE_WINDOW_FRAMES_60, fps)),
        };

        let step = match stat_count as u64 {
            0 => 0,
            n => STATS_STEP_PERMILLE.min((FINALE_PERMILLE - STATS_START_PERMILLE) / n),
        };
        let stat_len = scaled_window(STAT_WINDOW_FRAMES_60, fps);
        let stats = (0..stat_count as u64)
            .map(|i| {
                let start = at(STATS_START_PERMILLE + step * i).min(finale_start);
                Stage {
                    start,
                    len: clamp_len(start, stat_len),
                }
            })
            .collect();

        Ok(Self {
            total_frames,
            title,
            stats,
            finale,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
