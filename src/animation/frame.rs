//! Per-run animation context and the draw list for one frame.

use crate::animation::background::{Mark, Particle, overlay, seed_particles};
use crate::animation::ease::{ease_out_back, ease_out_expo};
use crate::animation::timeline::Timeline;
use crate::foundation::core::{Affine, Canvas, Fps, Point, Rect, Vec2};
use crate::foundation::error::ExportResult;
use crate::model::config::VideoStyle;
use crate::model::payload::{Payload, StatPayload, StatUnit};
use crate::scene::build::Subject;
use crate::scene::model::{Fill, Stroke};
use crate::scene::text::{long_date, thousands};
use crate::theme::tokens::Rgb;

const GRID_START_Y: f64 = 350.0;
const GRID_GAP_Y: f64 = 60.0;
const CARD_HEIGHT: f64 = 120.0;
const CARD_RADIUS: f64 = 20.0;
const TITLE_Y: f64 = 150.0;
const TITLE_DROP: f64 = 100.0;
const ENTRY_DROP: f64 = 50.0;
const FINALE_FROM_BOTTOM: f64 = 350.0;
const BEAT_FRAMES_60: f64 = 50.0;

/// One revealed figure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatItem {
    /// Caption, drawn uppercase.
    pub label: String,
    /// Final value; the reveal rolls up to it.
    pub value: u64,
}

/// Copy shown in an animated export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoContent {
    /// Headline.
    pub title: String,
    /// Line under the headline.
    pub subtitle: String,
    /// Grid items in reveal order.
    pub items: Vec<StatItem>,
    /// Closing figure.
    pub finale: StatItem,
}

impl VideoContent {
    /// Copy for a payload. Milestones count from birth to the milestone date.
    pub fn for_payload(payload: &Payload, subject: &Subject) -> Self {
        match payload {
            Payload::Stats(stats) => Self::from_stats(
                "TOTAL EXISTENCE".to_string(),
                subject.name.to_uppercase(),
                stats,
                "SECONDS ALIVE",
            ),
            Payload::Milestone(m) => Self::from_stats(
                m.title.to_uppercase(),
                long_date(m.date.date()).to_uppercase(),
                &StatPayload::between(subject.birth, m.date),
                "SECONDS FROM BIRTH",
            ),
        }
    }

    fn from_stats(title: String, subtitle: String, stats: &StatPayload, closing: &str) -> Self {
        let items = StatUnit::ALL
            .iter()
            .filter(|u| **u != StatUnit::Seconds)
            .map(|u| StatItem {
                label: u.label().to_uppercase(),
                value: stats.get(*u),
            })
            .collect();
        Self {
            title,
            subtitle,
            items,
            finale: StatItem {
                label: closing.to_string(),
                value: stats.get(StatUnit::Seconds),
            },
        }
    }
}

/// Everything one animated run needs, fixed at start.
#[derive(Clone, Debug)]
pub struct AnimationContext {
    /// Visual style.
    pub style: VideoStyle,
    /// Surface size.
    pub canvas: Canvas,
    /// Frame rate.
    pub fps: Fps,
    /// Stage plan.
    pub timeline: Timeline,
    /// Copy.
    pub content: VideoContent,
    /// Seed the particles came from.
    pub seed: u64,
    /// Seeded particle field.
    pub particles: Vec<Particle>,
}

impl AnimationContext {
    /// Plan a run.
    pub fn new(
        style: VideoStyle,
        canvas: Canvas,
        fps: Fps,
        duration_secs: u32,
        content: VideoContent,
        seed: u64,
    ) -> ExportResult<Self> {
        let timeline = Timeline::new(duration_secs, fps, content.items.len())?;
        Ok(Self {
            style,
            canvas,
            fps,
            timeline,
            content,
            seed,
            particles: seed_particles(seed, canvas),
        })
    }

    /// Frames in the run.
    pub fn total_frames(&self) -> u64 {
        self.timeline.total_frames
    }
}

/// One draw instruction in a video frame. Local geometry is mapped by `transform`.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Background particle or grid line, canvas coordinates.
    Mark(Mark),
    /// Rounded glass card.
    Card {
        /// Local bounds.
        rect: Rect,
        /// Corner radius.
        radius: f64,
        /// Interior.
        fill: Fill,
        /// Outline.
        stroke: Stroke,
        /// Local to canvas.
        transform: Affine,
        /// Group opacity.
        opacity: f32,
    },
    /// One line of text centered on `anchor.x` with its baseline at `anchor.y`.
    Text {
        /// Content.
        text: String,
        /// Local baseline anchor.
        anchor: Point,
        /// Size in px.
        size: f64,
        /// Weight.
        weight: u16,
        /// Paint.
        fill: Fill,
        /// Local to canvas.
        transform: Affine,
        /// Group opacity.
        opacity: f32,
    },
    /// Heart glyph in its 24x24 icon box.
    Heart {
        /// Icon box to canvas.
        transform: Affine,
        /// Paint.
        fill: Fill,
        /// Group opacity.
        opacity: f32,
    },
}

struct StylePaint {
    title: Fill,
    label: Fill,
    value: Fill,
    card: Option<(Fill, Stroke)>,
    heart: Fill,
    finale: Fill,
    caption: Fill,
}

fn style_paint(style: VideoStyle) -> StylePaint {
    let white = Fill::solid(Rgb::new(255, 255, 255));
    let ink = Fill::solid(Rgb::new(0x0f, 0x17, 0x2a));
    let slate = Fill::solid(Rgb::new(0x64, 0x74, 0x8b));
    let glass = Fill::with_alpha(Rgb::new(255, 255, 255), 0.05);
    let edge = match style {
        VideoStyle::Neon => Fill::solid(Rgb::new(0xd9, 0x46, 0xef)),
        _ => Fill::with_alpha(Rgb::new(255, 255, 255), 0.1),
    };
    let minimal = style == VideoStyle::Minimal;
    StylePaint {
        title: match style {
            VideoStyle::Minimal => ink,
            VideoStyle::Retro => Fill::solid(Rgb::new(0xfc, 0xd3, 0x4d)),
            _ => white,
        },
        label: if minimal {
            slate
        } else {
            Fill::with_alpha(Rgb::new(255, 255, 255), 0.6)
        },
        value: match style {
            VideoStyle::Minimal => ink,
            VideoStyle::Retro => Fill::solid(Rgb::new(0x00, 0xf3, 0xff)),
            _ => white,
        },
        card: (!minimal).then_some((glass, Stroke { fill: edge, width: 1.0 })),
        heart: match style {
            VideoStyle::Neon => Fill::solid(Rgb::new(0xec, 0x48, 0x99)),
            _ => Fill::solid(Rgb::new(0xf4, 0x3f, 0x5e)),
        },
        finale: if minimal { ink } else { white },
        caption: if minimal {
            slate
        } else {
            Fill::with_alpha(Rgb::new(255, 255, 255), 0.7)
        },
    }
}

/// Scale of the heartbeat at `frame`: a short bump every beat, 72 beats per minute.
pub fn heartbeat_pulse(frame: u64, fps: Fps) -> f64 {
    let beat = (BEAT_FRAMES_60 * fps.as_f64() / 60.0).round().max(1.0) as u64;
    let phase = (frame % beat) as f64 / beat as f64;
    if phase < 0.2 {
        1.0 + (phase * std::f64::consts::PI * 5.0).sin() * 0.1
    } else {
        1.0
    }
}

/// `floor(value * ease_out_expo(p))`.
pub fn rolled_value(value: u64, p: f64) -> u64 {
    (value as f64 * ease_out_expo(p)).floor().max(0.0) as u64
}

fn text(
    s: impl Into<String>,
    y: f64,
    size: f64,
    weight: u16,
    fill: Fill,
    transform: Affine,
    opacity: f64,
) -> DrawOp {
    DrawOp::Text {
        text: s.into(),
        anchor: Point::new(0.0, y),
        size,
        weight,
        fill,
        transform,
        opacity: opacity.clamp(0.0, 1.0) as f32,
    }
}

/// Draw list for `frame`, background marks first.
pub fn compose_frame(ctx: &AnimationContext, frame: u64) -> Vec<DrawOp> {
    let paint = style_paint(ctx.style);
    let (w, h) = (f64::from(ctx.canvas.width), f64::from(ctx.canvas.height));
    let tl = &ctx.timeline;

    let mut ops: Vec<DrawOp> = overlay(ctx.style, frame, &ctx.particles, ctx.canvas)
        .into_iter()
        .map(DrawOp::Mark)
        .collect();

    let alpha = if frame < tl.title.len {
        ease_out_back(frame as f64 / tl.title.len as f64)
    } else {
        1.0
    };
    let head = Affine::translate(Vec2::new(w / 2.0, TITLE_Y + TITLE_DROP - TITLE_DROP * alpha));
    ops.push(text(&ctx.content.title, 0.0, 50.0, 800, paint.title, head, alpha));
    ops.push(text(&ctx.content.subtitle, 40.0, 24.0, 600, paint.title, head, alpha * 0.7));

    let start_x = w * 0.15;
    let gap_x = w * 0.1;
    let col_w = (w - start_x * 2.0 - gap_x) / 2.0;
    for (idx, (item, stage)) in ctx.content.items.iter().zip(&tl.stats).enumerate() {
        let Some(p) = stage.progress(frame).filter(|p| *p > 0.0) else {
            continue;
        };
        let ease = ease_out_back(p);
        let (col, row) = ((idx % 2) as f64, (idx / 2) as f64);
        let x = start_x + col * (col_w + gap_x) + col_w / 2.0;
        let y = GRID_START_Y + row * (CARD_HEIGHT + GRID_GAP_Y);
        let t = Affine::translate(Vec2::new(x, y + ENTRY_DROP * (1.0 - ease))) * Affine::scale(ease);

        if let Some((fill, stroke)) = paint.card {
            ops.push(DrawOp::Card {
                rect: Rect::new(-col_w / 2.0, -CARD_HEIGHT / 2.0, col_w / 2.0, CARD_HEIGHT / 2.0),
                radius: CARD_RADIUS,
                fill,
                stroke,
                transform: t,
                opacity: p as f32,
            });
        }
        ops.push(text(&item.label, -15.0, 16.0, 700, paint.label, t, p));
        ops.push(text(
            thousands(rolled_value(item.value, p)),
            35.0,
            40.0,
            900,
            paint.value,
            t,
            p,
        ));
    }

    if let Some(p) = tl.finale.progress(frame).filter(|p| *p > 0.0) {
        let ease = ease_out_back(p);
        let group = Affine::translate(Vec2::new(w / 2.0, h - FINALE_FROM_BOTTOM)) * Affine::scale(ease);
        let pulse = heartbeat_pulse(frame, ctx.fps);
        ops.push(DrawOp::Heart {
            transform: group
                * Affine::translate(Vec2::new(0.0, -120.0))
                * Affine::scale(2.0 * pulse)
                * Affine::translate(Vec2::new(-12.0, -12.0)),
            fill: paint.heart,
            opacity: p as f32,
        });
        let finale = &ctx.content.finale;
        ops.push(text(
            thousands(rolled_value(finale.value, p)),
            50.0,
            100.0,
            900,
            paint.finale,
            group,
            p,
        ));
        ops.push(text(&finale.label, 100.0, 24.0, 700, paint.caption, group, p));
    }
    ops
}

/// Last frame of the run: every stage fully revealed.
pub fn poster_frame(ctx: &AnimationContext) -> u64 {
    ctx.total_frames().saturating_sub(1)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/frame.rs"]
mod tests;
