//! Procedural video backdrops.
//!
//! Each style splits into a static layer, rasterized once per run, and a moving overlay that is
//! a pure function of the frame number and the seeded particle field.

use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::math::{Rng64, lerp};
use crate::model::config::VideoStyle;
use crate::scene::model::Fill;
use crate::theme::tokens::Rgb;

/// Particles seeded per run.
pub const PARTICLE_COUNT: usize = 70;

const GOLD: Rgb = Rgb::new(212, 175, 55);
const NEON_PINK: Rgb = Rgb::new(236, 72, 153);
const GRID_SIZE: f64 = 100.0;
const GRID_LINE: f64 = 2.0;
const DRIFT_PER_FRAME: f64 = 0.5;
const SUN_RADIUS: f64 = 400.0;
const SCANLINE_PITCH: u32 = 6;
const SCANLINE_HEIGHT: u32 = 3;

/// One seeded particle. Positions are in canvas pixels at frame zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Horizontal speed in `[-1, 1)`.
    pub speed_x: f64,
    /// Vertical speed in `[-1, 1)`.
    pub speed_y: f64,
    /// Radius in `[0, 4)`.
    pub size: f64,
    /// Opacity in `[0, 0.5)`.
    pub alpha: f64,
    /// Phase offset in `[0, 100)` frames.
    pub offset: f64,
}

/// Seed the particle field for one run.
pub fn seed_particles(seed: u64, canvas: Canvas) -> Vec<Particle> {
    let mut rng = Rng64::new(seed);
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    (0..PARTICLE_COUNT)
        .map(|_| Particle {
            x: rng.next_f64_01() * w,
            y: rng.next_f64_01() * h,
            speed_y: rng.next_f64_01() * 2.0 - 1.0,
            speed_x: rng.next_f64_01() * 2.0 - 1.0,
            size: rng.next_f64_01() * 4.0,
            alpha: rng.next_f64_01() * 0.5,
            offset: rng.next_f64_01() * 100.0,
        })
        .collect()
}

/// A moving element drawn over the static layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mark {
    /// Filled circle.
    Dot {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
        /// Paint.
        fill: Fill,
    },
    /// Filled axis-aligned rectangle.
    Bar {
        /// Bounds.
        rect: Rect,
        /// Paint.
        fill: Fill,
    },
}

/// Moving marks for `frame`.
pub fn overlay(style: VideoStyle, frame: u64, particles: &[Particle], canvas: Canvas) -> Vec<Mark> {
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let f = frame as f64;
    match style {
        VideoStyle::Cinematic => particles
            .iter()
            .map(|p| Mark::Dot {
                center: Point::new(p.x, (p.y - DRIFT_PER_FRAME * (f + 1.0)).rem_euclid(h)),
                radius: p.size,
                fill: Fill::with_alpha(GOLD, (p.alpha * 0.6) as f32),
            })
            .collect(),
        VideoStyle::Neon => {
            let line = Fill::with_alpha(NEON_PINK, 0.15);
            let half = GRID_LINE / 2.0;
            let mut marks = Vec::new();
            let mut x = 0.0;
            while x <= w {
                marks.push(Mark::Bar {
                    rect: Rect::new(x - half, 0.0, x + half, h),
                    fill: line,
                });
                x += GRID_SIZE;
            }
            let mut y = ((frame * 2) % GRID_SIZE as u64) as f64;
            while y <= h {
                marks.push(Mark::Bar {
                    rect: Rect::new(0.0, y - half, w, y + half),
                    fill: line,
                });
                y += GRID_SIZE;
            }
            marks
        }
        VideoStyle::Cosmic => particles
            .iter()
            .map(|p| Mark::Dot {
                center: Point::new(p.x, p.y),
                radius: p.size * (((f + p.offset) * 0.05).sin() + 1.5),
                fill: Fill::with_alpha(Rgb::new(255, 255, 255), p.alpha as f32),
            })
            .collect(),
        VideoStyle::Minimal | VideoStyle::Retro => Vec::new(),
    }
}

/// Color under text on a style, used to flatten video frames.
pub fn base_color(style: VideoStyle) -> Rgb {
    match style {
        VideoStyle::Cinematic => Rgb::new(0x0f, 0x17, 0x2a),
        VideoStyle::Neon => Rgb::new(0x05, 0x05, 0x05),
        VideoStyle::Minimal => Rgb::new(255, 255, 255),
        VideoStyle::Cosmic => Rgb::new(0, 0, 0),
        VideoStyle::Retro => Rgb::new(0x0f, 0x04, 0x1a),
    }
}

/// Static layer of a style as opaque RGBA8, row-major.
pub fn static_layer(style: VideoStyle, canvas: Canvas) -> Vec<u8> {
    let (w, h) = (canvas.width, canvas.height);
    let (wf, hf) = (f64::from(w), f64::from(h));
    let (cx, cy) = (wf / 2.0, hf / 2.0);
    let mut out = Vec::with_capacity(w as usize * h as usize * 4);

    for y in 0..h {
        for x in 0..w {
            let (px, py) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
            let color = match style {
                VideoStyle::Cinematic => {
                    let t = (px * wf + py * hf) / (wf * wf + hf * hf);
                    gradient(Rgb::new(0x0f, 0x17, 0x2a), Rgb::new(0x02, 0x06, 0x17), t)
                }
                VideoStyle::Neon => unit(base_color(style)),
                VideoStyle::Minimal => {
                    let d = (px - cx).hypot(py - cy) / wf;
                    let glow = 0.05 * (1.0 - d).clamp(0.0, 1.0);
                    over([1.0; 3], Rgb::new(79, 70, 229), glow)
                }
                VideoStyle::Cosmic => {
                    let d = (px - cx).hypot(py - cy);
                    let t = (d - 100.0) / (hf - 100.0);
                    gradient(Rgb::new(0x1e, 0x1b, 0x4b), Rgb::new(0, 0, 0), t)
                }
                VideoStyle::Retro => retro_pixel(px, py, wf, hf, y),
            };
            out.extend_from_slice(&to_rgba8(color));
        }
    }
    out
}

fn retro_pixel(px: f64, py: f64, w: f64, h: f64, row: u32) -> [f64; 3] {
    let mut c = gradient(Rgb::new(0x2a, 0x0a, 0x2e), Rgb::new(0x0f, 0x04, 0x1a), py / h);

    let sun_y = h * 0.7;
    if py <= sun_y && (px - w / 2.0).hypot(py - sun_y) <= SUN_RADIUS {
        let t = (py - (sun_y - 200.0)) / 400.0;
        c = gradient(Rgb::new(0xfb, 0xbf, 0x24), Rgb::new(0xdb, 0x27, 0x77), t);
    }

    if row % SCANLINE_PITCH < SCANLINE_HEIGHT {
        c = over(c, Rgb::new(0, 0, 0), 0.2);
    }
    c
}

fn unit(c: Rgb) -> [f64; 3] {
    [
        f64::from(c.r) / 255.0,
        f64::from(c.g) / 255.0,
        f64::from(c.b) / 255.0,
    ]
}

fn gradient(from: Rgb, to: Rgb, t: f64) -> [f64; 3] {
    let t = t.clamp(0.0, 1.0);
    let (a, b) = (unit(from), unit(to));
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}

fn over(dst: [f64; 3], src: Rgb, alpha: f64) -> [f64; 3] {
    let s = unit(src);
    [
        lerp(dst[0], s[0], alpha),
        lerp(dst[1], s[1], alpha),
        lerp(dst[2], s[2], alpha),
    ]
}

fn to_rgba8(c: [f64; 3]) -> [u8; 4] {
    let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [q(c[0]), q(c[1]), q(c[2]), 255]
}

#[cfg(test)]
#[path = "../../tests/unit/animation/background.rs"]
mod tests;
