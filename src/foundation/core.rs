use crate::foundation::error::{ExportError, ExportResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Zero-based frame number within one animated export.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Rational frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator, always > 0.
    pub den: u32,
}

impl Fps {
    /// Build a validated frame rate.
    pub fn new(num: u32, den: u32) -> ExportResult<Self> {
        if den == 0 {
            return Err(ExportError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ExportError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Number of whole frames covering `secs` seconds.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }

    /// Whole frames elapsed after `nanos` nanoseconds: `floor(nanos * num / (den * 1e9))`.
    pub fn frames_at_nanos(self, nanos: u128) -> u64 {
        let denom = u128::from(self.den) * 1_000_000_000;
        (nanos * u128::from(self.num) / denom) as u64
    }

    /// Smallest elapsed time (in nanoseconds) at which `frame` has started.
    pub fn nanos_for_frame(self, frame: u64) -> u128 {
        (u128::from(frame) * u128::from(self.den) * 1_000_000_000).div_ceil(u128::from(self.num))
    }
}

/// Logical canvas size in CSS-like pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Canvas size multiplied by an integer pixel density.
    pub fn scaled(self, density: u32) -> Self {
        Self {
            width: self.width.saturating_mul(density),
            height: self.height.saturating_mul(density),
        }
    }

    /// Canvas bounds as a rectangle anchored at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 value at pixel `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}
