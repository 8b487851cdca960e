use crate::foundation::core::{Canvas, Point, Rect};
use crate::theme::tokens::Rgb;

/// A color with straight alpha.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Fill {
    /// Color.
    pub color: Rgb,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
}

impl Fill {
    /// Fully opaque fill.
    pub fn solid(color: Rgb) -> Self {
        Self { color, alpha: 1.0 }
    }

    /// Fill with opacity.
    pub fn with_alpha(color: Rgb, alpha: f32) -> Self {
        Self {
            color,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Straight RGBA8.
    pub fn rgba8(self) -> [u8; 4] {
        self.color
            .rgba8((self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

/// Outline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stroke {
    /// Stroke paint.
    pub fill: Fill,
    /// Width in canvas pixels.
    pub width: f64,
}

/// Canvas background.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// Flat color.
    Solid(Rgb),
    /// Two-stop gradient from the top-left corner to the bottom-right corner.
    Diagonal {
        /// First stop.
        from: Rgb,
        /// Last stop.
        to: Rgb,
    },
}

impl Background {
    /// Color used where a single color is needed (alpha flattening, PDF pre-blending).
    pub fn dominant(self) -> Rgb {
        match self {
            Background::Solid(c) => c,
            Background::Diagonal { from, to } => from.mix(to, 0.5),
        }
    }
}

/// Horizontal anchor for text lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// `x` is the left edge.
    Start,
    /// `x` is the center.
    Center,
    /// `x` is the right edge.
    End,
}

/// Generic font family class, resolved by each backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Sans-serif UI face.
    Sans,
    /// Serif face.
    Serif,
    /// Monospace face.
    Mono,
}

/// Image sources a scene may reference; bytes come from the profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRef {
    /// Profile avatar.
    Avatar,
    /// Profile cover photo.
    Cover,
}

/// Clip shape for images and placeholders.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipShape {
    /// Rectangle with corner radius.
    Rounded(f64),
    /// Ellipse inscribed in the rect.
    Circle,
}

/// Multi-line text run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextNode {
    /// Lines, already wrapped and truncated.
    pub lines: Vec<String>,
    /// Anchor x (meaning depends on `align`).
    pub x: f64,
    /// Baseline of the first line.
    pub y: f64,
    /// Font size in canvas pixels.
    pub size: f64,
    /// Distance between baselines.
    pub line_height: f64,
    /// CSS-like weight (100..=900).
    pub weight: u16,
    /// Family class.
    pub family: FontFamily,
    /// Extra tracking in canvas pixels.
    pub letter_spacing: f64,
    /// Horizontal anchor.
    pub align: TextAlign,
    /// Paint.
    pub fill: Fill,
}

impl TextNode {
    /// Baseline of line `i`.
    pub fn baseline(&self, i: usize) -> f64 {
        self.y + self.line_height * i as f64
    }
}

/// One draw instruction, in canvas coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "node")]
pub enum SceneNode {
    /// Rounded rectangle.
    Rect {
        /// Bounds.
        rect: Rect,
        /// Corner radius.
        radius: f64,
        /// Interior paint.
        fill: Option<Fill>,
        /// Outline.
        stroke: Option<Stroke>,
    },
    /// Circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
        /// Interior paint.
        fill: Option<Fill>,
        /// Outline.
        stroke: Option<Stroke>,
    },
    /// Text.
    Text(TextNode),
    /// Raster image scaled to cover `rect`.
    Image {
        /// Bounds.
        rect: Rect,
        /// Source.
        source: ImageRef,
        /// Clip.
        clip: ClipShape,
        /// Opacity.
        opacity: f32,
    },
    /// Stand-in for a missing image: tinted shape with an optional label.
    Placeholder {
        /// Bounds.
        rect: Rect,
        /// Shape.
        clip: ClipShape,
        /// Tint.
        fill: Fill,
        /// Short label (initials), centered.
        label: String,
        /// Label paint.
        label_fill: Fill,
    },
}

impl SceneNode {
    /// Shift the node vertically.
    pub fn offset_y(&mut self, dy: f64) {
        match self {
            SceneNode::Rect { rect, .. }
            | SceneNode::Image { rect, .. }
            | SceneNode::Placeholder { rect, .. } => {
                *rect = Rect::new(rect.x0, rect.y0 + dy, rect.x1, rect.y1 + dy);
            }
            SceneNode::Circle { center, .. } => center.y += dy,
            SceneNode::Text(t) => t.y += dy,
        }
    }

    /// Whether this node draws glyphs.
    pub fn is_text(&self) -> bool {
        matches!(self, SceneNode::Text(_) | SceneNode::Placeholder { .. })
    }
}

/// Fully resolved, renderer-agnostic instructions for one artifact.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneDescription {
    /// Logical canvas.
    pub canvas: Canvas,
    /// Background paint.
    pub background: Background,
    /// Nodes in paint order.
    pub nodes: Vec<SceneNode>,
}

impl SceneDescription {
    /// Images this scene references, deduplicated and sorted.
    pub fn image_refs(&self) -> Vec<ImageRef> {
        let mut out: Vec<ImageRef> = self
            .nodes
            .iter()
            .filter_map(|n| match n {
                SceneNode::Image { source, .. } => Some(*source),
                _ => None,
            })
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// All text lines in paint order.
    pub fn text_lines(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .flat_map(|n| match n {
                SceneNode::Text(t) => t.lines.iter().map(String::as_str).collect::<Vec<_>>(),
                SceneNode::Placeholder { label, .. } if !label.is_empty() => vec![label.as_str()],
                _ => Vec::new(),
            })
            .collect()
    }
}
