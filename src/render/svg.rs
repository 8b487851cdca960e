use std::fmt::Write as _;

use base64::Engine as _;

use crate::assets::fonts::FontBook;
use crate::assets::store::AssetStore;
use crate::foundation::core::Rect;
use crate::foundation::error::{ExportError, ExportResult};
use crate::scene::model::{
    Background, ClipShape, Fill, FontFamily, SceneDescription, SceneNode, Stroke, TextAlign,
    TextNode,
};

/// Knobs for SVG serialization.
#[derive(Clone, Debug)]
pub struct SvgOptions {
    /// CSS stacks for sans, serif and mono text.
    pub font_stacks: [String; 3],
    /// Upward shift applied to every text baseline.
    pub text_lift_px: f64,
}

impl SvgOptions {
    /// Stacks from `fonts`, no lift.
    pub fn from_fonts(fonts: &FontBook) -> Self {
        Self {
            font_stacks: [
                fonts.css_stack(FontFamily::Sans),
                fonts.css_stack(FontFamily::Serif),
                fonts.css_stack(FontFamily::Mono),
            ],
            text_lift_px: 0.0,
        }
    }

    /// Same options with a text lift.
    pub fn with_text_lift(mut self, px: f64) -> Self {
        self.text_lift_px = px;
        self
    }

    fn stack(&self, family: FontFamily) -> &str {
        match family {
            FontFamily::Sans => &self.font_stacks[0],
            FontFamily::Serif => &self.font_stacks[1],
            FontFamily::Mono => &self.font_stacks[2],
        }
    }
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self::from_fonts(&FontBook::empty())
    }
}

fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn fill_attrs(attr: &str, fill: Option<Fill>) -> String {
    match fill {
        Some(f) if f.alpha >= 1.0 => format!(r#" {attr}="{}""#, f.color.hex()),
        Some(f) => format!(
            r#" {attr}="{}" {attr}-opacity="{}""#,
            f.color.hex(),
            num(f64::from(f.alpha))
        ),
        None => format!(r#" {attr}="none""#),
    }
}

fn stroke_attrs(stroke: Option<Stroke>) -> String {
    match stroke {
        Some(s) => format!(
            r#"{} stroke-width="{}""#,
            fill_attrs("stroke", Some(s.fill)),
            num(s.width)
        ),
        None => String::new(),
    }
}

fn clip_element(id: &str, rect: Rect, clip: ClipShape) -> String {
    let shape = match clip {
        ClipShape::Circle => format!(
            r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}"/>"#,
            num(rect.center().x),
            num(rect.center().y),
            num(rect.width() / 2.0),
            num(rect.height() / 2.0)
        ),
        ClipShape::Rounded(r) => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}"/>"#,
            num(rect.x0),
            num(rect.y0),
            num(rect.width()),
            num(rect.height()),
            num(r)
        ),
    };
    format!(r#"<clipPath id="{id}">{shape}</clipPath>"#)
}

fn text_element(out: &mut String, t: &TextNode, opts: &SvgOptions) {
    let anchor = match t.align {
        TextAlign::Start => "start",
        TextAlign::Center => "middle",
        TextAlign::End => "end",
    };
    let spacing = if t.letter_spacing != 0.0 {
        format!(r#" letter-spacing="{}""#, num(t.letter_spacing))
    } else {
        String::new()
    };
    for (i, line) in t.lines.iter().enumerate() {
        let _ = write!(
            out,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" text-anchor="{anchor}"{spacing}{}>{}</text>"#,
            num(t.x),
            num(t.baseline(i) - opts.text_lift_px),
            escape_xml(opts.stack(t.family)),
            num(t.size),
            t.weight,
            fill_attrs("fill", Some(t.fill)),
            escape_xml(line)
        );
    }
}

/// Serialize a scene to a standalone SVG document.
///
/// Images are embedded as PNG data URIs, so every referenced image must be in `assets`.
pub fn scene_to_svg(
    scene: &SceneDescription,
    assets: &AssetStore,
    opts: &SvgOptions,
) -> ExportResult<String> {
    let w = scene.canvas.width;
    let h = scene.canvas.height;
    let mut defs = String::new();
    let mut body = String::new();

    match scene.background {
        Background::Solid(c) => {
            let _ = write!(body, r#"<rect width="{w}" height="{h}" fill="{}"/>"#, c.hex());
        }
        Background::Diagonal { from, to } => {
            let _ = write!(
                defs,
                r#"<linearGradient id="bg" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient>"#,
                from.hex(),
                to.hex()
            );
            let _ = write!(body, r#"<rect width="{w}" height="{h}" fill="url(#bg)"/>"#);
        }
    }

    for (i, node) in scene.nodes.iter().enumerate() {
        match node {
            SceneNode::Rect {
                rect,
                radius,
                fill,
                stroke,
            } => {
                let _ = write!(
                    body,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}"{}{}/>"#,
                    num(rect.x0),
                    num(rect.y0),
                    num(rect.width()),
                    num(rect.height()),
                    num(*radius),
                    fill_attrs("fill", *fill),
                    stroke_attrs(*stroke)
                );
            }
            SceneNode::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                let _ = write!(
                    body,
                    r#"<circle cx="{}" cy="{}" r="{}"{}{}/>"#,
                    num(center.x),
                    num(center.y),
                    num(*radius),
                    fill_attrs("fill", *fill),
                    stroke_attrs(*stroke)
                );
            }
            SceneNode::Text(t) => text_element(&mut body, t, opts),
            SceneNode::Image {
                rect,
                source,
                clip,
                opacity,
            } => {
                let png = assets.png(*source).ok_or_else(|| {
                    ExportError::capture(format!("{source:?} image was not prepared"))
                })?;
                let id = format!("clip{i}");
                defs.push_str(&clip_element(&id, *rect, *clip));
                let _ = write!(
                    body,
                    r#"<image clip-path="url(#{id})" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid slice" opacity="{}" href="data:image/png;base64,{}"/>"#,
                    num(rect.x0),
                    num(rect.y0),
                    num(rect.width()),
                    num(rect.height()),
                    num(f64::from(*opacity)),
                    base64::engine::general_purpose::STANDARD.encode(png)
                );
            }
            SceneNode::Placeholder {
                rect,
                clip,
                fill,
                label,
                label_fill,
            } => {
                let id = format!("clip{i}");
                defs.push_str(&clip_element(&id, *rect, *clip));
                let _ = write!(
                    body,
                    r#"<rect clip-path="url(#{id})" x="{}" y="{}" width="{}" height="{}"{}/>"#,
                    num(rect.x0),
                    num(rect.y0),
                    num(rect.width()),
                    num(rect.height()),
                    fill_attrs("fill", Some(*fill))
                );
                if !label.is_empty() {
                    text_element(&mut body, &placeholder_label(*rect, label, *label_fill), opts);
                }
            }
        }
    }

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    if !defs.is_empty() {
        let _ = write!(out, "<defs>{defs}</defs>");
    }
    out.push_str(&body);
    out.push_str("</svg>");
    Ok(out)
}

/// Centered initials inside a placeholder.
pub(crate) fn placeholder_label(rect: Rect, label: &str, fill: Fill) -> TextNode {
    let size = rect.width().min(rect.height()) * 0.36;
    TextNode {
        lines: vec![label.to_string()],
        x: rect.center().x,
        y: rect.center().y + size * 0.35,
        size,
        line_height: size * 1.2,
        weight: 700,
        family: FontFamily::Sans,
        letter_spacing: 0.0,
        align: TextAlign::Center,
        fill,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
