//! Single-page vector PDF of a scene.
//!
//! PDF text uses the built-in base-14 faces, so glyph metrics come from the same estimates the
//! layout uses. Translucent paints and images are pre-blended over the page background. Images are
//! cropped to cover their node and drawn under a clipping path.

use std::io::BufWriter;

use kurbo::Shape as _;
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef,
    Line, Mm, PdfDocument, PdfLayerReference, Point, Px, Rgb as PdfRgb,
};

use crate::assets::decode::PreparedImage;
use crate::assets::store::AssetStore;
use crate::foundation::core::{BezPath, Rect};
use crate::foundation::error::{ExportError, ExportResult};
use crate::render::svg::placeholder_label;
use crate::scene::model::{Background, ClipShape, Fill, FontFamily, SceneDescription, SceneNode, Stroke, TextAlign, TextNode};
use crate::scene::text::estimate_width;
use crate::theme::tokens::Rgb;

const MM_PER_PX: f64 = 0.264583;
const PT_PER_PX: f64 = 0.75;
const FLATTEN_TOLERANCE: f64 = 0.25;
const CSS_DPI: f64 = 96.0;

struct Fonts {
    sans: IndirectFontRef,
    sans_bold: IndirectFontRef,
    serif: IndirectFontRef,
    serif_bold: IndirectFontRef,
    mono: IndirectFontRef,
    mono_bold: IndirectFontRef,
}

impl Fonts {
    fn pick(&self, family: FontFamily, weight: u16) -> &IndirectFontRef {
        let bold = weight >= 600;
        match (family, bold) {
            (FontFamily::Sans, false) => &self.sans,
            (FontFamily::Sans, true) => &self.sans_bold,
            (FontFamily::Serif, false) => &self.serif,
            (FontFamily::Serif, true) => &self.serif_bold,
            (FontFamily::Mono, false) => &self.mono,
            (FontFamily::Mono, true) => &self.mono_bold,
        }
    }
}

struct Page {
    layer: PdfLayerReference,
    height_px: f64,
    backdrop: Rgb,
}

impl Page {
    fn pt(&self, x: f64, y: f64) -> Point {
        Point::new(Mm(x * MM_PER_PX), Mm((self.height_px - y) * MM_PER_PX))
    }

    fn color(&self, fill: Fill) -> Color {
        let c = self.backdrop.mix(fill.color, f64::from(fill.alpha));
        Color::Rgb(PdfRgb::new(
            f64::from(c.r) / 255.0,
            f64::from(c.g) / 255.0,
            f64::from(c.b) / 255.0,
            None,
        ))
    }

    fn polygons(&self, path: &BezPath) -> Vec<Vec<(Point, bool)>> {
        let mut out: Vec<Vec<(Point, bool)>> = Vec::new();
        let mut current: Vec<(Point, bool)> = Vec::new();
        kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
            kurbo::PathEl::MoveTo(p) => {
                if current.len() > 2 {
                    out.push(std::mem::take(&mut current));
                }
                current.clear();
                current.push((self.pt(p.x, p.y), false));
            }
            kurbo::PathEl::LineTo(p) => current.push((self.pt(p.x, p.y), false)),
            kurbo::PathEl::ClosePath => {
                if current.len() > 2 {
                    out.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        });
        if current.len() > 2 {
            out.push(current);
        }
        out
    }

    fn shape(&self, path: &BezPath, fill: Option<Fill>, stroke: Option<Stroke>) {
        if let Some(f) = fill {
            self.layer.set_fill_color(self.color(f));
        }
        if let Some(s) = stroke {
            self.layer.set_outline_color(self.color(s.fill));
            self.layer.set_outline_thickness(s.width * PT_PER_PX);
        }
        for points in self.polygons(path) {
            self.layer.add_shape(Line {
                points,
                is_closed: true,
                has_fill: fill.is_some(),
                has_stroke: stroke.is_some(),
                is_clipping_path: false,
            });
        }
    }

    fn text(&self, t: &TextNode, fonts: &Fonts) {
        let font = fonts.pick(t.family, t.weight);
        self.layer.set_fill_color(self.color(t.fill));
        self.layer.set_character_spacing(t.letter_spacing * PT_PER_PX);
        for (i, line) in t.lines.iter().enumerate() {
            let w = estimate_width(line, t.size, t.weight, t.letter_spacing);
            let x = match t.align {
                TextAlign::Start => t.x,
                TextAlign::Center => t.x - w / 2.0,
                TextAlign::End => t.x - w,
            };
            let y = self.height_px - t.baseline(i);
            self.layer.use_text(
                line.as_str(),
                t.size * PT_PER_PX,
                Mm(x * MM_PER_PX),
                Mm(y * MM_PER_PX),
                font,
            );
        }
        self.layer.set_character_spacing(0.0);
    }

    fn image(&self, rect: Rect, clip: ClipShape, img: &PreparedImage, opacity: f32) {
        let Some(cover) = cover_rgb(img, rect, self.backdrop, opacity) else {
            return;
        };
        self.layer.save_graphics_state();
        for points in self.polygons(&clip_path(rect, clip)) {
            self.layer.add_shape(Line {
                points,
                is_closed: true,
                has_fill: false,
                has_stroke: false,
                is_clipping_path: true,
            });
        }
        let xobject = ImageXObject {
            width: Px(cover.width as usize),
            height: Px(cover.height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: cover.rgb,
            image_filter: None,
            clipping_bbox: None,
        };
        // At 96 dpi one image pixel is one canvas pixel before scaling.
        Image::from(xobject).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(rect.x0 * MM_PER_PX)),
                translate_y: Some(Mm((self.height_px - rect.y1) * MM_PER_PX)),
                scale_x: Some(rect.width() / f64::from(cover.width)),
                scale_y: Some(rect.height() / f64::from(cover.height)),
                dpi: Some(CSS_DPI),
                ..ImageTransform::default()
            },
        );
        self.layer.restore_graphics_state();
    }
}

/// Opaque RGB8 crop of an image.
struct CoverCrop {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

/// Centered crop of `img` with the aspect ratio of `rect`, flattened over `backdrop`.
///
/// Matches the SVG `xMidYMid slice` placement. `None` for degenerate rects.
fn cover_rgb(img: &PreparedImage, rect: Rect, backdrop: Rgb, opacity: f32) -> Option<CoverCrop> {
    let (rw, rh) = (rect.width(), rect.height());
    if !(rw > 0.0 && rh > 0.0) {
        return None;
    }
    let (iw, ih) = (f64::from(img.width), f64::from(img.height));
    let scale = (rw / iw).max(rh / ih);
    let width = ((rw / scale).round() as u32).clamp(1, img.width);
    let height = ((rh / scale).round() as u32).clamp(1, img.height);
    let x0 = (img.width - width) / 2;
    let y0 = (img.height - height) / 2;

    let o = f64::from(opacity.clamp(0.0, 1.0));
    let bg = [f64::from(backdrop.r), f64::from(backdrop.g), f64::from(backdrop.b)];
    let src = img.rgba8_premul.as_slice();
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for y in y0..y0 + height {
        let row = (y as usize * img.width as usize + x0 as usize) * 4;
        for px in src[row..row + width as usize * 4].chunks_exact(4) {
            let a = f64::from(px[3]) / 255.0 * o;
            for (c, b) in px[..3].iter().zip(bg) {
                let v = b * (1.0 - a) + f64::from(*c) * o;
                rgb.push(v.round().clamp(0.0, 255.0) as u8);
            }
        }
    }
    Some(CoverCrop { width, height, rgb })
}

fn clip_path(rect: Rect, clip: ClipShape) -> BezPath {
    match clip {
        ClipShape::Circle => kurbo::Ellipse::from_rect(rect).to_path(FLATTEN_TOLERANCE),
        ClipShape::Rounded(r) => rect.to_rounded_rect(r).to_path(FLATTEN_TOLERANCE),
    }
}

fn builtin(doc: &printpdf::PdfDocumentReference, font: BuiltinFont) -> ExportResult<IndirectFontRef> {
    doc.add_builtin_font(font)
        .map_err(|e| ExportError::capture(format!("pdf font: {e}")))
}

/// Render `scene` to a one-page PDF sized to the logical canvas.
///
/// Every image node must have been prepared in `assets`.
pub fn scene_to_pdf(
    scene: &SceneDescription,
    assets: &AssetStore,
    title: &str,
) -> ExportResult<Vec<u8>> {
    let w = f64::from(scene.canvas.width);
    let h = f64::from(scene.canvas.height);
    let (doc, page, layer) = PdfDocument::new(title, Mm(w * MM_PER_PX), Mm(h * MM_PER_PX), "Layer 1");
    let fonts = Fonts {
        sans: builtin(&doc, BuiltinFont::Helvetica)?,
        sans_bold: builtin(&doc, BuiltinFont::HelveticaBold)?,
        serif: builtin(&doc, BuiltinFont::TimesRoman)?,
        serif_bold: builtin(&doc, BuiltinFont::TimesBold)?,
        mono: builtin(&doc, BuiltinFont::Courier)?,
        mono_bold: builtin(&doc, BuiltinFont::CourierBold)?,
    };
    let p = Page {
        layer: doc.get_page(page).get_layer(layer),
        height_px: h,
        backdrop: scene.background.dominant(),
    };

    let full = scene.canvas.rect().to_path(FLATTEN_TOLERANCE);
    match scene.background {
        Background::Solid(c) => p.shape(&full, Some(Fill::solid(c)), None),
        Background::Diagonal { from, to } => {
            // Bands across the diagonal approximate the gradient.
            const BANDS: usize = 24;
            p.shape(&full, Some(Fill::solid(from)), None);
            for i in 1..BANDS {
                let t = i as f64 / BANDS as f64;
                let region = diagonal_region(w, h, 2.0 * w * t);
                p.shape(&region, Some(Fill::solid(from.mix(to, t))), None);
            }
        }
    }

    for node in &scene.nodes {
        match node {
            SceneNode::Rect {
                rect,
                radius,
                fill,
                stroke,
            } => p.shape(&rect.to_rounded_rect(*radius).to_path(FLATTEN_TOLERANCE), *fill, *stroke),
            SceneNode::Circle {
                center,
                radius,
                fill,
                stroke,
            } => p.shape(&kurbo::Circle::new(*center, *radius).to_path(FLATTEN_TOLERANCE), *fill, *stroke),
            SceneNode::Text(t) => p.text(t, &fonts),
            SceneNode::Image {
                rect,
                source,
                clip,
                opacity,
            } => {
                let img = assets.image(*source).ok_or_else(|| {
                    ExportError::capture(format!("{source:?} image was not prepared"))
                })?;
                p.image(*rect, *clip, img, *opacity);
            }
            SceneNode::Placeholder {
                rect,
                clip,
                fill,
                label,
                label_fill,
            } => {
                p.shape(&clip_path(*rect, *clip), Some(*fill), None);
                if !label.is_empty() {
                    p.text(&placeholder_label(*rect, label, *label_fill), &fonts);
                }
            }
        }
    }
    let mut out = Vec::new();
    doc.save(&mut BufWriter::new(&mut out))
        .map_err(|e| ExportError::capture(format!("pdf write: {e}")))?;
    Ok(out)
}

/// Part of the page at or beyond `d` along the top-left to bottom-right diagonal.
fn diagonal_region(w: f64, h: f64, d: f64) -> BezPath {
    let corners = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];
    let s = |(x, y): (f64, f64)| x + y * w / h;
    let mut pts = Vec::with_capacity(5);
    for i in 0..corners.len() {
        let a = corners[i];
        let b = corners[(i + 1) % corners.len()];
        let (sa, sb) = (s(a) - d, s(b) - d);
        if sa >= 0.0 {
            pts.push(a);
        }
        if (sa >= 0.0) != (sb >= 0.0) {
            let t = sa / (sa - sb);
            pts.push((a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t));
        }
    }
    let mut path = BezPath::new();
    for (i, pt) in pts.into_iter().enumerate() {
        if i == 0 {
            path.move_to(pt);
        } else {
            path.line_to(pt);
        }
    }
    path.close_path();
    path
}
