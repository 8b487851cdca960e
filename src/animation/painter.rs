use std::collections::HashMap;
use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::animation::background::{Mark, static_layer};
use crate::animation::frame::{AnimationContext, DrawOp};
use crate::assets::fonts::FontBook;
use crate::assets::store::{TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::{Affine, BezPath, Canvas, FrameRGBA, Point, Rect};
use crate::foundation::error::{ExportError, ExportResult};
use crate::scene::model::{Fill, FontFamily};

/// Heart icon in a 24x24 box.
pub const HEART_PATH: &str = "M12 21.35l-1.45-1.32C5.4 15.36 2 12.28 2 8.5 2 5.42 4.42 3 7.5 3c1.74 0 3.41.81 4.5 2.09C13.09 3.81 14.76 3 16.5 3 19.58 3 22 5.42 22 8.5c0 3.78-3.4 6.86-8.55 11.54L12 21.35z";

const TOLERANCE: f64 = 0.1;

/// CPU rasterizer for video frames.
///
/// Owns the per-run surface: the style's static layer is built once and reused for every frame.
pub struct FramePainter {
    width: u16,
    height: u16,
    backdrop: vello_cpu::Image,
    heart: vello_cpu::kurbo::BezPath,
    fonts: FontBook,
    text: TextLayoutEngine,
    font_data: HashMap<usvg::fontdb::ID, vello_cpu::peniko::FontData>,
    warned_no_font: bool,
}

impl FramePainter {
    /// Build the surface for one run.
    #[tracing::instrument(level = "debug", skip_all, fields(style = %ctx.style))]
    pub fn new(ctx: &AnimationContext, fonts: FontBook) -> ExportResult<Self> {
        let (width, height) = surface_size(ctx.canvas)?;
        let pixels = static_layer(ctx.style, ctx.canvas);
        let pixmap = premul_bytes_to_pixmap(&pixels, width, height)?;
        let heart = BezPath::from_svg(HEART_PATH)
            .map_err(|e| ExportError::capture(format!("heart path: {e}")))?;
        Ok(Self {
            width,
            height,
            backdrop: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            heart: bezpath_to_cpu(&heart),
            fonts,
            text: TextLayoutEngine::new(),
            font_data: HashMap::new(),
            warned_no_font: false,
        })
    }

    /// Rasterize one draw list over the static layer.
    pub fn paint(&mut self, ops: &[DrawOp]) -> ExportResult<FrameRGBA> {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(self.backdrop.clone());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));

        for op in ops {
            self.draw(&mut ctx, op)?;
        }

        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw(&mut self, ctx: &mut vello_cpu::RenderContext, op: &DrawOp) -> ExportResult<()> {
        match op {
            DrawOp::Mark(Mark::Dot {
                center,
                radius,
                fill,
            }) => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color(*fill));
                let circle = vello_cpu::kurbo::Circle::new(point_to_cpu(*center), *radius);
                ctx.fill_path(&circle.to_path(TOLERANCE));
            }
            DrawOp::Mark(Mark::Bar { rect, fill }) => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color(*fill));
                ctx.fill_rect(&rect_to_cpu(*rect));
            }
            DrawOp::Card {
                rect,
                radius,
                fill,
                stroke,
                transform,
                opacity,
            } => {
                if !visible(*transform, *opacity) {
                    return Ok(());
                }
                let path = vello_cpu::kurbo::RoundedRect::from_rect(rect_to_cpu(*rect), *radius)
                    .to_path(TOLERANCE);
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.push_opacity_layer(*opacity);
                ctx.set_paint(color(*fill));
                ctx.fill_path(&path);
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(stroke.width));
                ctx.set_paint(color(stroke.fill));
                ctx.stroke_path(&path);
                ctx.pop_layer();
            }
            DrawOp::Heart {
                transform,
                fill,
                opacity,
            } => {
                if !visible(*transform, *opacity) {
                    return Ok(());
                }
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.push_opacity_layer(*opacity);
                ctx.set_paint(color(*fill));
                ctx.fill_path(&self.heart);
                ctx.pop_layer();
            }
            DrawOp::Text {
                text,
                anchor,
                size,
                weight,
                fill,
                transform,
                opacity,
            } => {
                if text.is_empty() || !visible(*transform, *opacity) {
                    return Ok(());
                }
                self.draw_text(ctx, text, *anchor, *size, *weight, *fill, *transform, *opacity)?;
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        anchor: Point,
        size: f64,
        weight: u16,
        fill: Fill,
        transform: Affine,
        opacity: f32,
    ) -> ExportResult<()> {
        let Some(face) = self.fonts.resolve(FontFamily::Sans, weight) else {
            if !self.warned_no_font {
                tracing::warn!("no font faces available, video text is skipped");
                self.warned_no_font = true;
            }
            return Ok(());
        };
        let font = self
            .font_data
            .entry(face.id)
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
                    face.index,
                )
            })
            .clone();

        let [r, g, b, a] = fill.rgba8();
        let layout = self.text.layout_line(
            text,
            &face,
            size as f32,
            0.0,
            TextBrushRgba8 { r, g, b, a },
        )?;
        let baseline = layout
            .lines()
            .next()
            .map(|l| f64::from(l.metrics().baseline))
            .unwrap_or(size);
        let origin = Affine::translate((
            anchor.x - f64::from(layout.width()) / 2.0,
            anchor.y - baseline,
        ));

        ctx.set_transform(affine_to_cpu(transform * origin));
        ctx.push_opacity_layer(opacity);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.pop_layer();
        Ok(())
    }
}

fn visible(transform: Affine, opacity: f32) -> bool {
    opacity > 0.0 && transform.determinant().abs() > 1e-9
}

fn color(fill: Fill) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = fill.rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn surface_size(canvas: Canvas) -> ExportResult<(u16, u16)> {
    let width: u16 = canvas
        .width
        .try_into()
        .map_err(|_| ExportError::capture("video width exceeds u16"))?;
    let height: u16 = canvas
        .height
        .try_into()
        .map_err(|_| ExportError::capture("video height exceeds u16"))?;
    if width == 0 || height == 0 {
        return Err(ExportError::capture("video surface must be non-empty"));
    }
    Ok((width, height))
}

fn premul_bytes_to_pixmap(rgba8_premul: &[u8], w: u16, h: u16) -> ExportResult<vello_cpu::Pixmap> {
    if rgba8_premul.len() != usize::from(w) * usize::from(h) * 4 {
        return Err(ExportError::capture("backdrop byte length mismatch"));
    }
    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::frame::{StatItem, VideoContent, compose_frame};
    use crate::foundation::core::Fps;
    use crate::model::config::VideoStyle;

    fn ctx(style: VideoStyle) -> AnimationContext {
        AnimationContext::new(
            style,
            Canvas {
                width: 64,
                height: 48,
            },
            Fps::new(10, 1).unwrap(),
            1,
            VideoContent {
                title: "T".to_string(),
                subtitle: "S".to_string(),
                items: vec![StatItem {
                    label: "DAYS".to_string(),
                    value: 3,
                }],
                finale: StatItem {
                    label: "SECONDS".to_string(),
                    value: 9,
                },
            },
            1,
        )
        .unwrap()
    }

    #[test]
    fn heart_path_parses() {
        let p = BezPath::from_svg(HEART_PATH).unwrap();
        let b = kurbo::Shape::bounding_box(&p);
        assert!(b.x0 >= 1.9 && b.x1 <= 22.1 && b.y1 <= 21.4);
    }

    #[test]
    fn paints_backdrop_without_fonts() {
        let c = ctx(VideoStyle::Neon);
        let mut painter = FramePainter::new(&c, FontBook::empty()).unwrap();
        let frame = painter.paint(&compose_frame(&c, 0)).unwrap();
        assert_eq!((frame.width, frame.height), (64, 48));
        assert!(frame.premultiplied);
        assert_eq!(frame.pixel(40, 30).unwrap()[3], 255);
    }

    #[test]
    fn oversized_surfaces_are_rejected() {
        assert!(
            surface_size(Canvas {
                width: 70_000,
                height: 10
            })
            .is_err()
        );
    }
}
