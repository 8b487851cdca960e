use crate::assets::decode::encode_png;
use crate::assets::fonts::FontBook;
use crate::assets::store::AssetStore;
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{ExportError, ExportResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::svg::{SvgOptions, scene_to_svg};
use crate::scene::model::SceneDescription;

const MAX_DIM: u32 = 16_384;

/// Rasterize `scene` at `scale` times its logical canvas.
///
/// The scene is serialized to SVG and rendered with `resvg`, so preview, capture and the SVG
/// export share one interpretation of every node.
pub fn rasterize(
    scene: &SceneDescription,
    assets: &AssetStore,
    fonts: &FontBook,
    scale: f64,
    text_lift_px: f64,
) -> ExportResult<FrameRGBA> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ExportError::capture(format!("invalid raster scale {scale}")));
    }
    let width = (f64::from(scene.canvas.width) * scale).round().max(1.0) as u32;
    let height = (f64::from(scene.canvas.height) * scale).round().max(1.0) as u32;
    if width > MAX_DIM || height > MAX_DIM {
        return Err(ExportError::capture(format!(
            "raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let opts = SvgOptions::from_fonts(fonts).with_text_lift(text_lift_px);
    let svg = scene_to_svg(scene, assets, &opts)?;
    let tree = usvg::Tree::from_str(&svg, &fonts.usvg_options())
        .map_err(|e| ExportError::capture(format!("parse scene svg: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ExportError::capture("failed to allocate raster surface"))?;
    let sx = width as f32 / tree.size().width();
    let sy = height as f32 / tree.size().height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    Ok(FrameRGBA {
        width,
        height,
        data: pixmap.take(),
        premultiplied: true,
    })
}

/// Encode a frame as PNG.
pub fn frame_to_png(frame: &FrameRGBA) -> ExportResult<Vec<u8>> {
    let mut data = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }
    encode_png(frame.width, frame.height, data)
}
