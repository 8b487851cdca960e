use crate::assets::fonts::FontBook;
use crate::assets::store::AssetStore;
use crate::foundation::error::ExportResult;
#[cfg(not(feature = "pdf"))]
use crate::foundation::error::ExportError;
use crate::model::config::{QualityTier, StaticFormat};
use crate::render::raster::{frame_to_png, rasterize};
use crate::render::svg::{SvgOptions, scene_to_svg};
use crate::scene::model::SceneDescription;

/// Everything a static capture reads; images are already decoded.
#[derive(Clone, Copy, Debug)]
pub struct CaptureTarget<'a> {
    /// Scene at logical canvas size.
    pub scene: &'a SceneDescription,
    /// Prepared images.
    pub assets: &'a AssetStore,
    /// Fonts for rasterization.
    pub fonts: &'a FontBook,
    /// Upward text shift, capture only.
    pub text_lift_px: f64,
}

/// Produce the bytes of one static artifact.
///
/// PNG is rendered at canvas size × density; SVG and PDF are vector and ignore density.
#[tracing::instrument(level = "debug", skip(target), fields(w = target.scene.canvas.width, h = target.scene.canvas.height))]
pub fn capture(
    target: &CaptureTarget<'_>,
    density: QualityTier,
    format: StaticFormat,
) -> ExportResult<Vec<u8>> {
    match format {
        StaticFormat::Png => {
            let frame = rasterize(
                target.scene,
                target.assets,
                target.fonts,
                f64::from(density.density()),
                target.text_lift_px,
            )?;
            frame_to_png(&frame)
        }
        StaticFormat::Svg => {
            let opts = SvgOptions::default().with_text_lift(target.text_lift_px);
            Ok(scene_to_svg(target.scene, target.assets, &opts)?.into_bytes())
        }
        StaticFormat::Pdf => capture_pdf(target),
    }
}

#[cfg(feature = "pdf")]
fn capture_pdf(target: &CaptureTarget<'_>) -> ExportResult<Vec<u8>> {
    crate::render::pdf::scene_to_pdf(target.scene, target.assets, "Milestone")
}

#[cfg(not(feature = "pdf"))]
fn capture_pdf(_target: &CaptureTarget<'_>) -> ExportResult<Vec<u8>> {
    Err(ExportError::capture(
        "pdf output is not available in this build (enable the 'pdf' feature)",
    ))
}
