use std::sync::Arc;

use crate::assets::fonts::FontBook;
use crate::assets::store::AssetStore;
use crate::foundation::core::{Canvas, FrameRGBA};
use crate::foundation::error::ExportResult;
use crate::render::capture::CaptureTarget;
use crate::render::raster::rasterize;
use crate::scene::model::SceneDescription;

/// Largest preview scale, leaving a visible margin even in roomy containers.
pub const MAX_PREVIEW_SCALE: f64 = 0.95;
const MIN_PREVIEW_SCALE: f64 = 0.01;

/// Size of the host container the preview is shown in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

/// Uniform scale that fits `canvas` inside `container` shrunk by `padding` along each axis.
pub fn fit_scale(container: Viewport, canvas: Canvas, padding: f64) -> f64 {
    let avail_w = (container.width - padding).max(0.0);
    let avail_h = (container.height - padding).max(0.0);
    let sx = avail_w / f64::from(canvas.width.max(1));
    let sy = avail_h / f64::from(canvas.height.max(1));
    let s = sx.min(sy).min(MAX_PREVIEW_SCALE);
    if s.is_finite() {
        s.max(MIN_PREVIEW_SCALE)
    } else {
        MIN_PREVIEW_SCALE
    }
}

/// One scene, two consumers: a scaled on-screen preview and a full-size capture target.
///
/// The scale only ever applies to the preview surface; the scene and capture stay in canvas
/// coordinates.
#[derive(Clone, Debug)]
pub struct DualRender {
    scene: Arc<SceneDescription>,
    viewport: Viewport,
    padding: f64,
    scale: f64,
}

impl DualRender {
    /// Bind a scene to a viewport.
    pub fn new(scene: Arc<SceneDescription>, viewport: Viewport, padding: f64) -> Self {
        let scale = fit_scale(viewport, scene.canvas, padding);
        Self {
            scene,
            viewport,
            padding,
            scale,
        }
    }

    /// Current scene.
    pub fn scene(&self) -> &Arc<SceneDescription> {
        &self.scene
    }

    /// Current preview scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Container resized.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scale = fit_scale(viewport, self.scene.canvas, self.padding);
    }

    /// Template, ratio or payload changed.
    pub fn set_scene(&mut self, scene: Arc<SceneDescription>) {
        self.scene = scene;
        self.scale = fit_scale(self.viewport, self.scene.canvas, self.padding);
    }

    /// Preview pixels at the fitted scale.
    pub fn render_preview(&self, assets: &AssetStore, fonts: &FontBook) -> ExportResult<FrameRGBA> {
        rasterize(&self.scene, assets, fonts, self.scale, 0.0)
    }

    /// Full-size target for static capture.
    pub fn capture_target<'a>(
        &'a self,
        assets: &'a AssetStore,
        fonts: &'a FontBook,
        text_lift_px: f64,
    ) -> CaptureTarget<'a> {
        CaptureTarget {
            scene: &self.scene,
            assets,
            fonts,
            text_lift_px,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
