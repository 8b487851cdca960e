use super::*;
use crate::foundation::core::Rect;
use crate::scene::model::{Background, Fill, SceneNode};
use crate::theme::tokens::Rgb;

fn story() -> Canvas {
    Canvas {
        width: 1080,
        height: 1920,
    }
}

fn vp(width: f64, height: f64) -> Viewport {
    Viewport { width, height }
}

#[test]
fn fit_scale_uses_the_tighter_axis() {
    let s = fit_scale(vp(600.0, 800.0), story(), 20.0);
    assert!((s - 780.0 / 1920.0).abs() < 1e-9);
}

#[test]
fn padding_is_taken_once_per_axis() {
    let square = Canvas {
        width: 1080,
        height: 1080,
    };
    let s = fit_scale(vp(500.0, 500.0), square, 20.0);
    assert!((s - 480.0 / 1080.0).abs() < 1e-9);
}

#[test]
fn fit_scale_is_capped() {
    assert_eq!(fit_scale(vp(10_000.0, 10_000.0), story(), 20.0), MAX_PREVIEW_SCALE);
}

#[test]
fn fit_scale_stays_positive_in_tiny_containers() {
    assert!(fit_scale(vp(10.0, 10.0), story(), 20.0) > 0.0);
    assert!(fit_scale(vp(0.0, 0.0), story(), 0.0) > 0.0);
}

fn scene(width: u32, height: u32) -> Arc<SceneDescription> {
    Arc::new(SceneDescription {
        canvas: Canvas { width, height },
        background: Background::Solid(Rgb::new(255, 255, 255)),
        nodes: vec![SceneNode::Rect {
            rect: Rect::new(0.0, 0.0, f64::from(width) / 2.0, f64::from(height)),
            radius: 0.0,
            fill: Some(Fill::solid(Rgb::new(0, 0, 0))),
            stroke: None,
        }],
    })
}

#[test]
fn resize_and_set_scene_recompute_scale() {
    let mut dual = DualRender::new(scene(100, 100), vp(90.0, 90.0), 0.0);
    assert!((dual.scale() - 0.9).abs() < 1e-9);

    dual.resize(vp(50.0, 200.0));
    assert!((dual.scale() - 0.5).abs() < 1e-9);

    dual.set_scene(scene(50, 100));
    assert!((dual.scale() - 0.95).abs() < 1e-9);
}

#[test]
fn preview_is_scaled_but_capture_is_not() {
    let dual = DualRender::new(scene(100, 50), vp(70.0, 70.0), 10.0);
    let fonts = FontBook::empty();
    let assets = AssetStore::empty();
    let preview = dual.render_preview(&assets, &fonts).unwrap();
    assert_eq!((preview.width, preview.height), (60, 30));

    let target = dual.capture_target(&assets, &fonts, 0.0);
    assert_eq!(target.scene.canvas, Canvas { width: 100, height: 50 });
}
