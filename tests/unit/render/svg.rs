use super::*;
use crate::foundation::core::{Canvas, Point};
use crate::model::payload::Profile;
use crate::scene::model::ImageRef;
use crate::theme::tokens::Rgb;

fn canvas() -> Canvas {
    Canvas {
        width: 200,
        height: 100,
    }
}

fn text_node(line: &str, y: f64) -> SceneNode {
    SceneNode::Text(TextNode {
        lines: vec![line.to_string()],
        x: 100.0,
        y,
        size: 20.0,
        line_height: 24.0,
        weight: 700,
        family: FontFamily::Sans,
        letter_spacing: 0.0,
        align: TextAlign::Center,
        fill: Fill::solid(Rgb::new(255, 255, 255)),
    })
}

fn scene(nodes: Vec<SceneNode>) -> SceneDescription {
    SceneDescription {
        canvas: canvas(),
        background: Background::Diagonal {
            from: Rgb::new(0, 0, 0),
            to: Rgb::new(40, 40, 40),
        },
        nodes,
    }
}

#[test]
fn output_parses_as_svg() {
    let s = scene(vec![
        SceneNode::Rect {
            rect: Rect::new(10.0, 10.0, 90.0, 50.0),
            radius: 8.0,
            fill: Some(Fill::with_alpha(Rgb::new(255, 0, 0), 0.5)),
            stroke: Some(Stroke {
                fill: Fill::solid(Rgb::new(0, 0, 0)),
                width: 2.0,
            }),
        },
        SceneNode::Circle {
            center: Point::new(150.0, 50.0),
            radius: 20.0,
            fill: None,
            stroke: None,
        },
        SceneNode::Placeholder {
            rect: Rect::new(0.0, 0.0, 40.0, 40.0),
            clip: ClipShape::Circle,
            fill: Fill::solid(Rgb::new(200, 200, 200)),
            label: "AL".to_string(),
            label_fill: Fill::solid(Rgb::new(0, 0, 0)),
        },
        text_node("Fish & <Chips>", 60.0),
    ]);
    let svg = scene_to_svg(&s, &AssetStore::empty(), &SvgOptions::default()).unwrap();
    assert!(svg.contains("Fish &amp; &lt;Chips&gt;"));
    assert!(svg.contains("url(#bg)"));
    usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
}

#[test]
fn text_lift_moves_baselines_only() {
    let s = scene(vec![text_node("hi", 60.0)]);
    let plain = scene_to_svg(&s, &AssetStore::empty(), &SvgOptions::default()).unwrap();
    let lifted = scene_to_svg(
        &s,
        &AssetStore::empty(),
        &SvgOptions::default().with_text_lift(4.0),
    )
    .unwrap();
    assert!(plain.contains(r#"y="60""#));
    assert!(lifted.contains(r#"y="56""#));
}

#[test]
fn images_embed_as_data_uris() {
    let png = crate::assets::decode::encode_png(1, 1, vec![1, 2, 3, 255]).unwrap();
    let profile = Profile {
        avatar: Some(png),
        ..Profile::default()
    };
    let s = scene(vec![SceneNode::Image {
        rect: Rect::new(0.0, 0.0, 50.0, 50.0),
        source: ImageRef::Avatar,
        clip: ClipShape::Rounded(6.0),
        opacity: 1.0,
    }]);
    let assets = AssetStore::prepare(&profile, &s).unwrap();
    let svg = scene_to_svg(&s, &assets, &SvgOptions::default()).unwrap();
    assert!(svg.contains("data:image/png;base64,"));
    assert!(svg.contains(r#"clip-path="url(#clip0)""#));
}

#[test]
fn unprepared_image_is_a_capture_error() {
    let s = scene(vec![SceneNode::Image {
        rect: Rect::new(0.0, 0.0, 50.0, 50.0),
        source: ImageRef::Cover,
        clip: ClipShape::Circle,
        opacity: 1.0,
    }]);
    let err = scene_to_svg(&s, &AssetStore::empty(), &SvgOptions::default()).unwrap_err();
    assert!(matches!(err, ExportError::Capture(_)));
}
