use super::*;
use crate::model::payload::MilestonePayload;
use crate::scene::model::SceneNode;
use crate::theme::tokens::{ThemeId, resolve};

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn subject(has_avatar: bool) -> Subject {
    Subject {
        name: "Ada Lovelace".to_string(),
        initials: "AL".to_string(),
        birth: at(1990, 5, 17),
        has_avatar,
        has_cover: false,
    }
}

fn milestone() -> Payload {
    Payload::Milestone(MilestonePayload {
        id: "m1".to_string(),
        title: "10,000 Days Alive".to_string(),
        description: "A round number worth celebrating with friends.".to_string(),
        date: at(2017, 10, 2),
        category: "Age".to_string(),
        is_past: true,
        color: "#6366f1".to_string(),
        value: Some(10_000.0),
        unit: Some("days".to_string()),
        event_name: Some("Birth".to_string()),
    })
}

fn flags(show_stats: bool, cosmic_overlay: bool) -> SceneFlags {
    SceneFlags {
        show_stats,
        cosmic_overlay,
    }
}

#[test]
fn build_is_deterministic() {
    let tokens = resolve(ThemeId::Ocean);
    let now = at(2024, 1, 1);
    for template in TemplateId::ALL {
        let a = build_scene(&milestone(), &subject(true), &tokens, *template, AspectRatio::Story, flags(true, true), now);
        let b = build_scene(&milestone(), &subject(true), &tokens, *template, AspectRatio::Story, flags(true, true), now);
        assert_eq!(a, b, "{template}");
    }
}

#[test]
fn every_template_and_ratio_uses_the_ratio_canvas() {
    let tokens = resolve(ThemeId::Dark);
    let now = at(2024, 1, 1);
    for template in TemplateId::ALL {
        for aspect in AspectRatio::ALL {
            let scene = build_scene(&milestone(), &subject(false), &tokens, *template, *aspect, flags(true, false), now);
            assert_eq!(scene.canvas, aspect.canvas());
            assert!(!scene.nodes.is_empty());
        }
    }
}

#[test]
fn text_stays_on_canvas() {
    let tokens = resolve(ThemeId::Light);
    let now = at(2024, 1, 1);
    for template in TemplateId::ALL {
        for aspect in AspectRatio::ALL {
            let scene = build_scene(&milestone(), &subject(true), &tokens, *template, *aspect, flags(true, true), now);
            let h = f64::from(scene.canvas.height);
            for node in &scene.nodes {
                if let SceneNode::Text(t) = node {
                    let last = t.baseline(t.lines.len().saturating_sub(1));
                    assert!(t.y > 0.0 && last < h, "{template} {aspect}: {:?}", t.lines);
                }
            }
        }
    }
}

#[test]
fn missing_avatar_degrades_to_placeholder() {
    let tokens = resolve(ThemeId::Light);
    let now = at(2024, 1, 1);
    let scene = build_scene(&milestone(), &subject(false), &tokens, TemplateId::Classic, AspectRatio::Square, flags(false, false), now);
    assert!(scene.image_refs().is_empty());
    assert!(scene.nodes.iter().any(|n| matches!(
        n,
        SceneNode::Placeholder { label, .. } if label == "AL"
    )));

    let scene = build_scene(&milestone(), &subject(true), &tokens, TemplateId::Classic, AspectRatio::Square, flags(false, false), now);
    assert_eq!(scene.image_refs(), vec![ImageRef::Avatar]);
}

#[test]
fn cinematic_without_cover_gets_a_tinted_backdrop() {
    let tokens = resolve(ThemeId::Sunset);
    let scene = build_scene(&milestone(), &subject(false), &tokens, TemplateId::Cinematic, AspectRatio::Story, flags(false, false), at(2024, 1, 1));
    assert!(matches!(scene.nodes.first(), Some(SceneNode::Placeholder { .. })));
}

#[test]
fn stats_toggle_controls_cosmic_blocks() {
    let tokens = resolve(ThemeId::Light);
    let now = at(2024, 1, 1);
    let with = build_scene(&milestone(), &subject(true), &tokens, TemplateId::Classic, AspectRatio::Story, flags(true, false), now);
    let without = build_scene(&milestone(), &subject(true), &tokens, TemplateId::Classic, AspectRatio::Story, flags(false, false), now);
    assert!(with.text_lines().contains(&"EARTH ROTATIONS"));
    assert!(!without.text_lines().contains(&"EARTH ROTATIONS"));

    let overlay = build_scene(&milestone(), &subject(true), &tokens, TemplateId::Classic, AspectRatio::Story, flags(true, true), now);
    assert!(overlay.text_lines().contains(&"SECOND-HAND LAPS"));
}

#[test]
fn milestone_copy_reaches_the_scene() {
    let tokens = resolve(ThemeId::Light);
    let scene = build_scene(&milestone(), &subject(true), &tokens, TemplateId::Classic, AspectRatio::Story, flags(true, false), at(2024, 1, 1));
    let lines = scene.text_lines();
    assert!(lines.contains(&"MILESTONE UNLOCKED"));
    assert!(lines.contains(&"October 2nd, 2017"));
    assert!(lines.contains(&"10,000 days"));
    assert!(lines.contains(&"Since Birth"));
}

#[test]
fn stats_payload_shows_years_figure() {
    let tokens = resolve(ThemeId::Dark);
    let s = subject(false);
    let now = at(2024, 6, 1);
    let payload = existence_payload(&s, now);
    let scene = build_scene(&payload, &s, &tokens, TemplateId::Classic, AspectRatio::Story, flags(true, false), now);
    let lines = scene.text_lines();
    assert!(lines.contains(&"34"));
    assert!(lines.contains(&"YEARS ON EARTH"));
    assert!(lines.contains(&"LIFE TIMELINE OF ADA LOVELACE"));
    assert!(lines.contains(&"SECONDS LIVED"));
}

#[test]
fn passport_carries_machine_readable_lines() {
    let tokens = resolve(ThemeId::Light);
    let scene = build_scene(&milestone(), &subject(false), &tokens, TemplateId::Passport, AspectRatio::Portrait, flags(true, false), at(2024, 1, 1));
    let mrz: Vec<&str> = scene
        .text_lines()
        .into_iter()
        .filter(|l| l.len() == 44 && l.contains('<'))
        .collect();
    assert_eq!(mrz.len(), 2);
    assert!(mrz[0].starts_with("P<MLSLOVELACE<<ADA"));
    assert!(mrz[1].starts_with("171002<"));
}

#[test]
fn long_titles_are_truncated_to_template_lines() {
    let tokens = resolve(ThemeId::Light);
    let mut p = milestone();
    if let Payload::Milestone(m) = &mut p {
        m.title = "word ".repeat(80);
    }
    let scene = build_scene(&p, &subject(true), &tokens, TemplateId::Minimal, AspectRatio::Square, flags(false, false), at(2024, 1, 1));
    let title = scene
        .nodes
        .iter()
        .find_map(|n| match n {
            SceneNode::Text(t) if t.lines.iter().any(|l| l.starts_with("word")) => Some(t),
            _ => None,
        })
        .unwrap();
    assert!(title.lines.len() <= spec_for(TemplateId::Minimal).max_title_lines);
    assert!(title.lines.last().unwrap().ends_with('\u{2026}'));
}
