use chrono::NaiveDate;

use super::*;
use crate::model::payload::MilestonePayload;

fn subject() -> Subject {
    Subject {
        name: "Ada Lovelace".to_string(),
        initials: "AL".to_string(),
        birth: NaiveDate::from_ymd_opt(1990, 5, 17)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        has_avatar: false,
        has_cover: false,
    }
}

fn stats_content() -> VideoContent {
    let now = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    VideoContent::for_payload(&Payload::Stats(StatPayload::between(subject().birth, now)), &subject())
}

fn context(style: VideoStyle) -> AnimationContext {
    AnimationContext::new(
        style,
        Canvas {
            width: 1080,
            height: 1920,
        },
        Fps::new(60, 1).unwrap(),
        10,
        stats_content(),
        7,
    )
    .unwrap()
}

fn texts(ops: &[DrawOp]) -> Vec<(&str, f32)> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, opacity, .. } => Some((text.as_str(), *opacity)),
            _ => None,
        })
        .collect()
}

#[test]
fn stat_content_lists_six_units_and_a_seconds_finale() {
    let c = stats_content();
    assert_eq!(c.title, "TOTAL EXISTENCE");
    assert_eq!(c.subtitle, "ADA LOVELACE");
    let labels: Vec<&str> = c.items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, ["YEARS", "MONTHS", "WEEKS", "DAYS", "HOURS", "MINUTES"]);
    assert_eq!(c.items[0].value, 34);
    assert_eq!(c.finale.label, "SECONDS ALIVE");
}

#[test]
fn milestone_content_counts_from_birth_to_the_milestone() {
    let m = MilestonePayload {
        id: "m".to_string(),
        title: "10,000 days".to_string(),
        description: String::new(),
        date: NaiveDate::from_ymd_opt(2017, 10, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        category: String::new(),
        is_past: true,
        color: "#6366f1".to_string(),
        value: None,
        unit: None,
        event_name: None,
    };
    let c = VideoContent::for_payload(&Payload::Milestone(m), &subject());
    assert_eq!(c.title, "10,000 DAYS");
    assert_eq!(c.subtitle, "OCTOBER 2ND, 2017");
    assert_eq!(c.items[3].value, 10_000);
}

#[test]
fn first_frame_shows_only_the_backdrop_and_a_hidden_title() {
    let ops = compose_frame(&context(VideoStyle::Cinematic), 0);
    assert!(!ops.iter().any(|op| matches!(op, DrawOp::Card { .. } | DrawOp::Heart { .. })));
    let t = texts(&ops);
    assert_eq!(t.len(), 2);
    assert!(t.iter().all(|(_, a)| a.abs() < 1e-6));
}

#[test]
fn last_frame_shows_every_final_value() {
    let ctx = context(VideoStyle::Neon);
    let ops = compose_frame(&ctx, poster_frame(&ctx));
    assert_eq!(
        ops.iter().filter(|op| matches!(op, DrawOp::Card { .. })).count(),
        6
    );
    assert_eq!(
        ops.iter().filter(|op| matches!(op, DrawOp::Heart { .. })).count(),
        1
    );
    let t = texts(&ops);
    let seconds = thousands(ctx.content.finale.value);
    assert!(t.iter().any(|(s, a)| *s == seconds && *a == 1.0));
    assert!(t.iter().any(|(s, _)| *s == "34"));
    assert!(t.iter().any(|(s, _)| *s == "SECONDS ALIVE"));
}

#[test]
fn stat_items_appear_in_timeline_order() {
    let ctx = context(VideoStyle::Cosmic);
    let visible = |frame| {
        let t = compose_frame(&ctx, frame);
        ["YEARS", "MONTHS", "WEEKS"]
            .iter()
            .filter(|l| texts(&t).iter().any(|(s, _)| s == *l))
            .count()
    };
    assert_eq!(visible(90), 0);
    assert_eq!(visible(91), 1);
    assert_eq!(visible(151), 2);
    assert_eq!(visible(211), 3);
}

#[test]
fn minimal_style_draws_no_cards() {
    let ctx = context(VideoStyle::Minimal);
    let ops = compose_frame(&ctx, poster_frame(&ctx));
    assert!(!ops.iter().any(|op| matches!(op, DrawOp::Card { .. })));
}

#[test]
fn rolling_values_and_heartbeat() {
    assert_eq!(rolled_value(1_000, 0.0), 0);
    assert_eq!(rolled_value(1_000, 1.0), 1_000);
    assert!(rolled_value(1_000, 0.5) > 900);

    let fps = Fps::new(60, 1).unwrap();
    assert_eq!(heartbeat_pulse(0, fps), 1.0);
    assert!((heartbeat_pulse(5, fps) - 1.1).abs() < 1e-9);
    assert_eq!(heartbeat_pulse(20, fps), 1.0);
    assert!((heartbeat_pulse(55, fps) - 1.1).abs() < 1e-9);
}
