use super::*;
use crate::model::payload::{MilestonePayload, StatPayload};
use chrono::NaiveDate;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn milestone(title: &str, date: NaiveDateTime) -> Payload {
    Payload::Milestone(MilestonePayload {
        id: "m1".to_string(),
        title: title.to_string(),
        description: String::new(),
        date,
        category: "Age".to_string(),
        is_past: false,
        color: "#6366f1".to_string(),
        value: None,
        unit: None,
        event_name: None,
    })
}

#[test]
fn future_milestone_counts_days_left() {
    let now = at(2024, 3, 1, 9);
    let p = milestone("10,000 Days Old!", at(2024, 3, 13, 0));
    assert_eq!(
        artifact_filename("Ada Lovelace", &p, now, "png"),
        "adalovelace_10000daysold_12days_left.png"
    );
}

#[test]
fn past_and_same_day_offsets() {
    let now = at(2024, 3, 13, 23);
    assert_eq!(
        artifact_filename("ada", &milestone("x", at(2024, 3, 10, 0)), now, "svg"),
        "ada_x_3days_ago.svg"
    );
    assert_eq!(
        artifact_filename("ada", &milestone("x", at(2024, 3, 13, 1)), now, "svg"),
        "ada_x_today.svg"
    );
}

#[test]
fn empty_components_fall_back() {
    let now = at(2024, 1, 1, 0);
    assert_eq!(
        artifact_filename("  ✨ ", &milestone("日本", now), now, "pdf"),
        "export_milestone_today.pdf"
    );
}

#[test]
fn stat_cards_are_named_for_today() {
    let now = at(2024, 1, 1, 0);
    let p = Payload::Stats(StatPayload::default());
    assert_eq!(
        artifact_filename("Ada", &p, now, "webm"),
        "ada_totalexistence_today.webm"
    );
}

#[test]
fn identical_inputs_give_identical_names() {
    let now = at(2030, 6, 1, 12);
    let p = milestone("Launch", at(2031, 1, 1, 0));
    assert_eq!(
        artifact_filename("Grace", &p, now, "png"),
        artifact_filename("Grace", &p, now, "png")
    );
}
