use super::*;

#[test]
fn thousands_separators() {
    assert_eq!(thousands(0), "0");
    assert_eq!(thousands(999), "999");
    assert_eq!(thousands(1_000), "1,000");
    assert_eq!(thousands(1_234_567), "1,234,567");
}

#[test]
fn figures_keep_short_fractions() {
    assert_eq!(figure(10_000.0), "10,000");
    assert_eq!(figure(1.5), "1.5");
    assert_eq!(figure(-42.0), "-42");
}

#[test]
fn ordinals() {
    let d = |m, day| NaiveDate::from_ymd_opt(2017, m, day).unwrap();
    assert_eq!(long_date(d(10, 2)), "October 2nd, 2017");
    assert_eq!(long_date(d(1, 11)), "January 11th, 2017");
    assert_eq!(long_date(d(3, 21)), "March 21st, 2017");
    assert_eq!(long_date(d(3, 23)), "March 23rd, 2017");
    assert_eq!(document_date(d(10, 2)), "02 OCT 2017");
}

#[test]
fn wrap_respects_width() {
    let lines = wrap_text("the quick brown fox jumps over the lazy dog", 300.0, 40.0, 400, 0.0, 4);
    assert!(lines.len() > 1);
    for l in &lines {
        assert!(estimate_width(l, 40.0, 400, 0.0) <= 300.0, "{l}");
    }
}

#[test]
fn wrap_truncates_with_ellipsis() {
    let text = "one two three four five six seven eight nine ten eleven twelve";
    let lines = wrap_text(text, 200.0, 40.0, 900, 0.0, 2);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with('\u{2026}'));
    assert!(estimate_width(&lines[1], 40.0, 900, 0.0) <= 200.0);
}

#[test]
fn long_words_are_broken() {
    let lines = wrap_text("Supercalifragilisticexpialidocious", 150.0, 40.0, 400, 0.0, 4);
    assert!(lines.len() >= 2);
    for l in &lines {
        assert!(estimate_width(l, 40.0, 400, 0.0) <= 150.0, "{l}");
    }
}

#[test]
fn empty_text_has_no_lines() {
    assert!(wrap_text("   ", 100.0, 20.0, 400, 0.0, 3).is_empty());
}

#[test]
fn relative_captions() {
    assert_eq!(relative_caption(0), "today");
    assert_eq!(relative_caption(1), "in 1 day");
    assert_eq!(relative_caption(12), "in 12 days");
    assert_eq!(relative_caption(-1_500), "1,500 days ago");
}

#[test]
fn relative_days_ignore_time_of_day() {
    let a = NaiveDate::from_ymd_opt(2024, 1, 10)
        .unwrap()
        .and_hms_opt(23, 0, 0)
        .unwrap();
    let b = NaiveDate::from_ymd_opt(2024, 1, 11)
        .unwrap()
        .and_hms_opt(1, 0, 0)
        .unwrap();
    assert_eq!(relative_days(b, a), 1);
    assert_eq!(relative_days(a, b), -1);
}
