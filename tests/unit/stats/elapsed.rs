use super::*;

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
}

#[test]
fn one_day_apart() {
    let e = compute_elapsed(at("2000-01-01T00:00:00"), at("2000-01-02T00:00:00"));
    assert_eq!(e.days, 1);
    assert_eq!(e.hours, 24);
    assert_eq!(e.minutes, 1_440);
    assert_eq!(e.seconds, 86_400);
    assert_eq!(e.weeks, 0);
    assert_eq!(e.months, 0);
    assert_eq!(e.years, 0);
}

#[test]
fn argument_order_does_not_matter() {
    let a = at("1990-05-17T08:30:00");
    let b = at("2024-02-29T23:59:59");
    assert_eq!(compute_elapsed(a, b), compute_elapsed(b, a));
}

#[test]
fn year_counts_only_after_anniversary() {
    let birth = at("1990-06-15T12:00:00");
    assert_eq!(compute_elapsed(birth, at("2020-06-15T11:59:59")).years, 29);
    assert_eq!(compute_elapsed(birth, at("2020-06-15T12:00:00")).years, 30);
    assert_eq!(compute_elapsed(birth, at("2020-06-15T12:00:00")).months, 360);
}

#[test]
fn month_end_anniversary_is_clamped() {
    let birth = at("2023-01-31T00:00:00");
    assert_eq!(compute_elapsed(birth, at("2023-02-28T00:00:00")).months, 1);
    assert_eq!(compute_elapsed(birth, at("2023-02-27T23:00:00")).months, 0);
    assert_eq!(compute_elapsed(birth, at("2023-03-30T00:00:00")).months, 1);
    assert_eq!(compute_elapsed(birth, at("2023-03-31T00:00:00")).months, 2);
}

#[test]
fn clamped_month_end_counts_only_for_a_single_month() {
    let birth = at("2023-01-31T00:00:00");
    assert_eq!(compute_elapsed(birth, at("2023-04-30T00:00:00")).months, 2);
    assert_eq!(compute_elapsed(birth, at("2023-05-01T00:00:00")).months, 3);
    assert_eq!(compute_elapsed(birth, at("2023-02-28T23:59:59")).months, 1);

    let leap = at("2024-01-31T00:00:00");
    assert_eq!(compute_elapsed(leap, at("2024-02-28T00:00:00")).months, 0);
    assert_eq!(compute_elapsed(leap, at("2024-02-29T00:00:00")).months, 1);
}

#[test]
fn leap_day_birthdays() {
    let birth = at("2000-02-29T00:00:00");
    let e = compute_elapsed(birth, at("2001-02-28T00:00:00"));
    assert_eq!((e.years, e.months), (0, 11));
    let e = compute_elapsed(birth, at("2001-03-01T00:00:00"));
    assert_eq!((e.years, e.months), (1, 12));
    let e = compute_elapsed(birth, at("2004-02-29T00:00:00"));
    assert_eq!((e.years, e.months), (4, 48));
}

#[test]
fn years_follow_the_anniversary_not_the_month_count() {
    let e = compute_elapsed(at("2001-02-28T12:00:00"), at("2004-02-29T00:00:00"));
    assert_eq!(e.years, 3);
    assert_eq!(e.months, 35);
}

#[test]
fn same_instant_is_all_zero() {
    let t = at("2010-10-10T10:10:10");
    assert_eq!(compute_elapsed(t, t), ElapsedBreakdown::default());
}

#[test]
fn weeks_floor_divide_days() {
    let e = compute_elapsed(at("2024-01-01T00:00:00"), at("2024-01-15T00:00:00"));
    assert_eq!(e.days, 14);
    assert_eq!(e.weeks, 2);
}

#[test]
fn decades_from_years() {
    let e = compute_elapsed(at("1980-01-01T00:00:00"), at("2015-06-01T00:00:00"));
    assert_eq!(e.years, 35);
    assert_eq!(e.decades(), 3);
}

#[test]
fn february_lengths() {
    assert_eq!(days_in_month(2024, 2), 29);
    assert_eq!(days_in_month(2023, 2), 28);
    assert_eq!(days_in_month(1900, 2), 28);
    assert_eq!(days_in_month(2023, 12), 31);
}
