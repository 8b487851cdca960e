use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

pub(crate) const MS_PER_SECOND: u64 = 1_000;
pub(crate) const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
pub(crate) const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
pub(crate) const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;
pub(crate) const MS_PER_WEEK: u64 = 7 * MS_PER_DAY;

/// Elapsed time between two instants, broken down per unit.
///
/// Each field is an independent total (not a remainder): `hours` is the full number of hours
/// elapsed, not hours past the last whole day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ElapsedBreakdown {
    /// Whole calendar years.
    pub years: u64,
    /// Whole calendar months.
    pub months: u64,
    /// Whole weeks.
    pub weeks: u64,
    /// Whole days.
    pub days: u64,
    /// Whole hours.
    pub hours: u64,
    /// Whole minutes.
    pub minutes: u64,
    /// Whole seconds.
    pub seconds: u64,
}

impl ElapsedBreakdown {
    /// Whole decades.
    pub fn decades(&self) -> u64 {
        self.years / 10
    }
}

/// Absolute difference between two instants in whole milliseconds.
pub(crate) fn abs_millis(a: NaiveDateTime, b: NaiveDateTime) -> u64 {
    (b - a).num_milliseconds().unsigned_abs()
}

/// Compute the elapsed-time breakdown between `birth` and `target`.
///
/// Argument order does not matter. Years and months follow calendar boundaries; the smaller units
/// are floor divisions of the absolute millisecond difference.
pub fn compute_elapsed(birth: NaiveDateTime, target: NaiveDateTime) -> ElapsedBreakdown {
    let (earlier, later) = if birth <= target {
        (birth, target)
    } else {
        (target, birth)
    };
    let ms = abs_millis(earlier, later);

    ElapsedBreakdown {
        years: calendar_years(earlier, later),
        months: calendar_months(earlier, later),
        weeks: ms / MS_PER_WEEK,
        days: ms / MS_PER_DAY,
        hours: ms / MS_PER_HOUR,
        minutes: ms / MS_PER_MINUTE,
        seconds: ms / MS_PER_SECOND,
    }
}

/// Whole calendar years from `earlier` to `later` (`earlier <= later`).
///
/// The last year counts once `later` reaches the anniversary's month, day and time of day. A
/// Feb 29 birthday is not reached until Mar 1 in common years.
fn calendar_years(earlier: NaiveDateTime, later: NaiveDateTime) -> u64 {
    let span = i64::from(later.year() - earlier.year());
    if span <= 0 {
        return 0;
    }
    let reached = position_in_year(later) >= position_in_year(earlier);
    let full = if reached { span } else { span - 1 };
    full.max(0) as u64
}

fn position_in_year(t: NaiveDateTime) -> (u32, u32, u32, u32) {
    (t.month(), t.day(), t.num_seconds_from_midnight(), t.nanosecond())
}

/// Whole calendar months from `earlier` to `later` (`earlier <= later`).
///
/// `later` is moved back by the calendar month span, with its day clamped to the length of the
/// landing month; the last month is incomplete if that lands before `earlier`. A single month
/// ending on the last day of `later`'s month always counts (Jan 31 -> Feb 28 is one month,
/// Jan 31 -> Apr 30 is two).
fn calendar_months(earlier: NaiveDateTime, later: NaiveDateTime) -> u64 {
    let span = i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month()) - i64::from(earlier.month());
    if span <= 0 {
        return 0;
    }

    let shifted_day = later
        .day()
        .min(days_in_month(earlier.year(), earlier.month()));
    let shifted = (
        shifted_day,
        later.num_seconds_from_midnight(),
        later.nanosecond(),
    );
    let anchor = (
        earlier.day(),
        earlier.num_seconds_from_midnight(),
        earlier.nanosecond(),
    );
    let month_end = later.day() == days_in_month(later.year(), later.month());
    let short = shifted < anchor && !(span == 1 && month_end);

    let full = if short { span - 1 } else { span };
    full.max(0) as u64
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(ny, nm, 1),
    ) {
        (Some(a), Some(b)) => (b - a).num_days() as u32,
        _ => 31,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stats/elapsed.rs"]
mod tests;
