use chrono::NaiveDateTime;

use crate::stats::elapsed::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, abs_millis};

/// Mean tropical year in days.
pub const TROPICAL_YEAR_DAYS: f64 = 365.2422;

/// Astronomical and clockwork framings of an elapsed span.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CosmicStats {
    /// Whole days elapsed ("Earth rotations").
    pub day_count: u64,
    /// `day_count / 365.2422` with two decimals ("Sun orbits").
    ///
    /// Intentionally differs from the calendar year count.
    pub solar_years: String,
    /// Full turns of an analog hour hand (one per 12 hours).
    pub hour_hand_cycles: u64,
    /// Full turns of a minute hand (one per hour).
    pub minute_hand_cycles: u64,
    /// Full turns of a second hand (one per minute).
    pub second_hand_cycles: u64,
}

/// Compute cosmic metrics between `birth` and `target` (order does not matter).
pub fn compute_cosmic(birth: NaiveDateTime, target: NaiveDateTime) -> CosmicStats {
    let ms = abs_millis(birth, target);
    let day_count = ms / MS_PER_DAY;
    CosmicStats {
        day_count,
        solar_years: solar_years(day_count),
        hour_hand_cycles: ms / (12 * MS_PER_HOUR),
        minute_hand_cycles: ms / MS_PER_HOUR,
        second_hand_cycles: ms / MS_PER_MINUTE,
    }
}

/// Two-decimal tropical-year figure for a whole day count.
pub fn solar_years(day_count: u64) -> String {
    format!("{:.2}", day_count as f64 / TROPICAL_YEAR_DAYS)
}
