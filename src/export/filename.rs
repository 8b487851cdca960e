use chrono::NaiveDateTime;

use crate::model::payload::Payload;
use crate::scene::text::relative_days;

const NAME_FALLBACK: &str = "export";
const TITLE_FALLBACK: &str = "milestone";

/// Lowercase `s` and drop everything that is not an ASCII letter or digit.
pub fn sanitize(s: &str, fallback: &str) -> String {
    let out: String = s
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if out.is_empty() {
        fallback.to_string()
    } else {
        out
    }
}

/// `12days_left`, `3days_ago` or `today`.
pub fn offset_tag(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        d if d > 0 => format!("{d}days_left"),
        d => format!("{}days_ago", d.unsigned_abs()),
    }
}

/// Deterministic artifact name without extension: `{name}_{title}_{offset}`.
///
/// Stat cards have no target date and always carry `today`.
pub fn artifact_stem(name: &str, payload: &Payload, now: NaiveDateTime) -> String {
    let days = match payload {
        Payload::Milestone(m) => relative_days(m.date, now),
        Payload::Stats(_) => 0,
    };
    format!(
        "{}_{}_{}",
        sanitize(name, NAME_FALLBACK),
        sanitize(payload.title(), TITLE_FALLBACK),
        offset_tag(days)
    )
}

/// [`artifact_stem`] plus `.{ext}`.
pub fn artifact_filename(name: &str, payload: &Payload, now: NaiveDateTime, ext: &str) -> String {
    format!("{}.{ext}", artifact_stem(name, payload, now))
}

#[cfg(test)]
#[path = "../../tests/unit/export/filename.rs"]
mod tests;
