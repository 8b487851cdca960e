use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::foundation::error::{ExportError, ExportResult};
use crate::stats::elapsed::{ElapsedBreakdown, compute_elapsed};
use crate::theme::tokens::ThemeId;

/// A dated milestone selected for export.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MilestonePayload {
    /// Stable identifier.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Supporting copy.
    #[serde(default)]
    pub description: String,
    /// When the milestone happens (or happened).
    pub date: NaiveDateTime,
    /// Category tag ("Age", "Custom", ...).
    #[serde(default)]
    pub category: String,
    /// Whether the milestone lies in the past relative to when it was listed.
    #[serde(default)]
    pub is_past: bool,
    /// Display color as `#rrggbb`.
    #[serde(default = "default_color")]
    pub color: String,
    /// Optional numeric figure (e.g. 10 000 days).
    #[serde(default)]
    pub value: Option<f64>,
    /// Unit of `value`.
    #[serde(default)]
    pub unit: Option<String>,
    /// Name of the event this milestone was derived from.
    #[serde(default)]
    pub event_name: Option<String>,
}

fn default_color() -> String {
    "#6366f1".to_string()
}

/// Units carried by a [`StatPayload`], in display order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StatUnit {
    /// Calendar years.
    Years,
    /// Calendar months.
    Months,
    /// Weeks.
    Weeks,
    /// Days.
    Days,
    /// Hours.
    Hours,
    /// Minutes.
    Minutes,
    /// Seconds.
    Seconds,
}

impl StatUnit {
    /// All units, largest first.
    pub const ALL: [StatUnit; 7] = [
        StatUnit::Years,
        StatUnit::Months,
        StatUnit::Weeks,
        StatUnit::Days,
        StatUnit::Hours,
        StatUnit::Minutes,
        StatUnit::Seconds,
    ];

    /// Title-case label.
    pub fn label(self) -> &'static str {
        match self {
            StatUnit::Years => "Years",
            StatUnit::Months => "Months",
            StatUnit::Weeks => "Weeks",
            StatUnit::Days => "Days",
            StatUnit::Hours => "Hours",
            StatUnit::Minutes => "Minutes",
            StatUnit::Seconds => "Seconds",
        }
    }
}

/// Non-milestone payload: unit -> count, all derived from one elapsed span.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatPayload {
    values: BTreeMap<StatUnit, u64>,
}

impl StatPayload {
    /// Build from one breakdown so every unit shares the same basis.
    pub fn from_elapsed(e: &ElapsedBreakdown) -> Self {
        let values = BTreeMap::from([
            (StatUnit::Years, e.years),
            (StatUnit::Months, e.months),
            (StatUnit::Weeks, e.weeks),
            (StatUnit::Days, e.days),
            (StatUnit::Hours, e.hours),
            (StatUnit::Minutes, e.minutes),
            (StatUnit::Seconds, e.seconds),
        ]);
        Self { values }
    }

    /// Elapsed stats from `birth` to `now`.
    pub fn between(birth: NaiveDateTime, now: NaiveDateTime) -> Self {
        Self::from_elapsed(&compute_elapsed(birth, now))
    }

    /// Count for `unit` (zero when absent).
    pub fn get(&self, unit: StatUnit) -> u64 {
        self.values.get(&unit).copied().unwrap_or(0)
    }

    /// Iterate `(unit, count)` largest unit first.
    pub fn iter(&self) -> impl Iterator<Item = (StatUnit, u64)> + '_ {
        self.values.iter().map(|(u, v)| (*u, *v))
    }
}

/// What an export is about.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "data")]
pub enum Payload {
    /// A single milestone card.
    Milestone(MilestonePayload),
    /// The "total existence" stat card.
    Stats(StatPayload),
}

impl Payload {
    /// Title used for filenames and headings.
    pub fn title(&self) -> &str {
        match self {
            Payload::Milestone(m) => &m.title,
            Payload::Stats(_) => "total existence",
        }
    }
}

/// Subject of the export, supplied by the host's profile store.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Profile {
    /// Display name.
    pub name: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Time of birth as `HH:MM`; empty means midnight.
    #[serde(default)]
    pub birth_time: String,
    /// Encoded avatar image (PNG/JPEG/...).
    #[serde(default, skip_serializing)]
    pub avatar: Option<Vec<u8>>,
    /// Encoded cover image used by backdrop templates.
    #[serde(default, skip_serializing)]
    pub cover: Option<Vec<u8>>,
    /// Preferred theme.
    #[serde(default)]
    pub theme: ThemeId,
}

impl Profile {
    /// Birth instant combining date and `HH:MM` time.
    pub fn birth_instant(&self) -> ExportResult<NaiveDateTime> {
        let t = self.birth_time.trim();
        let time = if t.is_empty() {
            NaiveTime::MIN
        } else {
            NaiveTime::parse_from_str(t, "%H:%M").map_err(|e| {
                ExportError::validation(format!("invalid birth time '{t}' (expected HH:MM): {e}"))
            })?
        };
        Ok(self.birth_date.and_time(time))
    }

    /// Initials shown when no avatar is available.
    pub fn initials(&self) -> String {
        let s: String = self
            .name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect();
        if s.is_empty() { "?".to_string() } else { s }
    }
}
