//! Text shaping heuristics and display formatting shared by templates and the video engine.
//!
//! Layout runs before any font is loaded, so line breaking uses per-glyph advance estimates
//! instead of real metrics. Estimates err wide so wrapped text stays inside its box.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

const ELLIPSIS: char = '\u{2026}';

/// Approximate advance of `text` at `size` px.
pub fn estimate_width(text: &str, size: f64, weight: u16, letter_spacing: f64) -> f64 {
    let bold = if weight >= 700 { 1.07 } else { 1.0 };
    let mut em = 0.0;
    let mut n = 0usize;
    for c in text.chars() {
        n += 1;
        em += match c {
            ' ' => 0.28,
            'i' | 'l' | 'j' | '.' | ',' | '\'' | '!' | ':' | ';' | '|' => 0.3,
            'm' | 'w' | 'M' | 'W' | '@' => 0.86,
            c if c.is_ascii_digit() => 0.6,
            c if c.is_uppercase() => 0.68,
            _ => 0.55,
        };
    }
    em * size * bold + letter_spacing * n.saturating_sub(1) as f64
}

/// Greedy word wrap into at most `max_lines` lines, ending with an ellipsis when truncated.
///
/// Words wider than `max_width` are broken between characters.
pub fn wrap_text(
    text: &str,
    max_width: f64,
    size: f64,
    weight: u16,
    letter_spacing: f64,
    max_lines: usize,
) -> Vec<String> {
    let max_lines = max_lines.max(1);
    let fits = |s: &str| estimate_width(s, size, weight, letter_spacing) <= max_width;

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fits(word) {
            current = word.to_string();
            continue;
        }
        for c in word.chars() {
            let mut next = current.clone();
            next.push(c);
            if !current.is_empty() && !fits(&next) {
                lines.push(std::mem::take(&mut current));
                current.push(c);
            } else {
                current = next;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = with_ellipsis(last, &fits);
        }
    }
    lines
}

fn with_ellipsis(line: &str, fits: &dyn Fn(&str) -> bool) -> String {
    let mut chars: Vec<char> = line.chars().collect();
    loop {
        let base: String = chars.iter().collect::<String>().trim_end().to_string();
        let candidate = format!("{base}{ELLIPSIS}");
        if chars.is_empty() || fits(&candidate) {
            return candidate;
        }
        chars.pop();
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a float figure: integers get separators, fractions keep up to two decimals.
pub fn figure(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        let s = thousands(v.abs() as u64);
        if v < 0.0 { format!("-{s}") } else { s }
    } else {
        let s = format!("{v:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// English ordinal suffix for a day of month.
pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// `"October 2nd, 2017"`.
pub fn long_date(d: NaiveDate) -> String {
    format!(
        "{} {}{}, {}",
        d.format("%B"),
        d.day(),
        ordinal_suffix(d.day()),
        d.year()
    )
}

/// `"02 OCT 2017"`.
pub fn document_date(d: NaiveDate) -> String {
    d.format("%d %b %Y").to_string().to_uppercase()
}

/// `"2017.10.02"`.
pub fn numeric_date(d: NaiveDate) -> String {
    d.format("%Y.%m.%d").to_string()
}

/// Whole calendar days from `now` to `date`; positive when `date` is ahead.
pub fn relative_days(date: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (date.date() - now.date()).num_days()
}

/// `"in 12 days"`, `"12 days ago"`, `"today"`.
pub fn relative_caption(days: i64) -> String {
    let n = days.unsigned_abs();
    let unit = if n == 1 { "day" } else { "days" };
    match days {
        0 => "today".to_string(),
        d if d > 0 => format!("in {} {unit}", thousands(n)),
        _ => format!("{} {unit} ago", thousands(n)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/text.rs"]
mod tests;
