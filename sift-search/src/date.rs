//! Date normalisation to canonical `YYYY-MM-DD`.
//!
//! Providers and pages report dates as relative phrases ("3 hours ago"),
//! ISO strings, US numeric dates, or prose ("Jan 5, 2024"). [`normalize`]
//! maps all of these onto one canonical form, trying an ordered rule table
//! and returning the first hit:
//!
//! 1. relative phrases: hours, `yesterday`, days, weeks, months (30 days)
//! 2. an embedded ISO `YYYY-MM-DD`, returned verbatim
//! 3. `M/D/YYYY`
//! 4. month name followed by `D, YYYY`
//! 5. any `20xx` year, as `20xx-01-01`
//!
//! Nothing matched means an unknown date: the empty string.

use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta};
use regex::Regex;
use std::sync::LazyLock;

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

static HOURS: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)(\d+)\s*hour"));
static DAYS: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)(\d+)\s*day"));
static WEEKS: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)(\d+)\s*week"));
static MONTHS: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)(\d+)\s*month"));
static ISO: LazyLock<Regex> = LazyLock::new(|| compile(r"\d{4}-\d{2}-\d{2}"));
static US_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(\d{1,2})/(\d{1,2})/(\d{4})"));
static DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d{1,2}),?\s*(\d{4})"));
static YEAR: LazyLock<Regex> = LazyLock::new(|| compile(r"20\d{2}"));

/// Full names first, then three-letter abbreviations ("may" has none).
const MONTH_NAMES: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

type DateRule = (&'static str, fn(&str, NaiveDateTime) -> Option<String>);

/// Normalisation rules in priority order.
const RULES: &[DateRule] = &[
    ("hours_ago", hours_ago),
    ("yesterday", yesterday),
    ("days_ago", days_ago_phrase),
    ("weeks_ago", weeks_ago),
    ("months_ago", months_ago),
    ("iso", embedded_iso),
    ("us_numeric", us_numeric),
    ("month_name", month_name),
    ("year_only", year_only),
];

/// Normalise `raw` against the local process clock.
///
/// Returns `YYYY-MM-DD`, or an empty string when the date is unknown.
/// Never panics, whatever the input.
pub fn normalize(raw: &str) -> String {
    normalize_at(raw, Local::now().naive_local())
}

/// Normalise `raw`, resolving relative phrases against `now`.
pub fn normalize_at(raw: &str, now: NaiveDateTime) -> String {
    let input = raw.trim();
    if input.is_empty() {
        return String::new();
    }

    RULES
        .iter()
        .find_map(|(name, rule)| {
            let hit = rule(input, now)?;
            tracing::trace!(rule = name, input, date = %hit, "date normalised");
            Some(hit)
        })
        .unwrap_or_default()
}

/// Whole days between the normalised date and today, or `None` if the
/// date is unknown.
pub fn days_ago(raw: &str) -> Option<i64> {
    days_ago_at(raw, Local::now().naive_local())
}

/// [`days_ago`] against an explicit clock.
pub fn days_ago_at(raw: &str, now: NaiveDateTime) -> Option<i64> {
    let normalized = normalize_at(raw, now);
    let date = NaiveDate::parse_from_str(&normalized, CANONICAL_FORMAT).ok()?;
    Some((now.date() - date).num_days())
}

fn compile(pattern: &str) -> Regex {
    // Patterns are literals covered by tests.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid date pattern {pattern}: {e}"))
}

fn format(date: NaiveDateTime) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

fn captured_count(pattern: &Regex, input: &str) -> Option<i64> {
    pattern.captures(input)?.get(1)?.as_str().parse().ok()
}

fn subtract(now: NaiveDateTime, delta: Option<TimeDelta>) -> Option<String> {
    now.checked_sub_signed(delta?).map(format)
}

fn hours_ago(input: &str, now: NaiveDateTime) -> Option<String> {
    let hours = captured_count(&HOURS, input)?;
    subtract(now, TimeDelta::try_hours(hours))
}

fn yesterday(input: &str, now: NaiveDateTime) -> Option<String> {
    if !input.to_lowercase().contains("yesterday") {
        return None;
    }
    subtract(now, TimeDelta::try_days(1))
}

fn days_ago_phrase(input: &str, now: NaiveDateTime) -> Option<String> {
    let days = captured_count(&DAYS, input)?;
    subtract(now, TimeDelta::try_days(days))
}

fn weeks_ago(input: &str, now: NaiveDateTime) -> Option<String> {
    let weeks = captured_count(&WEEKS, input)?;
    subtract(now, TimeDelta::try_weeks(weeks))
}

fn months_ago(input: &str, now: NaiveDateTime) -> Option<String> {
    let months = captured_count(&MONTHS, input)?;
    subtract(now, months.checked_mul(30).and_then(TimeDelta::try_days))
}

fn embedded_iso(input: &str, _: NaiveDateTime) -> Option<String> {
    ISO.find(input).map(|m| m.as_str().to_owned())
}

fn us_numeric(input: &str, _: NaiveDateTime) -> Option<String> {
    let caps = US_NUMERIC.captures(input)?;
    let month = caps.get(1)?.as_str().parse().ok()?;
    let day = caps.get(2)?.as_str().parse().ok()?;
    let year = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format(CANONICAL_FORMAT).to_string())
}

fn month_name(input: &str, _: NaiveDateTime) -> Option<String> {
    let lower = input.to_lowercase();
    MONTH_NAMES
        .iter()
        .filter(|(name, _)| lower.contains(name))
        .find_map(|(_, month)| {
            let caps = DAY_YEAR.captures(input)?;
            let day = caps.get(1)?.as_str().parse().ok()?;
            let year = caps.get(2)?.as_str().parse().ok()?;
            NaiveDate::from_ymd_opt(year, *month, day)
        })
        .map(|d| d.format(CANONICAL_FORMAT).to_string())
}

fn year_only(input: &str, _: NaiveDateTime) -> Option<String> {
    YEAR.find(input).map(|m| format!("{}-01-01", m.as_str()))
}
