//! Spoken dates, times and numbers
//!
//! Meeting times arrive as free text ("tomorrow at 9am", "October 12, 2024,
//! at 10 AM"). This module turns them into `NaiveDateTime`s relative to a
//! caller-supplied "now", and extracts counts from phrases such as
//! "twenty five minutes".

use std::sync::LazyLock;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Weekday};
use regex::Regex;

use crate::{Error, Result};

/// Timestamp format used in persisted records
pub const RECORD_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Small number words accepted wherever a count is asked for
const SMALL_NUMBERS: &[(&str, i64)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

/// Number words understood by [`extract_number`]
const NUMBER_WORDS: &[(&str, u64)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

const MONTHS: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Words that may surround a date without changing it
const FILLERS: &[&str] = &[
    "at", "on", "the", "of", "by", "around", "about", "for", "and", "from", "this", "next",
];

const MONTH_PATTERN: &str = "(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)";

static TIME_12H: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").expect("valid regex")
});

static TIME_24H: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})\b").expect("valid regex"));

static TIME_BARE_HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bat\s+(\d{1,2})\b").expect("valid regex"));

static OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bin\s+(\d+|an?|one|two|three|four|five|six|seven|eight|nine|ten)\s+(minutes?|mins?|hours?|days?|weeks?)\b")
        .expect("valid regex")
});

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("valid regex"));

static SLASH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{2}|\d{4}))?\b").expect("valid regex")
});

static MONTH_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b{MONTH_PATTERN}\s+(\d{{1,2}})(?:st|nd|rd|th)?(?:\s+(\d{{4}}))?\b"
    ))
    .expect("valid regex")
});

static DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTH_PATTERN}(?:\s+(\d{{4}}))?\b"
    ))
    .expect("valid regex")
});

static WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:(next|this)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .expect("valid regex")
});

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Parse a count given as a numeral or one of the words "one".."ten"
///
/// Returns `None` for anything else, including numerals with extra words.
#[must_use]
pub fn parse_count(text: &str) -> Option<i64> {
    let text = text.trim().to_lowercase();
    if let Ok(n) = text.parse::<i64>() {
        return Some(n);
    }
    SMALL_NUMBERS
        .iter()
        .find(|(word, _)| *word == text)
        .map(|(_, n)| *n)
}

/// Extract the first number mentioned in a phrase
///
/// Digits win over words; "twenty five" sums adjacent number words.
#[must_use]
pub fn extract_number(text: &str) -> Option<u64> {
    if let Some(m) = DIGITS.find(text) {
        return m.as_str().parse().ok();
    }

    let lower = text.to_lowercase();
    let mut total: Option<u64> = None;
    for token in lower.split(|c: char| c.is_whitespace() || c == '-') {
        let value = NUMBER_WORDS
            .iter()
            .find(|(word, _)| *word == token)
            .map(|(_, n)| *n);
        match (value, total) {
            (Some(v), None) => total = Some(v),
            // "twenty five"
            (Some(v), Some(t)) if t >= 20 && t % 10 == 0 && v < 10 => total = Some(t + v),
            (Some(_) | None, Some(_)) => break,
            (None, None) => {}
        }
    }
    total
}

/// Parse a month given as 1-12, a number word, or a (possibly abbreviated) name
#[must_use]
pub fn parse_month(text: &str) -> Option<u32> {
    let lower = text.trim().to_lowercase();
    if let Some(month) = MONTHS
        .iter()
        .position(|name| lower.split_whitespace().any(|w| w.len() >= 3 && name.starts_with(w)))
    {
        return u32::try_from(month + 1).ok();
    }
    extract_number(&lower)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| (1..=12).contains(n))
}

/// English name of a month (1-12)
#[must_use]
pub fn month_name(month: u32) -> Option<&'static str> {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    NAMES.get(index).copied()
}

/// Render a month grid with Monday as the first weekday
///
/// ```text
///     October 2024
/// Mo Tu We Th Fr Sa Su
///     1  2  3  4  5  6
///  7  8  9 10 11 12 13
/// ```
#[must_use]
pub fn render_month(year: i32, month: u32) -> Option<String> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    let days = next.signed_duration_since(first).num_days();

    let title = format!("{} {year}", month_name(month)?);
    let mut out = format!("{title:^20}").trim_end().to_string();
    out.push('\n');
    out.push_str("Mo Tu We Th Fr Sa Su\n");

    let offset = i64::from(first.weekday().num_days_from_monday());
    let mut cells: Vec<String> = (0..offset).map(|_| "  ".to_string()).collect();
    cells.extend((1..=days).map(|d| format!("{d:>2}")));

    for week in cells.chunks(7) {
        out.push_str(week.join(" ").trim_end());
        out.push('\n');
    }

    Some(out)
}

/// Parse free-form date/time text relative to `now`
///
/// # Errors
///
/// Returns [`Error::Parse`] when the text names neither a date nor a time,
/// names an impossible one, or contains words that are not part of a date.
pub fn parse_datetime(text: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let fail = || Error::Parse(format!("could not understand date and time: {text:?}"));

    let mut rest = normalize(text);
    let mut date: Option<NaiveDate> = None;
    let mut time: Option<NaiveTime> = None;
    let mut instant: Option<NaiveDateTime> = None;
    let mut default_time = NaiveTime::MIN;

    // Relative offsets ("in 2 hours", "in three days")
    if let Some(caps) = OFFSET.captures(&rest) {
        let amount = match &caps[1] {
            "a" | "an" => 1,
            count => extract_number(count)
                .and_then(|n| i64::try_from(n).ok())
                .ok_or_else(fail)?,
        };
        let unit = caps.get(2).map_or("", |m| m.as_str());
        let span = caps.get(0).map(|m| m.range()).ok_or_else(fail)?;
        if unit.starts_with("min") {
            let delta = TimeDelta::try_minutes(amount).ok_or_else(fail)?;
            instant = Some(now.checked_add_signed(delta).ok_or_else(fail)?);
        } else if unit.starts_with("hour") {
            let delta = TimeDelta::try_hours(amount).ok_or_else(fail)?;
            instant = Some(now.checked_add_signed(delta).ok_or_else(fail)?);
        } else {
            let days = if unit.starts_with("week") {
                amount.checked_mul(7).ok_or_else(fail)?
            } else {
                amount
            };
            let delta = TimeDelta::try_days(days).ok_or_else(fail)?;
            date = Some(now.date().checked_add_signed(delta).ok_or_else(fail)?);
        }
        rest.replace_range(span, " ");
    }

    // Times
    if let Some(caps) = TIME_12H.captures(&rest) {
        let hour: u32 = caps[1].parse().map_err(|_| fail())?;
        let minute: u32 = caps.get(2).map_or(Ok(0), |m| m.as_str().parse()).map_err(|_| fail())?;
        if !(1..=12).contains(&hour) {
            return Err(fail());
        }
        let hour = match (&caps[3], hour) {
            ("am", 12) => 0,
            ("am", h) => h,
            ("pm", 12) => 12,
            (_, h) => h + 12,
        };
        time = Some(NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(fail)?);
        let span = caps.get(0).map(|m| m.range()).ok_or_else(fail)?;
        rest.replace_range(span, " ");
    } else if let Some(caps) = TIME_24H.captures(&rest) {
        let hour: u32 = caps[1].parse().map_err(|_| fail())?;
        let minute: u32 = caps[2].parse().map_err(|_| fail())?;
        time = Some(NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(fail)?);
        let span = caps.get(0).map(|m| m.range()).ok_or_else(fail)?;
        rest.replace_range(span, " ");
    } else if take_word(&mut rest, &["noon", "midday"]).is_some() {
        time = NaiveTime::from_hms_opt(12, 0, 0);
    } else if take_word(&mut rest, &["midnight"]).is_some() {
        time = Some(NaiveTime::MIN);
    } else if let Some(caps) = TIME_BARE_HOUR.captures(&rest) {
        let hour: u32 = caps[1].parse().map_err(|_| fail())?;
        time = Some(NaiveTime::from_hms_opt(hour, 0, 0).ok_or_else(fail)?);
        let span = caps.get(0).map(|m| m.range()).ok_or_else(fail)?;
        rest.replace_range(span, " ");
    }

    // Dates
    if date.is_none() {
        date = take_date(&mut rest, now, &mut default_time).map_err(|_| fail())?;
    }

    // Anything left over must be filler
    if rest
        .split_whitespace()
        .any(|word| !FILLERS.contains(&word))
    {
        return Err(fail());
    }

    if let Some(instant) = instant {
        if date.is_some() || time.is_some() {
            return Err(fail());
        }
        return Ok(instant);
    }

    if date.is_none() && time.is_none() {
        return Err(fail());
    }

    Ok(NaiveDateTime::new(
        date.unwrap_or_else(|| now.date()),
        time.unwrap_or(default_time),
    ))
}

/// Lowercase, unify "a.m."/"p.m." and drop punctuation that never matters
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace("a.m.", "am")
        .replace("p.m.", "pm")
        .replace("o'clock", " ")
        .replace("o’clock", " ")
        .chars()
        .map(|c| if matches!(c, ',' | '.' | '!' | '?' | ';') { ' ' } else { c })
        .collect()
}

/// Remove the first whole-word occurrence of any candidate
fn take_word<'a>(rest: &mut String, candidates: &[&'a str]) -> Option<&'a str> {
    for candidate in candidates {
        let found = rest
            .split_whitespace()
            .any(|w| w == *candidate);
        if found {
            let replaced = rest
                .split_whitespace()
                .map(|w| if w == *candidate { " " } else { w })
                .collect::<Vec<_>>()
                .join(" ");
            *rest = replaced;
            return Some(candidate);
        }
    }
    None
}

/// Find and remove one date expression
fn take_date(
    rest: &mut String,
    now: NaiveDateTime,
    default_time: &mut NaiveTime,
) -> std::result::Result<Option<NaiveDate>, ()> {
    let today = now.date();

    if let Some(caps) = ISO_DATE.captures(rest.as_str()) {
        let year: i32 = caps[1].parse().map_err(|_| ())?;
        let month: u32 = caps[2].parse().map_err(|_| ())?;
        let day: u32 = caps[3].parse().map_err(|_| ())?;
        let span = caps.get(0).ok_or(())?.range();
        rest.replace_range(span, " ");
        return NaiveDate::from_ymd_opt(year, month, day).map(Some).ok_or(());
    }

    if let Some(caps) = SLASH_DATE.captures(rest.as_str()) {
        let month: u32 = caps[1].parse().map_err(|_| ())?;
        let day: u32 = caps[2].parse().map_err(|_| ())?;
        let year = match caps.get(3) {
            Some(m) if m.as_str().len() == 2 => 2000 + m.as_str().parse::<i32>().map_err(|_| ())?,
            Some(m) => m.as_str().parse().map_err(|_| ())?,
            None => today.year(),
        };
        let span = caps.get(0).ok_or(())?.range();
        rest.replace_range(span, " ");
        return NaiveDate::from_ymd_opt(year, month, day).map(Some).ok_or(());
    }

    let named = MONTH_FIRST
        .captures(rest.as_str())
        .map(|caps| {
            (
                caps.get(0).map(|m| m.range()),
                caps[1].to_string(),
                caps[2].to_string(),
                caps.get(3).map(|m| m.as_str().to_string()),
            )
        })
        .or_else(|| {
            DAY_FIRST.captures(rest.as_str()).map(|caps| {
                (
                    caps.get(0).map(|m| m.range()),
                    caps[2].to_string(),
                    caps[1].to_string(),
                    caps.get(3).map(|m| m.as_str().to_string()),
                )
            })
        });
    if let Some((span, month, day, year)) = named {
        let month = parse_month(&month).ok_or(())?;
        let day: u32 = day.parse().map_err(|_| ())?;
        let year = match year {
            Some(y) => y.parse().map_err(|_| ())?,
            None => today.year(),
        };
        rest.replace_range(span.ok_or(())?, " ");
        return NaiveDate::from_ymd_opt(year, month, day).map(Some).ok_or(());
    }

    if rest.contains("day after tomorrow") {
        *rest = rest.replacen("day after tomorrow", " ", 1);
        return today.checked_add_days(Days::new(2)).map(Some).ok_or(());
    }
    if take_word(rest, &["tomorrow"]).is_some() {
        return today.checked_add_days(Days::new(1)).map(Some).ok_or(());
    }
    if take_word(rest, &["today"]).is_some() {
        return Ok(Some(today));
    }
    if take_word(rest, &["tonight"]).is_some() {
        *default_time = NaiveTime::from_hms_opt(20, 0, 0).ok_or(())?;
        return Ok(Some(today));
    }

    if let Some(caps) = WEEKDAY.captures(rest.as_str()) {
        let target: Weekday = caps[2].parse().map_err(|_| ())?;
        let strictly_after = caps.get(1).is_some_and(|m| m.as_str() == "next");
        let span = caps.get(0).ok_or(())?.range();
        rest.replace_range(span, " ");

        let mut ahead = (i64::from(target.num_days_from_monday())
            - i64::from(today.weekday().num_days_from_monday()))
        .rem_euclid(7);
        if ahead == 0 && strictly_after {
            ahead = 7;
        }
        return today.checked_add_days(Days::new(ahead.unsigned_abs())).map(Some).ok_or(());
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Friday 2024-10-11 15:00
    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 11)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_relative_day_with_time() {
        assert_eq!(
            parse_datetime("tomorrow at 9am", now()).unwrap(),
            at(2024, 10, 12, 9, 0)
        );
        assert_eq!(
            parse_datetime("Tomorrow at 9:30 p.m.", now()).unwrap(),
            at(2024, 10, 12, 21, 30)
        );
        assert_eq!(
            parse_datetime("day after tomorrow at noon", now()).unwrap(),
            at(2024, 10, 13, 12, 0)
        );
    }

    #[test]
    fn test_month_name_dates() {
        assert_eq!(
            parse_datetime("October 12, 2024, at 10 AM", now()).unwrap(),
            at(2024, 10, 12, 10, 0)
        );
        assert_eq!(
            parse_datetime("12th of december at 14:15", now()).unwrap(),
            at(2024, 12, 12, 14, 15)
        );
        assert_eq!(
            parse_datetime("nov 3", now()).unwrap(),
            at(2024, 11, 3, 0, 0)
        );
    }

    #[test]
    fn test_numeric_dates() {
        assert_eq!(
            parse_datetime("2024-12-25 08:00", now()).unwrap(),
            at(2024, 12, 25, 8, 0)
        );
        assert_eq!(
            parse_datetime("10/31/2024 at 6 pm", now()).unwrap(),
            at(2024, 10, 31, 18, 0)
        );
    }

    #[test]
    fn test_weekdays() {
        // Today is Friday
        assert_eq!(
            parse_datetime("friday at 5pm", now()).unwrap(),
            at(2024, 10, 11, 17, 0)
        );
        assert_eq!(
            parse_datetime("next friday at 5pm", now()).unwrap(),
            at(2024, 10, 18, 17, 0)
        );
        assert_eq!(
            parse_datetime("monday at 14:30", now()).unwrap(),
            at(2024, 10, 14, 14, 30)
        );
    }

    #[test]
    fn test_offsets_and_time_only() {
        assert_eq!(
            parse_datetime("in 2 hours", now()).unwrap(),
            at(2024, 10, 11, 17, 0)
        );
        assert_eq!(
            parse_datetime("in three days at 8 am", now()).unwrap(),
            at(2024, 10, 14, 8, 0)
        );
        assert_eq!(
            parse_datetime("at 9", now()).unwrap(),
            at(2024, 10, 11, 9, 0)
        );
        assert_eq!(
            parse_datetime("tonight", now()).unwrap(),
            at(2024, 10, 11, 20, 0)
        );
    }

    #[test]
    fn test_rejects_nonsense() {
        assert!(parse_datetime("whenever you like", now()).is_err());
        assert!(parse_datetime("", now()).is_err());
        assert!(parse_datetime("tomorrow at 25:00", now()).is_err());
        assert!(parse_datetime("february 30", now()).is_err());
        assert!(parse_datetime("13 pm", now()).is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("3"), Some(3));
        assert_eq!(parse_count(" Seven "), Some(7));
        assert_eq!(parse_count("-2"), Some(-2));
        assert_eq!(parse_count("a few"), None);
        assert_eq!(parse_count("eleven"), None);
    }

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number("25 minutes please"), Some(25));
        assert_eq!(extract_number("twenty five minutes"), Some(25));
        assert_eq!(extract_number("about ten"), Some(10));
        assert_eq!(extract_number("no idea"), None);
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("october"), Some(10));
        assert_eq!(parse_month("Sept"), Some(9));
        assert_eq!(parse_month("3"), Some(3));
        assert_eq!(parse_month("13"), None);
    }

    #[test]
    fn test_render_month() {
        let grid = render_month(2024, 10).unwrap();
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines[0], "    October 2024");
        assert_eq!(lines[1], "Mo Tu We Th Fr Sa Su");
        assert_eq!(lines[2], "    1  2  3  4  5  6");
        assert_eq!(lines[3], " 7  8  9 10 11 12 13");
        assert_eq!(lines.last().copied(), Some("28 29 30 31"));
        assert!(render_month(2024, 13).is_none());
    }

    #[test]
    fn test_huge_offsets_are_rejected() {
        for text in [
            "in 99999999999 days",
            "in 999999999999999999 minutes",
            "in 9999999999999 hours",
            "in 9223372036854775807 weeks",
        ] {
            assert!(
                matches!(parse_datetime(text, now()), Err(Error::Parse(_))),
                "{text}"
            );
        }
    }
}
