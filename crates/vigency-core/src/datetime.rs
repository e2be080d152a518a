//! Lenient calendar-date parsing for spreadsheet-sourced values.
//!
//! Everything is truncated to the calendar day: vigency is decided at day
//! granularity, so time-of-day never takes part in a comparison. A time part
//! is still checked for well-formedness so that garbage is reported as an
//! unparseable date instead of being silently accepted.
//!
//! Accepted forms:
//!
//! - `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY.MM.DD`, `YYYYMMDD`
//! - any of the above followed by `T` or a space and `hh:mm[:ss[.fff]]` or a
//!   12-hour `h:mm[:ss] AM|PM` clock, optionally suffixed (with or without a
//!   space) by `Z` or a `±hh:mm` offset
//! - `DD/MM/YYYY` or `MM/DD/YYYY` (per [`DateOrder`]), with `/`, `-` or `.`
//! - spreadsheet serial day numbers (days since 1899-12-30)

use chrono::{Duration, NaiveDate, NaiveTime};

use vigency_model::DateOrder;

/// Smallest serial accepted (1927-05-18); smaller integers are more likely
/// years or codes than spreadsheet dates.
const MIN_SERIAL: f64 = 10_000.0;
/// 9999-12-31 in spreadsheet serial days.
const MAX_SERIAL: f64 = 2_958_465.0;

/// Parse a date value, returning `None` when it cannot be interpreted.
pub fn parse_date(value: &str, order: DateOrder) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(date) = parse_serial(trimmed) {
        return Some(date);
    }

    let (date_part, time_part) = split_date_time(trimmed);
    if let Some(time) = time_part {
        if !is_valid_time(time) {
            return None;
        }
    }
    parse_year_first(date_part).or_else(|| parse_year_last(date_part, order))
}

/// Render a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn split_date_time(value: &str) -> (&str, Option<&str>) {
    match value.find(['T', ' ']) {
        Some(idx) => {
            let time = value[idx + 1..].trim();
            (&value[..idx], (!time.is_empty()).then_some(time))
        }
        None => (value, None),
    }
}

fn is_valid_time(value: &str) -> bool {
    let value = strip_zone(value);
    [
        "%H:%M:%S%.f",
        "%H:%M:%S",
        "%H:%M",
        "%I:%M:%S%.f %p",
        "%I:%M:%S %p",
        "%I:%M %p",
    ]
        .iter()
        .any(|format| NaiveTime::parse_from_str(value, format).is_ok())
}

fn strip_zone(value: &str) -> &str {
    let value = value.trim().trim_end_matches('Z').trim_end();
    // Offsets look like +03:00 or -0300 after the clock part.
    match value.rfind(['+', '-']) {
        Some(idx) if idx > 0 => value[..idx].trim_end(),
        _ => value,
    }
}

fn parse_year_first(value: &str) -> Option<NaiveDate> {
    if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(value, "%Y%m%d").ok();
    }
    // chrono's %Y accepts short years; require four digits up front.
    if value.find(['-', '/', '.']) != Some(4) {
        return None;
    }
    ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn parse_year_last(value: &str, order: DateOrder) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.split(['/', '-', '.']).collect();
    let [first, second, year] = parts.as_slice() else {
        return None;
    };
    if year.len() != 4 {
        return None;
    }
    let first: u32 = first.parse().ok()?;
    let second: u32 = second.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    let (day, month) = match order {
        DateOrder::DayFirst => (first, second),
        DateOrder::MonthFirst => (second, first),
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_serial(value: &str) -> Option<NaiveDate> {
    if !value.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let serial: f64 = value.parse().ok()?;
    if !(MIN_SERIAL..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}
