use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Parses a contract date as the intake forms store it.
///
/// Accepted: `2024-03-01`, `2024-03-01 08:00:00`, RFC 3339 timestamps and
/// `01/03/2024` (day first).
pub fn parse_contract_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }

    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.date_naive());
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%d/%m/%Y") {
        return Ok(d);
    }

    Err(anyhow!("Could not parse date: {}", input))
}

/// Shifts a (year, month) pair by `offset` months.
pub fn month_offset((year, month): (i32, u32), offset: u32) -> (i32, u32) {
    let zero_based = year as i64 * 12 + (month as i64 - 1) + offset as i64;
    ((zero_based.div_euclid(12)) as i32, (zero_based.rem_euclid(12) + 1) as u32)
}

/// Number of months from `start` to `end`, both inclusive. `None` if `end` precedes `start`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> Option<u32> {
    let diff = (end.year() as i64 - start.year() as i64) * 12 + end.month() as i64
        - start.month() as i64;
    if diff < 0 {
        None
    } else {
        u32::try_from(diff + 1).ok()
    }
}
