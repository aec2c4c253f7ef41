/// Proleptic Gregorian calendar arithmetic and supported-range checks
use chrono::{Datelike, NaiveDate};

use crate::error::{PanchangError, Result};

/// First supported Gregorian year
pub const MIN_YEAR: i32 = 1900;

/// Last supported Gregorian year
pub const MAX_YEAR: i32 = 2100;

/// Leap year: divisible by 4, except centuries not divisible by 400
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Reject years outside 1900..=2100
pub fn validate_year(year: i32) -> Result<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(PanchangError::OutOfRange {
            field: "year",
            value: year as i64,
            min: MIN_YEAR as i64,
            max: MAX_YEAR as i64,
        });
    }
    Ok(())
}

pub fn validate_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(PanchangError::invalid(
            "month",
            format!("{} is not between 1 and 12", month),
        ));
    }
    Ok(())
}

/// Reject dates whose year is outside the supported span
pub fn validate_date(date: NaiveDate) -> Result<()> {
    validate_year(date.year())
}

/// First supported calendar day
pub fn first_supported_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(MIN_YEAR, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Last supported calendar day
pub fn last_supported_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(MAX_YEAR, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Number of days in a month of the proleptic Gregorian calendar
pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    validate_month(month)?;
    let days = match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    };
    Ok(days)
}

/// Weekday of the 1st of the month, Sunday = 0 .. Saturday = 6
pub fn first_weekday(year: i32, month: u32) -> Result<u32> {
    validate_month(month)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        PanchangError::invalid("date", format!("{}-{:02}-01 does not exist", year, month))
    })?;
    Ok(first.weekday().num_days_from_sunday())
}

/// Every day of a Gregorian year, in order
pub fn days_of_year(year: i32) -> impl Iterator<Item = NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .into_iter()
        .flat_map(|first| first.iter_days())
        .take_while(move |d| d.year() == year)
}
