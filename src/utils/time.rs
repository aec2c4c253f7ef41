/// Clock-time helpers for local (time zone aware) panchang times
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::error::{PanchangError, Result};

/// Render a clock time as 24h "HH:MM" (seconds truncated)
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parse an ISO 8601 calendar date (YYYY-MM-DD)
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| PanchangError::invalid("date", format!("'{}' is not YYYY-MM-DD", value)))
}

/// First instant of a local calendar day.
///
/// Zones that skip midnight for DST resolve to the first valid instant after it.
pub fn start_of_day(date: NaiveDate, tz: &Tz) -> Result<DateTime<Tz>> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=2)
        .find_map(|hours| {
            tz.from_local_datetime(&(midnight + Duration::hours(hours)))
                .earliest()
        })
        .ok_or_else(|| PanchangError::Computation(format!("No local midnight for {} in {}", date, tz)))
}

/// Serde adapter writing `NaiveTime` as "HH:MM"
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_clock(*time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_format_clock_truncates_seconds() {
        let t = NaiveTime::from_hms_opt(7, 5, 59).unwrap();
        assert_eq!(format_clock(t), "07:05");
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("2024-03-25").unwrap(), NaiveDate::from_ymd_opt(2024, 3, 25).unwrap());
        let err = parse_date("25/03/2024").unwrap_err();
        assert_eq!(err.error_code(), "INPUT_001");
    }

    #[test]
    fn test_start_of_day_in_kolkata() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        let start = start_of_day(date, &chrono_tz::Asia::Kolkata).unwrap();
        assert_eq!(start.hour(), 0);
        assert_eq!(start.date_naive(), date);
    }
}
