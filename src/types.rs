/// Core type definitions for the panchang engine
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{PanchangError, Result};
use crate::panchang::names::{marathi_label, KaranaName, Masa, NakshatraName, Paksha, TithiName, Vaar, YogaName};
use crate::utils::time::hhmm;

/// Default observer: the temple's coordinates in Maharashtra
pub const TEMPLE_NAME: &str = "Dongarshelsoki, Maharashtra";
pub const TEMPLE_LATITUDE: f64 = 19.0760;
pub const TEMPLE_LONGITUDE: f64 = 72.8777;
pub const TEMPLE_TIMEZONE: &str = "Asia/Kolkata";

/// Geographic observer location with its civil time zone
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Tz,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, timezone: Tz) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(PanchangError::invalid(
                "latitude",
                format!("{} is not between -90 and 90", latitude),
            ));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(PanchangError::invalid(
                "longitude",
                format!("{} is not between -180 and 180", longitude),
            ));
        }
        Ok(Location {
            name: name.into(),
            latitude,
            longitude,
            timezone,
        })
    }

    /// The temple location used when the caller supplies none
    pub fn temple() -> Self {
        Location {
            name: TEMPLE_NAME.to_string(),
            latitude: TEMPLE_LATITUDE,
            longitude: TEMPLE_LONGITUDE,
            timezone: chrono_tz::Asia::Kolkata,
        }
    }
}

impl TryFrom<&LocationConfig> for Location {
    type Error = PanchangError;

    fn try_from(config: &LocationConfig) -> Result<Self> {
        let timezone: Tz = config.timezone.parse().map_err(|e| {
            PanchangError::invalid("timezone", format!("'{}': {}", config.timezone, e))
        })?;
        Location::new(config.name.clone(), config.latitude, config.longitude, timezone)
    }
}

/// A local clock-time window within one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    #[serde(serialize_with = "hhmm::serialize")]
    pub start: NaiveTime,
    #[serde(serialize_with = "hhmm::serialize")]
    pub end: NaiveTime,
}

/// Tithi prevailing at sunrise
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TithiInfo {
    #[serde(serialize_with = "marathi_label")]
    pub name: TithiName,
    #[serde(serialize_with = "marathi_label")]
    pub paksha: Paksha,
    /// 1..=15 within the paksha
    pub number: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<FixedOffset>>,
}

/// Nakshatra of the Moon at sunrise
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NakshatraInfo {
    #[serde(serialize_with = "marathi_label")]
    pub name: NakshatraName,
    /// 1..=27
    pub number: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YogaInfo {
    #[serde(serialize_with = "marathi_label")]
    pub name: YogaName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KaranaInfo {
    #[serde(serialize_with = "marathi_label")]
    pub name: KaranaName,
}

/// A festival observed on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Festival {
    pub date: NaiveDate,
    pub name: String,
    pub english_name: String,
    pub marathi_month: String,
    /// Tithi description such as "शु. प्रतिपदा", "-" for solar festivals
    pub tithi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The complete almanac entry for one calendar date
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanchangRecord {
    pub date: NaiveDate,
    #[serde(skip)]
    pub vaar: Vaar,
    pub weekday: &'static str,
    pub weekday_english: &'static str,

    #[serde(skip)]
    pub masa: Masa,
    pub marathi_month: String,
    pub marathi_year: i32,
    pub is_adhik_maas: bool,

    pub tithi: TithiInfo,
    pub nakshatra: NakshatraInfo,
    pub yoga: YogaInfo,
    pub karana: KaranaInfo,

    #[serde(serialize_with = "hhmm::serialize")]
    pub sunrise: NaiveTime,
    #[serde(serialize_with = "hhmm::serialize")]
    pub sunset: NaiveTime,

    pub rahu_kaal: TimeWindow,
    pub yamaghanta: TimeWindow,
    pub gulika_kaal: TimeWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abhijit_muhurat: Option<TimeWindow>,

    pub is_ekadashi: bool,
    pub is_purnima: bool,
    pub is_amavasya: bool,
    pub is_sankashti_chaturthi: bool,
    pub is_vinayaka_chaturthi: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub festival: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub festival_english: Option<String>,
}

/// One populated day of a month grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayEntry {
    pub day: u32,
    pub record: PanchangRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub festival: Option<Festival>,
}

/// A month grid cell; leading blanks serialize as `null`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DayCell {
    Blank,
    Day(Box<DayEntry>),
}

impl DayCell {
    pub fn entry(&self) -> Option<&DayEntry> {
        match self {
            DayCell::Blank => None,
            DayCell::Day(entry) => Some(entry.as_ref()),
        }
    }
}

/// Calendar-month view: leading blanks then one cell per day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Lunar month name(s) spanned by this Gregorian month
    pub marathi_month: String,
    pub leading_blanks: u32,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn days(&self) -> impl Iterator<Item = &DayEntry> {
        self.cells.iter().filter_map(DayCell::entry)
    }
}

fn default_scan_days() -> u32 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Observer location as written in configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        LocationConfig {
            name: TEMPLE_NAME.to_string(),
            latitude: TEMPLE_LATITUDE,
            longitude: TEMPLE_LONGITUDE,
            timezone: TEMPLE_TIMEZONE.to_string(),
        }
    }
}

/// Configuration for the panchang service
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub location: LocationConfig,

    /// Safety cap for the forward Ekadashi scan, in days
    #[serde(default = "default_scan_days")]
    pub ekadashi_scan_days: u32,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional TOML file replacing the built-in festival rules
    #[serde(default)]
    pub festival_rules_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            location: LocationConfig::default(),
            ekadashi_scan_days: default_scan_days(),
            log_level: default_log_level(),
            festival_rules_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_validation() {
        assert!(Location::new("x", 91.0, 0.0, chrono_tz::UTC).is_err());
        assert!(Location::new("x", 0.0, -181.0, chrono_tz::UTC).is_err());
        assert!(Location::new("x", 18.52, 73.85, chrono_tz::Asia::Kolkata).is_ok());
    }

    #[test]
    fn test_location_from_config_rejects_unknown_zone() {
        let mut config = LocationConfig::default();
        config.timezone = "Asia/Atlantis".to_string();
        let err = Location::try_from(&config).unwrap_err();
        assert!(matches!(err, PanchangError::InvalidInput { field: "timezone", .. }));

        let temple = Location::try_from(&LocationConfig::default()).unwrap();
        assert_eq!(temple, Location::temple());
    }

    #[test]
    fn test_blank_cell_serializes_as_null() {
        assert_eq!(serde_json::to_string(&DayCell::Blank).unwrap(), "null");
    }

    #[test]
    fn test_time_window_serializes_hhmm() {
        let window = TimeWindow {
            start: NaiveTime::from_hms_opt(7, 30, 12).unwrap(),
            end: NaiveTime::from_hms_opt(9, 1, 0).unwrap(),
        };
        assert_eq!(
            serde_json::to_string(&window).unwrap(),
            r#"{"start":"07:30","end":"09:01"}"#
        );
    }
}
