//! Tithi, nakshatra, yoga, karana and lunar month for a local day.
//!
//! Attributes are those prevailing at local sunrise. End instants are found
//! by tabulating hourly from sunrise to the end of the civil day and
//! bisecting the bracketing hour; an element that does not change before
//! midnight has no end instant.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use tracing::debug;

use crate::astro::ephemeris::{instant_from_jd, julian_day, Longitudes};
use crate::astro::lunation::LunarMonth;
use crate::astro::search::find_crossing;
use crate::error::{PanchangError, Result};
use crate::panchang::names::{Bilingual, KaranaName, NakshatraName, Paksha, Rashi, TithiName, YogaName};
use crate::time::calendar::validate_date;
use crate::time::sun::sun_times;
use crate::types::{KaranaInfo, Location, NakshatraInfo, TithiInfo, YogaInfo};
use crate::utils::time::start_of_day;

/// Width of one tithi in degrees of elongation
pub const TITHI_SPAN_DEG: f64 = 12.0;

/// Width of one karana (half tithi)
pub const KARANA_SPAN_DEG: f64 = 6.0;

/// Width of one nakshatra or yoga
pub const NAKSHATRA_SPAN_DEG: f64 = 360.0 / 27.0;

/// Tabulation step for boundary searches (one hour)
const SEARCH_STEP_DAYS: f64 = 1.0 / 24.0;

/// Lunisolar attributes of one local day
#[derive(Debug, Clone, PartialEq)]
pub struct LunisolarAttributes {
    pub tithi: TithiInfo,
    /// Tithi counted through the whole month, 1..=30
    pub tithi_index: u8,
    pub nakshatra: NakshatraInfo,
    pub yoga: YogaInfo,
    pub karana: KaranaInfo,
    pub lunar_month: LunarMonth,
    /// Shalivahana Shaka year
    pub lunar_year: i32,
}

/// Segment index (0-based) of an angle divided into `count` equal spans
fn segment(angle_deg: f64, span_deg: f64, count: u8) -> u8 {
    ((angle_deg / span_deg).floor().max(0.0) as u8).min(count - 1)
}

/// Tithi index 1..=30 split into (paksha, 1..=15)
pub fn paksha_and_number(tithi_index: u8) -> (Paksha, u8) {
    if tithi_index <= 15 {
        (Paksha::Shukla, tithi_index)
    } else {
        (Paksha::Krishna, tithi_index - 15)
    }
}

/// Inverse of `paksha_and_number`
pub fn tithi_index_of(paksha: Paksha, number: u8) -> u8 {
    match paksha {
        Paksha::Shukla => number,
        Paksha::Krishna => number + 15,
    }
}

/// Short tithi description as printed in festival lists ("शु. नवमी", "अमावस्या")
pub fn tithi_description(paksha: Paksha, number: u8) -> String {
    match TithiName::from_ordinal(number, paksha) {
        Some(TithiName::Amavasya) => TithiName::Amavasya.marathi().to_string(),
        Some(name) => format!("{} {}", paksha.abbreviation(), name.marathi()),
        None => "-".to_string(),
    }
}

/// Marathi month name, prefixed "अधिक" for an intercalary month
pub fn month_label(month: &LunarMonth) -> String {
    if month.adhika {
        format!("अधिक {}", month.masa.marathi())
    } else {
        month.masa.marathi().to_string()
    }
}

/// Derives lunisolar attributes from solar and lunar longitudes
#[derive(Debug, Clone, Copy, Default)]
pub struct LunisolarCalculator;

impl LunisolarCalculator {
    pub fn new() -> Self {
        LunisolarCalculator
    }

    /// Attributes prevailing at sunrise of `date` at `location`
    pub fn attributes_for(&self, date: NaiveDate, location: &Location) -> Result<LunisolarAttributes> {
        validate_date(date)?;
        let sun = sun_times(date, location)?;
        let day_end = start_of_day(date + Duration::days(1), &location.timezone)?;
        self.attributes_at(&sun.sunrise, &day_end)
    }

    /// Attributes at `instant`, with end instants searched up to `window_end`
    pub fn attributes_at(&self, instant: &DateTime<Tz>, window_end: &DateTime<Tz>) -> Result<LunisolarAttributes> {
        let tz = instant.timezone();
        let jd = julian_day(instant);
        let end_jd = julian_day(window_end);
        let lon = Longitudes::at_jd(jd)?;

        let elongation = lon.elongation();
        let tithi_zero = segment(elongation, TITHI_SPAN_DEG, 30);
        let tithi_index = tithi_zero + 1;
        let (paksha, number) = paksha_and_number(tithi_index);
        let tithi_name = TithiName::from_ordinal(number, paksha)
            .ok_or_else(|| PanchangError::Computation(format!("Tithi ordinal {} out of range", number)))?;
        let tithi_end = self.boundary(
            |t| Ok(Longitudes::at_jd(t)?.elongation()),
            jd,
            end_jd,
            (tithi_zero as f64 + 1.0) * TITHI_SPAN_DEG,
            &tz,
        )?;

        let nakshatra_zero = segment(lon.moon_sidereal(), NAKSHATRA_SPAN_DEG, 27);
        let nakshatra_name = NakshatraName::from_ordinal(nakshatra_zero + 1)
            .ok_or_else(|| PanchangError::Computation(format!("Nakshatra {} out of range", nakshatra_zero)))?;
        let nakshatra_end = self.boundary(
            |t| Ok(Longitudes::at_jd(t)?.moon_sidereal()),
            jd,
            end_jd,
            (nakshatra_zero as f64 + 1.0) * NAKSHATRA_SPAN_DEG,
            &tz,
        )?;

        let yoga_zero = segment(lon.yoga_sum(), NAKSHATRA_SPAN_DEG, 27);
        let yoga_name = YogaName::from_ordinal(yoga_zero + 1)
            .ok_or_else(|| PanchangError::Computation(format!("Yoga {} out of range", yoga_zero)))?;
        let yoga_end = self.boundary(
            |t| Ok(Longitudes::at_jd(t)?.yoga_sum()),
            jd,
            end_jd,
            (yoga_zero as f64 + 1.0) * NAKSHATRA_SPAN_DEG,
            &tz,
        )?;

        let karana_name = KaranaName::from_half_tithi(segment(elongation, KARANA_SPAN_DEG, 60))
            .ok_or_else(|| PanchangError::Computation(format!("Karana for elongation {} out of range", elongation)))?;

        let lunar_month = LunarMonth::containing(jd)?;
        let lunar_year = lunar_month.shaka_year()?;

        debug!(
            "Attributes at {}: tithi {} nakshatra {} yoga {} masa {:?}{}",
            instant,
            tithi_index,
            nakshatra_zero + 1,
            yoga_zero + 1,
            lunar_month.masa,
            if lunar_month.adhika { " (adhika)" } else { "" }
        );

        Ok(LunisolarAttributes {
            tithi: TithiInfo {
                name: tithi_name,
                paksha,
                number,
                end_time: tithi_end,
            },
            tithi_index,
            nakshatra: NakshatraInfo {
                name: nakshatra_name,
                number: nakshatra_name.ordinal(),
                end_time: nakshatra_end,
            },
            yoga: YogaInfo {
                name: yoga_name,
                end_time: yoga_end,
            },
            karana: KaranaInfo { name: karana_name },
            lunar_month,
            lunar_year,
        })
    }

    /// Tithi index 1..=30 at an instant, without end-time search
    pub fn tithi_index_at(&self, instant: &DateTime<Tz>) -> Result<u8> {
        let lon = Longitudes::at_jd(julian_day(instant))?;
        Ok(segment(lon.elongation(), TITHI_SPAN_DEG, 30) + 1)
    }

    /// Sidereal sign of the Sun at an instant
    pub fn sun_rashi_at(&self, instant: &DateTime<Tz>) -> Result<Rashi> {
        let lon = Longitudes::at_jd(julian_day(instant))?;
        Ok(Rashi::from_longitude(lon.sun_sidereal()))
    }

    /// Lunar month containing an instant
    pub fn lunar_month_at(&self, instant: &DateTime<Tz>) -> Result<LunarMonth> {
        LunarMonth::containing(julian_day(instant))
    }

    fn boundary<F>(&self, f: F, start_jd: f64, end_jd: f64, target_deg: f64, tz: &Tz) -> Result<Option<DateTime<FixedOffset>>>
    where
        F: Fn(f64) -> Result<f64>,
    {
        let target = target_deg.rem_euclid(360.0);
        match find_crossing(f, start_jd, end_jd, SEARCH_STEP_DAYS, target)? {
            Some(jd) => Ok(Some(instant_from_jd(jd)?.with_timezone(tz).fixed_offset())),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panchang::names::Masa;
    use chrono::{Datelike, NaiveTime, Timelike};

    fn attrs(y: i32, m: u32, d: u32) -> LunisolarAttributes {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        LunisolarCalculator::new().attributes_for(date, &Location::temple()).unwrap()
    }

    #[test]
    fn test_holi_2024_is_phalguna_purnima() {
        let a = attrs(2024, 3, 25);
        assert_eq!(a.tithi.paksha, Paksha::Shukla);
        assert_eq!(a.tithi.number, 15);
        assert_eq!(a.tithi.name, TithiName::Purnima);
        assert_eq!(a.lunar_month.masa, Masa::Phalguna);
        assert_eq!(a.lunar_year, 1945);

        // Purnima ended around 12:29 IST
        let end = a.tithi.end_time.expect("purnima ends on the 25th");
        let minutes = end.hour() * 60 + end.minute();
        assert!((minutes as i64 - (12 * 60 + 29)).abs() <= 10, "ended {}", end);
    }

    #[test]
    fn test_gudi_padwa_2024() {
        let a = attrs(2024, 4, 9);
        assert_eq!(a.tithi_index, 1);
        assert_eq!(a.tithi.name, TithiName::Pratipada);
        assert_eq!(a.lunar_month.masa, Masa::Chaitra);
        assert_eq!(a.lunar_year, 1946);
    }

    #[test]
    fn test_ashadhi_ekadashi_2024() {
        let a = attrs(2024, 7, 17);
        assert_eq!(a.tithi.number, 11);
        assert_eq!(a.tithi.paksha, Paksha::Shukla);
        assert_eq!(a.lunar_month.masa, Masa::Ashadha);
    }

    #[test]
    fn test_ordinals_in_range_through_a_year() {
        let calc = LunisolarCalculator::new();
        let location = Location::temple();
        let mut date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        while date.year() == 2025 {
            let a = calc.attributes_for(date, &location).unwrap();
            assert!((1..=15).contains(&a.tithi.number));
            assert!((1..=30).contains(&a.tithi_index));
            assert!((1..=27).contains(&a.nakshatra.number));
            assert_eq!(a.tithi.paksha == Paksha::Krishna, a.tithi_index > 15);
            date += Duration::days(5);
        }
    }

    #[test]
    fn test_end_times_fall_between_sunrise_and_midnight() {
        let calc = LunisolarCalculator::new();
        let location = Location::temple();
        for day in 1..=28 {
            let date = NaiveDate::from_ymd_opt(2024, 2, day).unwrap();
            let sun = sun_times(date, &location).unwrap();
            let a = calc.attributes_for(date, &location).unwrap();
            for end in [a.tithi.end_time, a.nakshatra.end_time, a.yoga.end_time].into_iter().flatten() {
                assert_eq!(end.date_naive(), date);
                assert!(end.time() >= sun.sunrise_clock());
                assert!(end.time() <= NaiveTime::from_hms_opt(23, 59, 59).unwrap());
            }
        }
    }

    #[test]
    fn test_paksha_split() {
        assert_eq!(paksha_and_number(1), (Paksha::Shukla, 1));
        assert_eq!(paksha_and_number(15), (Paksha::Shukla, 15));
        assert_eq!(paksha_and_number(16), (Paksha::Krishna, 1));
        assert_eq!(paksha_and_number(30), (Paksha::Krishna, 15));
    }

    #[test]
    fn test_tithi_descriptions() {
        assert_eq!(tithi_description(Paksha::Shukla, 1), "शु. प्रतिपदा");
        assert_eq!(tithi_description(Paksha::Shukla, 15), "शु. पौर्णिमा");
        assert_eq!(tithi_description(Paksha::Krishna, 8), "कृ. अष्टमी");
        assert_eq!(tithi_description(Paksha::Krishna, 15), "अमावस्या");
        assert_eq!(tithi_index_of(Paksha::Krishna, 11), 26);
    }

    #[test]
    fn test_segment_clamps_full_circle() {
        assert_eq!(segment(360.0, TITHI_SPAN_DEG, 30), 29);
        assert_eq!(segment(0.0, TITHI_SPAN_DEG, 30), 0);
        assert_eq!(segment(359.99, NAKSHATRA_SPAN_DEG, 27), 26);
    }

    #[test]
    fn test_out_of_range_date_rejected() {
        let date = NaiveDate::from_ymd_opt(1899, 12, 31).unwrap();
        let err = LunisolarCalculator::new().attributes_for(date, &Location::temple()).unwrap_err();
        assert!(err.is_user_error());
    }
}
