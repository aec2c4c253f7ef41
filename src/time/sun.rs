//! Sunrise, sunset and the daylight windows derived from them.
//!
//! Rise/set uses the standard hour-angle formula for a geometric altitude of
//! -0.833 deg (refraction plus solar semidiameter), iterated three times so
//! the declination and equation of time are taken at the event itself
//! rather than at noon. Accurate to about a minute below the polar circles.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::astro::ephemeris::{centuries_since_j2000, julian_day, sun_position};
use crate::error::{PanchangError, Result};
use crate::panchang::names::Vaar;
use crate::time::calendar::validate_date;
use crate::types::{Location, TimeWindow};

/// Standard altitude of the Sun's centre at rise/set, degrees.
const SUN_ALTITUDE_AT_HORIZON_DEG: f64 = -0.8333;

const RISE_SET_ITERATIONS: usize = 3;

/// Rahu Kaal segment (of eight) per weekday, Sunday first
const RAHU_KAAL_SEGMENT: [u32; 7] = [7, 1, 6, 4, 5, 3, 2];

/// Yamaghanta segment (of eight) per weekday, Sunday first
const YAMAGHANTA_SEGMENT: [u32; 7] = [4, 3, 2, 1, 0, 6, 5];

/// Gulika Kaal segment (of eight) per weekday, Sunday first
const GULIKA_SEGMENT: [u32; 7] = [6, 5, 4, 3, 2, 1, 0];

/// Daylight is divided into fifteen muhurtas; Abhijit is the eighth
const MUHURTAS_PER_DAY: i64 = 15;
const ABHIJIT_MUHURTA: i64 = 7;

/// Sunrise and sunset of one local day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunTimes {
    pub sunrise: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
}

impl SunTimes {
    pub fn sunrise_clock(&self) -> NaiveTime {
        self.sunrise.time()
    }

    pub fn sunset_clock(&self) -> NaiveTime {
        self.sunset.time()
    }

    /// Length of daylight in whole seconds
    pub fn daylight_seconds(&self) -> i64 {
        (self.sunset - self.sunrise).num_seconds()
    }
}

#[derive(Debug, Clone, Copy)]
enum Event {
    Rise,
    Set,
}

/// Minutes after 0h UT of `date` at which the event occurs.
fn event_minutes_utc(date: NaiveDate, location: &Location, event: Event) -> Result<f64> {
    let midnight_ut = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let jd0 = julian_day(&midnight_ut);
    let phi = location.latitude.to_radians();
    let h0 = SUN_ALTITUDE_AT_HORIZON_DEG.to_radians();

    // First guess: 6h either side of Greenwich-corrected noon
    let mut minutes = 720.0 - 4.0 * location.longitude;
    minutes += match event {
        Event::Rise => -360.0,
        Event::Set => 360.0,
    };

    for _ in 0..RISE_SET_ITERATIONS {
        let t = centuries_since_j2000(jd0 + minutes / 1440.0)?;
        let sun = sun_position(t);
        let delta = sun.declination.to_radians();

        let cos_h = (h0.sin() - phi.sin() * delta.sin()) / (phi.cos() * delta.cos());
        if !(-1.0..=1.0).contains(&cos_h) {
            return Err(PanchangError::Computation(format!(
                "Sun does not {} on {} at latitude {:.4}",
                match event {
                    Event::Rise => "rise",
                    Event::Set => "set",
                },
                date,
                location.latitude
            )));
        }

        let hour_angle_deg = cos_h.acos().to_degrees();
        let noon = 720.0 - 4.0 * location.longitude - sun.equation_of_time_min;
        minutes = match event {
            Event::Rise => noon - 4.0 * hour_angle_deg,
            Event::Set => noon + 4.0 * hour_angle_deg,
        };
    }

    Ok(minutes)
}

fn event_instant(date: NaiveDate, location: &Location, event: Event) -> Result<DateTime<Tz>> {
    let minutes = event_minutes_utc(date, location, event)?;
    let midnight_ut = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let instant = midnight_ut + Duration::seconds((minutes * 60.0).round() as i64);
    Ok(instant.with_timezone(&location.timezone))
}

/// Sunrise and sunset for a local calendar date.
///
/// Fails with `OutOfRange` outside 1900..=2100 and with `Computation` when
/// the Sun stays above or below the horizon, or when the location's time
/// zone puts the events on a different civil date.
pub fn sun_times(date: NaiveDate, location: &Location) -> Result<SunTimes> {
    validate_date(date)?;

    let sunrise = event_instant(date, location, Event::Rise)?;
    let sunset = event_instant(date, location, Event::Set)?;

    if sunrise.date_naive() != date || sunset.date_naive() != date || sunset <= sunrise {
        return Err(PanchangError::Computation(format!(
            "Sunrise {} / sunset {} do not fall on {} in {}",
            sunrise, sunset, date, location.timezone
        )));
    }

    Ok(SunTimes { sunrise, sunset })
}

/// One of eight equal daylight segments, 0-indexed from sunrise.
///
/// Worked in whole seconds so the window always lies inside
/// [sunrise, sunset]; the last segment ends exactly at sunset.
pub fn daylight_segment(sun: &SunTimes, index: u32) -> TimeWindow {
    let index = index.min(7) as i64;
    let segment = sun.daylight_seconds() / 8;
    let start = sun.sunrise + Duration::seconds(segment * index);
    let end = if index == 7 {
        sun.sunset
    } else {
        start + Duration::seconds(segment)
    };
    TimeWindow {
        start: start.time(),
        end: end.time(),
    }
}

/// Rahu Kaal: weekday-selected eighth of daylight
pub fn rahu_kaal(sun: &SunTimes, vaar: Vaar) -> TimeWindow {
    daylight_segment(sun, RAHU_KAAL_SEGMENT[vaar.index() as usize])
}

pub fn yamaghanta(sun: &SunTimes, vaar: Vaar) -> TimeWindow {
    daylight_segment(sun, YAMAGHANTA_SEGMENT[vaar.index() as usize])
}

pub fn gulika_kaal(sun: &SunTimes, vaar: Vaar) -> TimeWindow {
    daylight_segment(sun, GULIKA_SEGMENT[vaar.index() as usize])
}

/// Abhijit muhurta, the midday muhurta; not observed on Wednesdays
pub fn abhijit_muhurat(sun: &SunTimes, vaar: Vaar) -> Option<TimeWindow> {
    if vaar == Vaar::Wednesday {
        return None;
    }
    let muhurta = sun.daylight_seconds() / MUHURTAS_PER_DAY;
    let start = sun.sunrise + Duration::seconds(muhurta * ABHIJIT_MUHURTA);
    Some(TimeWindow {
        start: start.time(),
        end: (start + Duration::seconds(muhurta)).time(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn minutes_of(t: NaiveTime) -> i64 {
        (t.hour() * 60 + t.minute()) as i64
    }

    #[test]
    fn test_mumbai_sunrise_spring() {
        // Mumbai, 2024-03-25: sunrise ~06:38, sunset ~18:50 IST
        let date = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        let sun = sun_times(date, &Location::temple()).unwrap();
        assert!((minutes_of(sun.sunrise_clock()) - (6 * 60 + 38)).abs() <= 4, "sunrise {}", sun.sunrise);
        assert!((minutes_of(sun.sunset_clock()) - (18 * 60 + 50)).abs() <= 4, "sunset {}", sun.sunset);
    }

    #[test]
    fn test_mumbai_sunrise_winter() {
        // Mumbai, 2024-12-21: sunrise ~07:07, sunset ~18:06 IST
        let date = NaiveDate::from_ymd_opt(2024, 12, 21).unwrap();
        let sun = sun_times(date, &Location::temple()).unwrap();
        assert!((minutes_of(sun.sunrise_clock()) - (7 * 60 + 7)).abs() <= 3, "sunrise {}", sun.sunrise);
        assert!((minutes_of(sun.sunset_clock()) - (18 * 60 + 6)).abs() <= 3, "sunset {}", sun.sunset);
    }

    #[test]
    fn test_out_of_range_date() {
        let date = NaiveDate::from_ymd_opt(2101, 1, 1).unwrap();
        let err = sun_times(date, &Location::temple()).unwrap_err();
        assert!(matches!(err, PanchangError::OutOfRange { .. }));
    }

    #[test]
    fn test_polar_night_is_computation_error() {
        let tromso = Location::new("Tromso", 69.65, 18.96, chrono_tz::Europe::Oslo).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 12, 21).unwrap();
        let err = sun_times(date, &tromso).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_rahu_kaal_segments_by_weekday() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        let sun = sun_times(date, &Location::temple()).unwrap();
        let eighth = sun.daylight_seconds() / 8;

        // Monday -> second segment
        let monday = rahu_kaal(&sun, Vaar::Monday);
        let expected_start = (sun.sunrise + Duration::seconds(eighth)).time();
        assert_eq!(monday.start, expected_start);

        // Sunday -> last segment ending at sunset
        let sunday = rahu_kaal(&sun, Vaar::Sunday);
        assert_eq!(sunday.end, sun.sunset_clock());
    }

    #[test]
    fn test_windows_within_daylight() {
        let location = Location::temple();
        for offset in 0..60 {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset * 6);
            let sun = sun_times(date, &location).unwrap();
            for vaar in [
                Vaar::Sunday,
                Vaar::Monday,
                Vaar::Tuesday,
                Vaar::Wednesday,
                Vaar::Thursday,
                Vaar::Friday,
                Vaar::Saturday,
            ] {
                for window in [rahu_kaal(&sun, vaar), yamaghanta(&sun, vaar), gulika_kaal(&sun, vaar)] {
                    assert!(window.start >= sun.sunrise_clock());
                    assert!(window.end <= sun.sunset_clock());
                    assert!(window.start < window.end);
                }
            }
        }
    }

    #[test]
    fn test_abhijit_skips_wednesday() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        let sun = sun_times(date, &Location::temple()).unwrap();
        assert!(abhijit_muhurat(&sun, Vaar::Wednesday).is_none());
        let window = abhijit_muhurat(&sun, Vaar::Monday).unwrap();
        // Straddles local solar noon (~12:44 IST in Mumbai)
        assert!(minutes_of(window.start) < 12 * 60 + 44 && minutes_of(window.end) > 12 * 60 + 44);
    }
}
