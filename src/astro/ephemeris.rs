//! Low-precision solar and lunar positions.
//!
//! Sun: Meeus, *Astronomical Algorithms*, ch. 25 (low accuracy, ~0.01 deg).
//! Moon: Meeus ch. 47 truncated to the largest longitude terms (~0.02 deg),
//! which keeps tithi/nakshatra boundaries within a few minutes of time.
//! Sidereal longitudes use the Lahiri (Chitrapaksha) ayanamsha anchored at
//! 23.853 deg for J2000.0 and advanced by general precession.
//!
//! Time argument is Julian centuries of UT since J2000.0; delta-T (about a
//! minute over the supported span) is ignored.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{PanchangError, Result};

/// Julian Day of 1970-01-01T00:00:00Z.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian Day of J2000.0.
const J2000_JD: f64 = 2_451_545.0;

/// Days per Julian century.
const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Lahiri ayanamsha at J2000.0 in degrees.
const LAHIRI_J2000_DEG: f64 = 23.853;

/// Epochs accepted by the series, 1800-01-01 .. 2200-12-31.
const EPHEMERIS_MIN_JD: f64 = 2_378_496.5;
const EPHEMERIS_MAX_JD: f64 = 2_524_958.5;

/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

/// Julian Day (UT) for an instant.
pub fn julian_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> f64 {
    let utc = instant.with_timezone(&Utc);
    UNIX_EPOCH_JD + utc.timestamp() as f64 / 86_400.0
        + utc.timestamp_subsec_nanos() as f64 / 86_400.0e9
}

/// Instant for a Julian Day (UT), rounded to the second.
pub fn instant_from_jd(jd: f64) -> Result<DateTime<Utc>> {
    let seconds = ((jd - UNIX_EPOCH_JD) * 86_400.0).round() as i64;
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| PanchangError::Computation(format!("Julian day {} is not representable", jd)))
}

/// Julian centuries since J2000.0, rejecting epochs outside the series span.
pub fn centuries_since_j2000(jd: f64) -> Result<f64> {
    if !(EPHEMERIS_MIN_JD..=EPHEMERIS_MAX_JD).contains(&jd) {
        return Err(PanchangError::Computation(format!(
            "Julian day {:.1} outside ephemeris span {:.1}..={:.1}",
            jd, EPHEMERIS_MIN_JD, EPHEMERIS_MAX_JD
        )));
    }
    Ok((jd - J2000_JD) / DAYS_PER_CENTURY)
}

fn sin_deg(deg: f64) -> f64 {
    deg.to_radians().sin()
}

fn cos_deg(deg: f64) -> f64 {
    deg.to_radians().cos()
}

/// Wrap an angle into [-180, 180).
pub fn normalize_pm180(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Longitude of the Moon's ascending node (mean), degrees.
fn mean_node(t: f64) -> f64 {
    125.04452 - 1934.136261 * t + 0.0020708 * t * t
}

/// Nutation in longitude, degrees (Meeus 22, four largest terms).
fn nutation_longitude(t: f64) -> f64 {
    let omega = mean_node(t);
    let l_sun = 280.4665 + 36_000.7698 * t;
    let l_moon = 218.3165 + 481_267.8813 * t;
    (-17.20 * sin_deg(omega) - 1.32 * sin_deg(2.0 * l_sun) - 0.23 * sin_deg(2.0 * l_moon)
        + 0.21 * sin_deg(2.0 * omega))
        / 3600.0
}

/// True obliquity of the ecliptic, degrees.
fn obliquity(t: f64) -> f64 {
    let eps0 = 23.439_291_1 - 0.013_004_2 * t - 1.64e-7 * t * t + 5.04e-7 * t * t * t;
    eps0 + 0.00256 * cos_deg(mean_node(t))
}

/// Solar quantities needed for rise/set and equation of time.
#[derive(Debug, Clone, Copy)]
pub struct SolarPosition {
    /// Apparent ecliptic longitude, degrees [0, 360)
    pub longitude: f64,
    /// Apparent declination, degrees
    pub declination: f64,
    /// Equation of time, minutes (apparent minus mean solar time)
    pub equation_of_time_min: f64,
}

/// Apparent solar position at `t` centuries since J2000.0.
pub fn sun_position(t: f64) -> SolarPosition {
    let l0 = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let m = 357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t;
    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * sin_deg(m)
        + (0.019_993 - 0.000_101 * t) * sin_deg(2.0 * m)
        + 0.000_289 * sin_deg(3.0 * m);
    let true_longitude = l0 + c;
    let omega = mean_node(t);
    let longitude = (true_longitude - 0.005_69 - 0.004_78 * sin_deg(omega)).rem_euclid(360.0);

    let eps = obliquity(t);
    let declination = (sin_deg(eps) * sin_deg(longitude)).asin().to_degrees();
    let right_ascension = (cos_deg(eps) * sin_deg(longitude))
        .atan2(cos_deg(longitude))
        .to_degrees();

    let eot_deg = l0 - 0.005_718_3 - right_ascension + nutation_longitude(t) * cos_deg(eps);

    SolarPosition {
        longitude,
        declination,
        equation_of_time_min: normalize_pm180(eot_deg) * 4.0,
    }
}

/// Apparent tropical longitude of the Sun, degrees [0, 360).
pub fn sun_longitude(t: f64) -> f64 {
    sun_position(t).longitude
}

/// Periodic longitude terms: (D, M, M', F multipliers, coefficient in 1e-6 deg).
const MOON_LONGITUDE_TERMS: [(i8, i8, i8, i8, f64); 34] = [
    (0, 0, 1, 0, 6_288_774.0),
    (2, 0, -1, 0, 1_274_027.0),
    (2, 0, 0, 0, 658_314.0),
    (0, 0, 2, 0, 213_618.0),
    (0, 1, 0, 0, -185_116.0),
    (0, 0, 0, 2, -114_332.0),
    (2, 0, -2, 0, 58_793.0),
    (2, -1, -1, 0, 57_066.0),
    (2, 0, 1, 0, 53_322.0),
    (2, -1, 0, 0, 45_758.0),
    (0, 1, -1, 0, -40_923.0),
    (1, 0, 0, 0, -34_720.0),
    (0, 1, 1, 0, -30_383.0),
    (2, 0, 0, -2, 15_327.0),
    (0, 0, 1, 2, -12_528.0),
    (0, 0, 1, -2, 10_980.0),
    (4, 0, -1, 0, 10_675.0),
    (0, 0, 3, 0, 10_034.0),
    (4, 0, -2, 0, 8_548.0),
    (2, 1, -1, 0, -7_888.0),
    (2, 1, 0, 0, -6_766.0),
    (1, 0, -1, 0, -5_163.0),
    (1, 1, 0, 0, 4_987.0),
    (2, -1, 1, 0, 4_036.0),
    (2, 0, 2, 0, 3_994.0),
    (4, 0, 0, 0, 3_861.0),
    (2, 0, -3, 0, 3_665.0),
    (0, 1, -2, 0, -2_689.0),
    (2, 0, -1, 2, -2_602.0),
    (2, -1, -2, 0, 2_390.0),
    (1, 0, 1, 0, -2_348.0),
    (2, -2, 0, 0, 2_236.0),
    (0, 1, 2, 0, -2_120.0),
    (0, 2, 0, 0, -2_069.0),
];

/// Apparent tropical longitude of the Moon, degrees [0, 360).
pub fn moon_longitude(t: f64) -> f64 {
    let t2 = t * t;
    let l_prime = 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2;
    let d = 297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2;
    let m = 357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2;
    let m_prime = 134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2;
    let f = 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2;
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t2;

    let mut sum_l: f64 = MOON_LONGITUDE_TERMS
        .iter()
        .map(|&(cd, cm, cmp, cf, coeff)| {
            let arg = cd as f64 * d + cm as f64 * m + cmp as f64 * m_prime + cf as f64 * f;
            let eccentricity = match cm.abs() {
                1 => e,
                2 => e * e,
                _ => 1.0,
            };
            coeff * eccentricity * sin_deg(arg)
        })
        .sum();

    // Venus, Jupiter and flattening corrections
    let a1 = 119.75 + 131.849 * t;
    let a2 = 53.09 + 479_264.290 * t;
    sum_l += 3958.0 * sin_deg(a1) + 1962.0 * sin_deg(l_prime - f) + 318.0 * sin_deg(a2);

    (l_prime + sum_l / 1.0e6 + nutation_longitude(t)).rem_euclid(360.0)
}

/// Lahiri ayanamsha, degrees.
pub fn lahiri_ayanamsha(t: f64) -> f64 {
    LAHIRI_J2000_DEG + (5_028.796_195 * t + 1.105_434_8 * t * t) / 3600.0
}

/// Sun and Moon longitudes at one instant.
#[derive(Debug, Clone, Copy)]
pub struct Longitudes {
    pub sun: f64,
    pub moon: f64,
    pub ayanamsha: f64,
}

impl Longitudes {
    pub fn at_jd(jd: f64) -> Result<Self> {
        let t = centuries_since_j2000(jd)?;
        Ok(Longitudes {
            sun: sun_longitude(t),
            moon: moon_longitude(t),
            ayanamsha: lahiri_ayanamsha(t),
        })
    }

    /// Moon minus Sun, degrees [0, 360); ayanamsha cancels.
    pub fn elongation(&self) -> f64 {
        (self.moon - self.sun).rem_euclid(360.0)
    }

    pub fn moon_sidereal(&self) -> f64 {
        (self.moon - self.ayanamsha).rem_euclid(360.0)
    }

    pub fn sun_sidereal(&self) -> f64 {
        (self.sun - self.ayanamsha).rem_euclid(360.0)
    }

    /// Sidereal Moon plus sidereal Sun, degrees [0, 360).
    pub fn yoga_sum(&self) -> f64 {
        (self.moon_sidereal() + self.sun_sidereal()).rem_euclid(360.0)
    }
}
