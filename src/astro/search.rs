/// Monotonic boundary search over angular quantities
use super::ephemeris::normalize_pm180;
use crate::error::Result;

/// Bisection iterations after bracketing; one hour / 2^30 is well below a second.
const BISECTION_STEPS: usize = 30;

/// Find the first instant in `(start_jd, end_jd]` where the increasing angle
/// `f` reaches `target_deg`.
///
/// The interval is tabulated every `step_days` and the bracketing step is
/// bisected. Returns `None` when the angle does not reach the target inside
/// the interval. `f` must be monotonic non-decreasing modulo 360 over the
/// interval (true for lunar longitude, elongation and the yoga sum).
pub fn find_crossing<F>(f: F, start_jd: f64, end_jd: f64, step_days: f64, target_deg: f64) -> Result<Option<f64>>
where
    F: Fn(f64) -> Result<f64>,
{
    let offset = |jd: f64| -> Result<f64> { Ok(normalize_pm180(f(jd)? - target_deg)) };

    let mut lo = start_jd;
    let mut lo_val = offset(lo)?;
    if lo_val >= 0.0 {
        // Already at or past the target: the boundary is not ahead of us
        return Ok(None);
    }

    while lo < end_jd {
        let hi = (lo + step_days).min(end_jd);
        let hi_val = offset(hi)?;

        // A jump across +-180 means we wrapped, not crossed
        if hi_val >= 0.0 && hi_val - lo_val < 180.0 {
            return bisect(&offset, lo, hi).map(Some);
        }

        lo = hi;
        lo_val = hi_val;
    }

    Ok(None)
}

fn bisect<F>(offset: &F, mut lo: f64, mut hi: f64) -> Result<f64>
where
    F: Fn(f64) -> Result<f64>,
{
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if offset(mid)? < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_angle_crossing() {
        // 12 deg/day starting at 100 deg: reaches 108 after 2/3 day
        let f = |jd: f64| Ok(100.0 + 12.0 * jd);
        let hit = find_crossing(f, 0.0, 1.0, 1.0 / 24.0, 108.0).unwrap().unwrap();
        assert!((hit - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_crossing_in_window() {
        let f = |jd: f64| Ok(100.0 + 12.0 * jd);
        assert!(find_crossing(f, 0.0, 0.5, 1.0 / 24.0, 108.0).unwrap().is_none());
    }

    #[test]
    fn test_crossing_through_zero() {
        // 354 deg rising to 360/0 after half a day
        let f = |jd: f64| Ok((354.0 + 12.0 * jd).rem_euclid(360.0));
        let hit = find_crossing(f, 0.0, 1.0, 1.0 / 24.0, 0.0).unwrap().unwrap();
        assert!((hit - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_target_behind_start_is_none() {
        let f = |jd: f64| Ok(100.0 + 12.0 * jd);
        assert!(find_crossing(f, 0.0, 1.0, 1.0 / 24.0, 96.0).unwrap().is_none());
    }
}
