pub mod calendar;
pub mod sun;

pub use calendar::{days_in_month, first_weekday, is_leap_year, validate_date, validate_month, validate_year, MAX_YEAR, MIN_YEAR};
pub use sun::{abhijit_muhurat, gulika_kaal, rahu_kaal, sun_times, yamaghanta, SunTimes};
