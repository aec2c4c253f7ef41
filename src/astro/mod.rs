pub mod ephemeris;
pub mod lunation;
pub mod search;

pub use ephemeris::{julian_day, instant_from_jd, Longitudes, SolarPosition};
pub use lunation::LunarMonth;
pub use search::find_crossing;
