pub mod time;

pub use time::{format_clock, parse_date, start_of_day};
