pub mod types;
pub mod error;
pub mod astro;
pub mod time;
pub mod panchang;
pub mod config;
pub mod utils;

pub use types::*;
pub use error::{PanchangError, Result};
