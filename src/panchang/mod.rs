pub mod builder;
pub mod calculator;
pub mod festivals;
pub mod grid;
pub mod names;
pub mod service;

pub use builder::PanchangRecordBuilder;
pub use calculator::{LunisolarAttributes, LunisolarCalculator};
pub use festivals::{Adjustment, FestivalRegistry, FestivalRule, FestivalRules, ObservanceTime, Trigger};
pub use grid::MonthGridAssembler;
pub use names::{Bilingual, KaranaName, Masa, NakshatraName, Paksha, Rashi, TithiName, Vaar, YogaName};
pub use service::{Clock, FixedClock, NameEntry, PanchangQueryService, SystemClock};
