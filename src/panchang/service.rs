/// Query facade over record building, month grids and festivals
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{PanchangError, Result};
use crate::panchang::builder::PanchangRecordBuilder;
use crate::panchang::festivals::FestivalRegistry;
use crate::panchang::grid::MonthGridAssembler;
use crate::panchang::names::{Bilingual, Masa, NakshatraName, Paksha, TithiName};
use crate::time::calendar::{last_supported_day, validate_date};
use crate::types::{Config, Festival, Location, MonthGrid, PanchangRecord};

/// Source of the wall-clock "today"
pub trait Clock: Send + Sync {
    fn today(&self, location: &Location) -> NaiveDate;
}

/// Current date in the location's time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self, location: &Location) -> NaiveDate {
        Utc::now().with_timezone(&location.timezone).date_naive()
    }
}

/// Always reports the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self, _location: &Location) -> NaiveDate {
        self.0
    }
}

/// A bilingual listing entry for reference tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameEntry {
    pub number: u8,
    pub marathi: &'static str,
    pub english: &'static str,
}

impl NameEntry {
    fn of<T: Bilingual>(number: usize, label: &T) -> Self {
        NameEntry {
            number: number as u8,
            marathi: label.marathi(),
            english: label.english(),
        }
    }
}

pub struct PanchangQueryService {
    builder: Arc<PanchangRecordBuilder>,
    grid: MonthGridAssembler,
    festivals: Arc<FestivalRegistry>,
    clock: Box<dyn Clock>,
    ekadashi_scan_days: u32,
}

impl PanchangQueryService {
    pub fn new(festivals: Arc<FestivalRegistry>, clock: Box<dyn Clock>, ekadashi_scan_days: u32) -> Self {
        let builder = Arc::new(PanchangRecordBuilder::new(festivals.clone()));
        PanchangQueryService {
            grid: MonthGridAssembler::new(builder.clone()),
            builder,
            festivals,
            clock,
            ekadashi_scan_days,
        }
    }

    /// Service wired from configuration, using the system clock
    pub fn from_config(config: &Config) -> Result<Self> {
        let location = Location::try_from(&config.location)?;
        let registry = FestivalRegistry::maharashtra_at(location)?;
        if let Some(path) = &config.festival_rules_path {
            registry.load_rules(path)?;
        }
        Ok(Self::new(Arc::new(registry), Box::new(SystemClock), config.ekadashi_scan_days))
    }

    pub fn festivals(&self) -> &Arc<FestivalRegistry> {
        &self.festivals
    }

    /// The clock's current date at a location
    pub fn today_date(&self, location: &Location) -> NaiveDate {
        self.clock.today(location)
    }

    pub fn today(&self, location: &Location) -> Result<PanchangRecord> {
        self.by_date(self.today_date(location), location)
    }

    pub fn by_date(&self, date: NaiveDate, location: &Location) -> Result<PanchangRecord> {
        self.builder.build(date, location)
    }

    pub fn by_month(&self, year: i32, month: u32, location: &Location) -> Result<MonthGrid> {
        self.grid.assemble(year, month, location)
    }

    /// Festivals of a year; a year the rule table never matches is `NotFound`
    pub fn festivals_by_year(&self, year: i32) -> Result<Arc<[Festival]>> {
        let festivals = self.festivals.festivals_for_year(year)?;
        if festivals.is_empty() {
            return Err(PanchangError::NotFound(format!("no festival rules matched in {}", year)));
        }
        Ok(festivals)
    }

    /// The next `count` Ekadashi records on or after `from`.
    ///
    /// Scans at most `ekadashi_scan_days` days and never past the supported
    /// span; a short result is not an error, an empty one is `NotFound`.
    pub fn upcoming_ekadashis(&self, from: NaiveDate, count: i64, location: &Location) -> Result<Vec<PanchangRecord>> {
        if count <= 0 {
            return Err(PanchangError::invalid("count", format!("{} must be positive", count)));
        }
        validate_date(from)?;

        let wanted = count as usize;
        let last_day = (from + Duration::days(self.ekadashi_scan_days as i64 - 1)).min(last_supported_day());

        let mut found = Vec::with_capacity(wanted.min(8));
        for date in from.iter_days().take_while(|d| *d <= last_day) {
            let record = self.builder.build(date, location)?;
            if record.is_ekadashi {
                debug!("Ekadashi on {}", date);
                found.push(record);
                if found.len() == wanted {
                    break;
                }
            }
        }

        if found.is_empty() {
            return Err(PanchangError::NotFound(format!(
                "no Ekadashi between {} and {}",
                from, last_day
            )));
        }
        if found.len() < wanted {
            warn!(
                "Only {} of {} Ekadashis found before {} (scan cap {} days)",
                found.len(),
                wanted,
                last_day,
                self.ekadashi_scan_days
            );
        } else {
            info!("Found {} Ekadashis from {}", found.len(), from);
        }
        Ok(found)
    }

    /// Upcoming Ekadashis counted from the clock's today
    pub fn upcoming_ekadashis_from_today(&self, count: i64, location: &Location) -> Result<Vec<PanchangRecord>> {
        self.upcoming_ekadashis(self.today_date(location), count, location)
    }

    /// The thirty tithis of a lunar month, Shukla first
    pub fn tithi_names(&self) -> Vec<NameEntry> {
        [Paksha::Shukla, Paksha::Krishna]
            .into_iter()
            .flat_map(|paksha| (1..=15).filter_map(move |n| TithiName::from_ordinal(n, paksha)))
            .enumerate()
            .map(|(i, name)| NameEntry::of(i + 1, &name))
            .collect()
    }

    pub fn nakshatra_names(&self) -> Vec<NameEntry> {
        NakshatraName::ALL
            .iter()
            .enumerate()
            .map(|(i, name)| NameEntry::of(i + 1, name))
            .collect()
    }

    pub fn marathi_months(&self) -> Vec<NameEntry> {
        Masa::ALL
            .iter()
            .enumerate()
            .map(|(i, masa)| NameEntry::of(i + 1, masa))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn service_on(today: NaiveDate) -> PanchangQueryService {
        PanchangQueryService::new(Arc::new(FestivalRegistry::maharashtra().unwrap()), Box::new(FixedClock(today)), 60)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_uses_clock() {
        let service = service_on(date(2024, 3, 25));
        let record = service.today(&Location::temple()).unwrap();
        assert_eq!(record.date, date(2024, 3, 25));
        assert_eq!(record.festival_english.as_deref(), Some("Holi"));
    }

    #[test]
    fn test_by_date_is_deterministic() {
        let service = service_on(date(2024, 1, 1));
        let location = Location::temple();
        let first = serde_json::to_string(&service.by_date(date(2024, 8, 26), &location).unwrap()).unwrap();
        let second = serde_json::to_string(&service.by_date(date(2024, 8, 26), &location).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_by_month_cell_count() {
        let service = service_on(date(2024, 1, 1));
        let grid = service.by_month(2024, 2, &Location::temple()).unwrap();
        assert_eq!(grid.cells.len() as u32, grid.leading_blanks + 29);
    }

    #[test]
    fn test_three_upcoming_ekadashis() {
        let service = service_on(date(2024, 1, 1));
        let from = date(2024, 7, 1);
        let records = service.upcoming_ekadashis(from, 3, &Location::temple()).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.is_ekadashi && r.date >= from));
        assert!(records.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(records[1].date, date(2024, 7, 17));
    }

    #[test]
    fn test_ekadashis_from_clock_today() {
        let service = service_on(date(2024, 7, 3));
        let records = service.upcoming_ekadashis_from_today(2, &Location::temple()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, date(2024, 7, 17));
        assert!(records[1].date > date(2024, 7, 17));
    }

    #[test]
    fn test_ekadashi_scan_cap_returns_partial() {
        let service = service_on(date(2024, 1, 1));
        let records = service.upcoming_ekadashis(date(2024, 7, 1), 10, &Location::temple()).unwrap();
        // Sixty days hold four or five Ekadashis, never ten
        assert!((3..=5).contains(&records.len()));
    }

    #[test]
    fn test_ekadashi_count_must_be_positive() {
        let service = service_on(date(2024, 1, 1));
        for count in [0, -3] {
            let err = service.upcoming_ekadashis(date(2024, 7, 1), count, &Location::temple()).unwrap_err();
            assert_eq!(err.error_code(), "INPUT_001");
        }
    }

    #[test]
    fn test_ekadashi_not_found_within_tiny_cap() {
        let service = PanchangQueryService::new(
            Arc::new(FestivalRegistry::maharashtra().unwrap()),
            Box::new(FixedClock(date(2024, 1, 1))),
            3,
        );
        // Yogini Ekadashi fell on 2024-07-02; the next one is on the 17th
        let err = service.upcoming_ekadashis(date(2024, 7, 3), 1, &Location::temple()).unwrap_err();
        assert_eq!(err.error_code(), "DATA_001");
    }

    #[test]
    fn test_festivals_by_year() {
        let service = service_on(date(2024, 1, 1));
        let festivals = service.festivals_by_year(2025).unwrap();
        assert!(festivals.iter().all(|f| f.date.year() == 2025));
        assert!(festivals.windows(2).all(|w| w[0].date < w[1].date));
        assert!(service.festivals_by_year(2101).is_err());
    }

    #[test]
    fn test_empty_rule_table_is_not_found() {
        let service = service_on(date(2024, 1, 1));
        service
            .festivals()
            .replace_rules(crate::panchang::festivals::FestivalRules::new(Vec::new()).unwrap())
            .unwrap();
        let err = service.festivals_by_year(2024).unwrap_err();
        assert_eq!(err.error_code(), "DATA_001");
    }

    #[test]
    fn test_reference_tables() {
        let service = service_on(date(2024, 1, 1));
        let tithis = service.tithi_names();
        assert_eq!(tithis.len(), 30);
        assert_eq!(tithis[14].english, "Purnima");
        assert_eq!(tithis[29].english, "Amavasya");
        assert_eq!(service.nakshatra_names().len(), 27);

        let months = service.marathi_months();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].marathi, "चैत्र");
        assert_eq!(months[11].number, 12);
    }
}
