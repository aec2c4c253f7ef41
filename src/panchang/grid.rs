/// Calendar-month grid: leading blanks, then one populated cell per day
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{PanchangError, Result};
use crate::panchang::builder::PanchangRecordBuilder;
use crate::time::calendar::{days_in_month, first_weekday, validate_month, validate_year};
use crate::types::{DayCell, DayEntry, Location, MonthGrid};

pub struct MonthGridAssembler {
    builder: Arc<PanchangRecordBuilder>,
}

impl MonthGridAssembler {
    pub fn new(builder: Arc<PanchangRecordBuilder>) -> Self {
        MonthGridAssembler { builder }
    }

    pub fn assemble(&self, year: i32, month: u32, location: &Location) -> Result<MonthGrid> {
        validate_year(year)?;
        validate_month(month)?;

        let leading_blanks = first_weekday(year, month)?;
        let day_count = days_in_month(year, month)?;

        let mut cells = Vec::with_capacity((leading_blanks + day_count) as usize);
        cells.extend((0..leading_blanks).map(|_| DayCell::Blank));

        // Lunar months spanned, in order of appearance
        let mut month_names: Vec<String> = Vec::new();

        for day in 1..=day_count {
            let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                PanchangError::invalid("date", format!("{}-{:02}-{:02} does not exist", year, month, day))
            })?;
            let (record, festival) = self.builder.build_with_festival(date, location)?;
            if !month_names.contains(&record.marathi_month) {
                month_names.push(record.marathi_month.clone());
            }
            cells.push(DayCell::Day(Box::new(DayEntry { day, record, festival })));
        }

        debug!(
            "Assembled {}-{:02}: {} blanks, {} days",
            year, month, leading_blanks, day_count
        );

        Ok(MonthGrid {
            year,
            month,
            marathi_month: month_names.join(" / "),
            leading_blanks,
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panchang::festivals::FestivalRegistry;

    fn assembler() -> MonthGridAssembler {
        let registry = Arc::new(FestivalRegistry::maharashtra().unwrap());
        MonthGridAssembler::new(Arc::new(PanchangRecordBuilder::new(registry)))
    }

    #[test]
    fn test_february_2024_layout() {
        let grid = assembler().assemble(2024, 2, &Location::temple()).unwrap();
        assert_eq!(grid.leading_blanks, 4);
        assert_eq!(grid.cells.len(), 4 + 29);
        assert!(grid.cells[..4].iter().all(|c| matches!(c, DayCell::Blank)));

        let days: Vec<u32> = grid.days().map(|e| e.day).collect();
        assert_eq!(days, (1..=29).collect::<Vec<_>>());
        assert!(grid.days().all(|e| e.record.date.format("%Y-%m").to_string() == "2024-02"));
    }

    #[test]
    fn test_month_label_spans_two_lunar_months() {
        // March 2024 runs from Magha into Phalguna
        let grid = assembler().assemble(2024, 3, &Location::temple()).unwrap();
        assert_eq!(grid.marathi_month, "माघ / फाल्गुन");
        let holi = grid.days().find(|e| e.day == 25).unwrap();
        assert_eq!(holi.festival.as_ref().map(|f| f.english_name.as_str()), Some("Holi"));
    }

    #[test]
    fn test_month_starting_sunday_has_no_blanks() {
        let grid = assembler().assemble(2024, 9, &Location::temple()).unwrap();
        assert_eq!(grid.leading_blanks, 0);
        assert_eq!(grid.cells.len(), 30);
    }

    #[test]
    fn test_invalid_month() {
        let err = assembler().assemble(2024, 13, &Location::temple()).unwrap_err();
        assert_eq!(err.error_code(), "INPUT_001");
        let err = assembler().assemble(2101, 1, &Location::temple()).unwrap_err();
        assert_eq!(err.error_code(), "RANGE_001");
    }

    #[test]
    fn test_blank_cells_serialize_as_null() {
        let grid = assembler().assemble(2024, 2, &Location::temple()).unwrap();
        let json = serde_json::to_value(&grid).unwrap();
        assert_eq!(json["leadingBlanks"], 4);
        assert!(json["cells"][0].is_null());
        assert_eq!(json["cells"][4]["day"], 1);
    }
}
