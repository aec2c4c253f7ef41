/// Composes a full PanchangRecord for one date
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::error::Result;
use crate::panchang::calculator::{month_label, LunisolarCalculator};
use crate::panchang::festivals::FestivalRegistry;
use crate::panchang::names::{Bilingual, Paksha, Vaar};
use crate::time::calendar::validate_date;
use crate::time::sun::{abhijit_muhurat, gulika_kaal, rahu_kaal, sun_times, yamaghanta};
use crate::types::{Festival, Location, PanchangRecord};

pub struct PanchangRecordBuilder {
    calculator: LunisolarCalculator,
    festivals: Arc<FestivalRegistry>,
}

impl PanchangRecordBuilder {
    pub fn new(festivals: Arc<FestivalRegistry>) -> Self {
        PanchangRecordBuilder {
            calculator: LunisolarCalculator::new(),
            festivals,
        }
    }

    /// Record for `date` at `location`; fails as a whole if any part fails
    pub fn build(&self, date: NaiveDate, location: &Location) -> Result<PanchangRecord> {
        let (record, _) = self.build_with_festival(date, location)?;
        Ok(record)
    }

    /// Record plus the festival observed that day, for grid cells
    pub fn build_with_festival(&self, date: NaiveDate, location: &Location) -> Result<(PanchangRecord, Option<Festival>)> {
        validate_date(date)?;

        let vaar = Vaar::from(date.weekday());
        let sun = sun_times(date, location)?;
        let attributes = self.calculator.attributes_for(date, location)?;
        let festival = self.festivals.festival_on(date)?;

        let paksha = attributes.tithi.paksha;
        let number = attributes.tithi.number;

        let record = PanchangRecord {
            date,
            vaar,
            weekday: vaar.marathi(),
            weekday_english: vaar.english(),

            masa: attributes.lunar_month.masa,
            marathi_month: month_label(&attributes.lunar_month),
            marathi_year: attributes.lunar_year,
            is_adhik_maas: attributes.lunar_month.adhika,

            tithi: attributes.tithi,
            nakshatra: attributes.nakshatra,
            yoga: attributes.yoga,
            karana: attributes.karana,

            sunrise: sun.sunrise_clock(),
            sunset: sun.sunset_clock(),

            rahu_kaal: rahu_kaal(&sun, vaar),
            yamaghanta: yamaghanta(&sun, vaar),
            gulika_kaal: gulika_kaal(&sun, vaar),
            abhijit_muhurat: abhijit_muhurat(&sun, vaar),

            is_ekadashi: number == 11,
            is_purnima: paksha == Paksha::Shukla && number == 15,
            is_amavasya: paksha == Paksha::Krishna && number == 15,
            is_sankashti_chaturthi: paksha == Paksha::Krishna && number == 4,
            is_vinayaka_chaturthi: paksha == Paksha::Shukla && number == 4,

            festival: festival.as_ref().map(|f| f.name.clone()),
            festival_english: festival.as_ref().map(|f| f.english_name.clone()),
        };

        Ok((record, festival))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panchang::names::TithiName;
    use chrono::Duration;

    fn builder() -> PanchangRecordBuilder {
        PanchangRecordBuilder::new(Arc::new(FestivalRegistry::maharashtra().unwrap()))
    }

    #[test]
    fn test_holi_record() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        let record = builder().build(date, &Location::temple()).unwrap();
        assert_eq!(record.weekday, "सोमवार");
        assert_eq!(record.weekday_english, "Monday");
        assert_eq!(record.marathi_month, "फाल्गुन");
        assert_eq!(record.marathi_year, 1945);
        assert!(record.is_purnima);
        assert!(!record.is_amavasya);
        assert_eq!(record.festival.as_deref(), Some("होळी"));
        assert_eq!(record.festival_english.as_deref(), Some("Holi"));
    }

    #[test]
    fn test_flags_follow_tithi() {
        let builder = builder();
        let location = Location::temple();
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        for offset in 0..45 {
            let record = builder.build(start + Duration::days(offset), &location).unwrap();
            let t = &record.tithi;
            assert_eq!(record.is_ekadashi, t.name == TithiName::Ekadashi);
            assert_eq!(record.is_purnima, t.name == TithiName::Purnima);
            assert_eq!(record.is_amavasya, t.name == TithiName::Amavasya);
            assert!(!(record.is_purnima && record.is_amavasya));
            assert!(record.rahu_kaal.start >= record.sunrise);
            assert!(record.rahu_kaal.end <= record.sunset);
            assert_eq!(record.abhijit_muhurat.is_none(), record.vaar == Vaar::Wednesday);
        }
    }

    #[test]
    fn test_serialized_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        let record = builder().build(date, &Location::temple()).unwrap();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["date"], "2024-03-25");
        assert_eq!(json["marathiMonth"], "फाल्गुन");
        assert_eq!(json["tithi"]["name"], "पौर्णिमा");
        assert_eq!(json["tithi"]["paksha"], "शुक्ल पक्ष");
        assert_eq!(json["tithi"]["number"], 15);
        assert_eq!(json["festivalEnglish"], "Holi");
        assert!(json["sunrise"].as_str().unwrap().len() == 5);
        assert!(json.get("rahuKaal").is_some());
        assert!(json.get("vaar").is_none());
    }

    #[test]
    fn test_day_without_festival_omits_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 27).unwrap();
        let record = builder().build(date, &Location::temple()).unwrap();
        assert!(record.festival.is_none());
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("festival").is_none());
        assert!(json.get("festivalEnglish").is_none());
    }

    #[test]
    fn test_out_of_range_fails_whole_build() {
        let date = NaiveDate::from_ymd_opt(2101, 1, 1).unwrap();
        let err = builder().build(date, &Location::temple()).unwrap_err();
        assert_eq!(err.error_code(), "RANGE_001");
    }
}
