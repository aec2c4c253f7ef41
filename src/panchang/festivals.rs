//! Festival rule table and the per-year festival cache.
//!
//! A year's festivals are produced by walking every local day of the year
//! (plus a short lookback so adjusted rules can land on early January) and
//! matching the rule table against the tithi in force at each rule's
//! observance time, the lunar month and the Sun's sidereal sign at the two
//! bounding midnights.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, info};

use crate::astro::ephemeris::julian_day;
use crate::astro::lunation::LunarMonth;
use crate::error::{PanchangError, Result};
use crate::panchang::calculator::{month_label, tithi_description, tithi_index_of, LunisolarCalculator};
use crate::panchang::names::{Bilingual, Masa, Paksha, Rashi, Vaar};
use crate::time::calendar::{days_of_year, first_supported_day, validate_year};
use crate::time::sun::{sun_times, SunTimes};
use crate::types::{Festival, Location};
use crate::utils::time::start_of_day;

/// Days scanned before 1 January so shifted observances can land in the year
const LOOKBACK_DAYS: i64 = 7;

/// What places a festival on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum Trigger {
    /// Tithi of a (non-adhika) lunar month in force at the rule's observance time
    Lunar { masa: Masa, paksha: Paksha, tithi: u8 },
    /// Civil day on which the Sun enters a sidereal sign
    Sankranti { rashi: Rashi },
}

/// Shift applied to the matched day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    #[default]
    None,
    NextDay,
    /// First such weekday on or after the matched day
    NextWeekday(Vaar),
}

impl Adjustment {
    pub fn apply(self, date: NaiveDate) -> NaiveDate {
        match self {
            Adjustment::None => date,
            Adjustment::NextDay => date + Duration::days(1),
            Adjustment::NextWeekday(target) => {
                let current = Vaar::from(date.weekday()).index();
                let shift = (target.index() + 7 - current) % 7;
                date + Duration::days(shift as i64)
            }
        }
    }
}

const OBSERVANCE_SLOTS: usize = 5;

/// Part of the day whose tithi decides a lunar festival
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservanceTime {
    #[default]
    Sunrise,
    /// Midday, centre of the third fifth of daylight
    Madhyahna,
    /// Afternoon, centre of the fourth fifth of daylight
    Aparahna,
    /// Dusk, centre of the first three night muhurtas
    Pradosh,
    /// Midnight, centre of the night
    Nishita,
}

impl ObservanceTime {
    pub const ALL: [ObservanceTime; OBSERVANCE_SLOTS] = [
        ObservanceTime::Sunrise,
        ObservanceTime::Madhyahna,
        ObservanceTime::Aparahna,
        ObservanceTime::Pradosh,
        ObservanceTime::Nishita,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    /// The sampled instant for a day's sunrise and sunset.
    ///
    /// Night length is taken as the complement of daylight so the last
    /// supported day needs no following sunrise.
    pub fn instant(self, sun: &SunTimes) -> DateTime<Tz> {
        let day = sun.daylight_seconds();
        let night = 86_400 - day;
        match self {
            ObservanceTime::Sunrise => sun.sunrise,
            ObservanceTime::Madhyahna => sun.sunrise + Duration::seconds(day / 2),
            ObservanceTime::Aparahna => sun.sunrise + Duration::seconds(day * 7 / 10),
            ObservanceTime::Pradosh => sun.sunset + Duration::seconds(night / 10),
            ObservanceTime::Nishita => sun.sunset + Duration::seconds(night / 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FestivalRule {
    pub name: String,
    pub english_name: String,
    pub trigger: Trigger,
    #[serde(default)]
    pub observance: ObservanceTime,
    #[serde(default)]
    pub adjustment: Adjustment,
    #[serde(default)]
    pub description: Option<String>,
}

impl FestivalRule {
    pub fn lunar(name: &str, english_name: &str, masa: Masa, paksha: Paksha, tithi: u8) -> Self {
        FestivalRule {
            name: name.to_string(),
            english_name: english_name.to_string(),
            trigger: Trigger::Lunar { masa, paksha, tithi },
            observance: ObservanceTime::Sunrise,
            adjustment: Adjustment::None,
            description: None,
        }
    }

    pub fn sankranti(name: &str, english_name: &str, rashi: Rashi) -> Self {
        FestivalRule {
            name: name.to_string(),
            english_name: english_name.to_string(),
            trigger: Trigger::Sankranti { rashi },
            observance: ObservanceTime::Sunrise,
            adjustment: Adjustment::None,
            description: None,
        }
    }

    pub fn observed_at(mut self, observance: ObservanceTime) -> Self {
        self.observance = observance;
        self
    }

    pub fn adjusted(mut self, adjustment: Adjustment) -> Self {
        self.adjustment = adjustment;
        self
    }

    pub fn described(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    rules: Vec<FestivalRule>,
}

/// The lunar trigger a `next_day` rule lands on, when no tithi is skipped
fn next_day_trigger(trigger: Trigger) -> Option<Trigger> {
    let Trigger::Lunar { masa, paksha, tithi } = trigger else {
        return None;
    };
    match (paksha, tithi) {
        (Paksha::Shukla, 15) => Some(Trigger::Lunar { masa, paksha: Paksha::Krishna, tithi: 1 }),
        (Paksha::Krishna, 15) => Some(Trigger::Lunar {
            masa: Masa::ALL[(masa.index() as usize + 1) % 12],
            paksha: Paksha::Shukla,
            tithi: 1,
        }),
        _ => Some(Trigger::Lunar { masa, paksha, tithi: tithi + 1 }),
    }
}

/// A validated, ordered festival rule table.
///
/// Order matters: when two rules still land on one date (a skipped tithi,
/// a weekday shift) the earlier rule claims it.
#[derive(Debug, Clone, PartialEq)]
pub struct FestivalRules {
    rules: Vec<FestivalRule>,
}

impl FestivalRules {
    pub fn new(rules: Vec<FestivalRule>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if rule.name.trim().is_empty() || rule.english_name.trim().is_empty() {
                return Err(PanchangError::invalid("festival_rule", "festival names must not be empty"));
            }
            if let Trigger::Lunar { tithi, .. } = rule.trigger {
                if !(1..=15).contains(&tithi) {
                    return Err(PanchangError::invalid(
                        "festival_rule",
                        format!("{}: tithi {} is not between 1 and 15", rule.english_name, tithi),
                    ));
                }
            }
            if !seen.insert((rule.trigger, rule.adjustment)) {
                return Err(PanchangError::invalid(
                    "festival_rule",
                    format!("{}: duplicate trigger {:?} with {:?}", rule.english_name, rule.trigger, rule.adjustment),
                ));
            }
        }

        // A next-day rule shares its date with the following tithi's own rule
        for shifted in rules.iter().filter(|r| r.adjustment == Adjustment::NextDay) {
            let Some(landing) = next_day_trigger(shifted.trigger) else {
                continue;
            };
            if let Some(other) = rules
                .iter()
                .find(|r| r.trigger == landing && r.adjustment == Adjustment::None && r.observance == shifted.observance)
            {
                return Err(PanchangError::invalid(
                    "festival_rule",
                    format!("{} lands on the same day as {}", shifted.english_name, other.english_name),
                ));
            }
        }

        Ok(FestivalRules { rules })
    }

    /// Parse a `[[rules]]` TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RuleFile = toml::from_str(content)?;
        Self::new(file.rules)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PanchangError::Config(format!("Failed to read festival rules {}: {}", path.display(), e))
        })?;
        let rules = Self::from_toml_str(&content)?;
        info!("📜 Loaded {} festival rules from {}", rules.len(), path.display());
        Ok(rules)
    }

    /// The festivals observed in Maharashtra (amanta months)
    pub fn maharashtra() -> Result<Self> {
        use Masa::*;
        use Paksha::*;

        let rules = vec![
            FestivalRule::lunar("गुढीपाडवा", "Gudi Padwa", Chaitra, Shukla, 1)
                .described("Marathi new year"),
            FestivalRule::lunar("राम नवमी", "Ram Navami", Chaitra, Shukla, 9),
            FestivalRule::lunar("हनुमान जयंती", "Hanuman Jayanti", Chaitra, Shukla, 15),
            FestivalRule::lunar("अक्षय्य तृतीया", "Akshaya Tritiya", Vaishakha, Shukla, 3),
            FestivalRule::lunar("वट पौर्णिमा", "Vat Purnima", Jyeshtha, Shukla, 15)
                .observed_at(ObservanceTime::Madhyahna),
            FestivalRule::lunar("आषाढी एकादशी", "Ashadhi Ekadashi", Ashadha, Shukla, 11)
                .described("Pandharpur wari"),
            FestivalRule::lunar("गुरु पौर्णिमा", "Guru Purnima", Ashadha, Shukla, 15),
            FestivalRule::lunar("नाग पंचमी", "Nag Panchami", Shravana, Shukla, 5),
            FestivalRule::lunar("रक्षाबंधन", "Raksha Bandhan", Shravana, Shukla, 15)
                .described("Narali Purnima"),
            FestivalRule::lunar("गोकुळाष्टमी", "Gokulashtami", Shravana, Krishna, 8),
            FestivalRule::lunar("गोपाळकाला", "Gopalkala", Shravana, Krishna, 8)
                .adjusted(Adjustment::NextDay)
                .described("Dahi Handi"),
            FestivalRule::lunar("गणेश चतुर्थी", "Ganesh Chaturthi", Bhadrapada, Shukla, 4),
            FestivalRule::lunar("अनंत चतुर्दशी", "Anant Chaturdashi", Bhadrapada, Shukla, 14),
            FestivalRule::lunar("नवरात्री प्रारंभ", "Navratri Begins", Ashvin, Shukla, 1),
            FestivalRule::lunar("दसरा", "Dussehra", Ashvin, Shukla, 10)
                .observed_at(ObservanceTime::Aparahna),
            FestivalRule::lunar("कोजागिरी पौर्णिमा", "Kojagiri Purnima", Ashvin, Shukla, 15),
            FestivalRule::lunar("धनत्रयोदशी", "Dhanteras", Ashvin, Krishna, 13)
                .observed_at(ObservanceTime::Pradosh),
            FestivalRule::lunar("लक्ष्मीपूजन", "Lakshmi Pujan", Ashvin, Krishna, 15),
            FestivalRule::lunar("बलिप्रतिपदा", "Bali Pratipada", Kartika, Shukla, 1),
            FestivalRule::lunar("भाऊबीज", "Bhau Beej", Kartika, Shukla, 2),
            FestivalRule::lunar("तुलसी विवाह", "Tulsi Vivah", Kartika, Shukla, 11),
            FestivalRule::lunar("दत्त जयंती", "Datta Jayanti", Margashirsha, Shukla, 15)
                .observed_at(ObservanceTime::Pradosh),
            FestivalRule::sankranti("मकर संक्रांति", "Makar Sankranti", Rashi::Makara),
            FestivalRule::lunar("महाशिवरात्री", "Mahashivratri", Magha, Krishna, 14)
                .observed_at(ObservanceTime::Nishita),
            FestivalRule::lunar("होळी", "Holi", Phalguna, Shukla, 15),
            FestivalRule::lunar("रंगपंचमी", "Rang Panchami", Phalguna, Krishna, 5),
        ];

        Self::new(rules)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FestivalRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

type TithiSample = (u8, LunarMonth);

/// Values sampled once per scanned day
#[derive(Debug, Clone, Copy)]
struct DaySample {
    /// Tithi and month at each observance time the rule table uses
    tithis: [Option<TithiSample>; OBSERVANCE_SLOTS],
    month: LunarMonth,
    rashi_at_start: Rashi,
    rashi_at_end: Rashi,
}

impl DaySample {
    fn ingress(&self) -> Option<Rashi> {
        (self.rashi_at_start != self.rashi_at_end).then_some(self.rashi_at_end)
    }
}

/// Tithis (1..=30, with their month) observed on a day given the previous
/// day's tithi at the same observance time.
///
/// Normally one. A tithi skipped between the two samples is observed
/// together with today's; a tithi already current at the previous sample
/// is not observed again.
fn observed_tithis(prev: Option<TithiSample>, today: TithiSample) -> Vec<TithiSample> {
    let (current, month) = today;
    let Some((previous, previous_month)) = prev else {
        return vec![today];
    };

    let steps = (current as i32 - previous as i32).rem_euclid(30);
    (1..=steps)
        .map(|step| {
            let index = ((previous as i32 - 1 + step) % 30 + 1) as u8;
            let in_month = if previous > current && index > current {
                previous_month
            } else {
                month
            };
            (index, in_month)
        })
        .collect()
}

type YearSlot = Arc<Mutex<Option<Arc<[Festival]>>>>;

fn poisoned<T>(_: PoisonError<T>) -> PanchangError {
    PanchangError::Computation("festival cache lock poisoned".to_string())
}

/// Rule table plus a per-year, single-flight festival cache.
///
/// Concurrent callers for the same year wait on that year's slot and reuse
/// the first caller's result; different years compute in parallel.
pub struct FestivalRegistry {
    location: Location,
    calculator: LunisolarCalculator,
    rules: RwLock<Arc<FestivalRules>>,
    cache: Mutex<HashMap<i32, YearSlot>>,
}

impl FestivalRegistry {
    pub fn new(rules: FestivalRules, location: Location) -> Self {
        FestivalRegistry {
            location,
            calculator: LunisolarCalculator::new(),
            rules: RwLock::new(Arc::new(rules)),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Built-in Maharashtra table observed at the temple
    pub fn maharashtra() -> Result<Self> {
        Self::maharashtra_at(Location::temple())
    }

    pub fn maharashtra_at(location: Location) -> Result<Self> {
        Ok(Self::new(FestivalRules::maharashtra()?, location))
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn rules(&self) -> Result<Arc<FestivalRules>> {
        Ok(self.rules.read().map_err(poisoned)?.clone())
    }

    /// All festivals of a Gregorian year, ascending by date
    pub fn festivals_for_year(&self, year: i32) -> Result<Arc<[Festival]>> {
        validate_year(year)?;

        let slot = {
            let mut slots = self.cache.lock().map_err(poisoned)?;
            slots.entry(year).or_default().clone()
        };

        let mut guard = slot.lock().map_err(poisoned)?;
        if let Some(festivals) = guard.as_ref() {
            debug!("Festival cache hit for {}", year);
            return Ok(festivals.clone());
        }

        let rules = self.rules()?;
        let festivals: Arc<[Festival]> = self.compute_year(&rules, year)?.into();
        info!("🪔 Computed {} festivals for {} at {}", festivals.len(), year, self.location.name);
        *guard = Some(festivals.clone());
        Ok(festivals)
    }

    /// The festival observed on a date, if any
    pub fn festival_on(&self, date: NaiveDate) -> Result<Option<Festival>> {
        let festivals = self.festivals_for_year(date.year())?;
        Ok(festivals
            .binary_search_by_key(&date, |f| f.date)
            .ok()
            .map(|i| festivals[i].clone()))
    }

    pub fn clear_cache(&self) -> Result<()> {
        let mut slots = self.cache.lock().map_err(poisoned)?;
        let cleared = slots.len();
        slots.clear();
        debug!("Cleared festival cache ({} years)", cleared);
        Ok(())
    }

    /// Swap the rule table and drop every cached year
    pub fn replace_rules(&self, rules: FestivalRules) -> Result<()> {
        let count = rules.len();
        {
            let mut current = self.rules.write().map_err(poisoned)?;
            *current = Arc::new(rules);
        }
        self.clear_cache()?;
        info!("Festival rules replaced ({} rules)", count);
        Ok(())
    }

    pub fn load_rules<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.replace_rules(FestivalRules::load(path)?)
    }

    fn month_at(&self, instant: &DateTime<Tz>, month_hint: &mut Option<LunarMonth>) -> Result<LunarMonth> {
        let jd = julian_day(instant);
        match month_hint {
            Some(month) if month.start_jd <= jd && jd < month.end_jd => Ok(*month),
            _ => {
                let month = self.calculator.lunar_month_at(instant)?;
                *month_hint = Some(month);
                Ok(month)
            }
        }
    }

    fn sample(
        &self,
        date: NaiveDate,
        times: &[ObservanceTime],
        month_hint: &mut Option<LunarMonth>,
    ) -> Result<DaySample> {
        let tz = &self.location.timezone;
        let sun = sun_times(date, &self.location)?;

        let mut tithis = [None; OBSERVANCE_SLOTS];
        for &time in times {
            let instant = time.instant(&sun);
            let month = self.month_at(&instant, month_hint)?;
            tithis[time.slot()] = Some((self.calculator.tithi_index_at(&instant)?, month));
        }

        Ok(DaySample {
            tithis,
            month: self.month_at(&sun.sunrise, month_hint)?,
            rashi_at_start: self.calculator.sun_rashi_at(&start_of_day(date, tz)?)?,
            rashi_at_end: self.calculator.sun_rashi_at(&start_of_day(date + Duration::days(1), tz)?)?,
        })
    }

    fn compute_year(&self, rules: &FestivalRules, year: i32) -> Result<Vec<Festival>> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| PanchangError::invalid("year", format!("{} has no 1 January", year)))?;
        let lookback = (1..=LOOKBACK_DAYS)
            .rev()
            .map(|back| first - Duration::days(back))
            .filter(|d| *d >= first_supported_day());
        let scan: Vec<NaiveDate> = lookback.chain(days_of_year(year)).collect();

        let times: Vec<ObservanceTime> = ObservanceTime::ALL
            .into_iter()
            .filter(|t| rules.iter().any(|r| r.observance == *t))
            .collect();

        let mut month_hint = None;
        let mut previous = match scan.first() {
            Some(start) if *start > first_supported_day() => {
                Some(self.sample(*start - Duration::days(1), &times, &mut month_hint)?)
            }
            _ => None,
        };

        let mut claimed: BTreeMap<NaiveDate, Festival> = BTreeMap::new();
        for date in scan {
            let today = self.sample(date, &times, &mut month_hint)?;
            let mut observed: [Vec<TithiSample>; OBSERVANCE_SLOTS] = Default::default();
            for time in &times {
                if let Some(sample) = today.tithis[time.slot()] {
                    observed[time.slot()] = observed_tithis(previous.and_then(|p| p.tithis[time.slot()]), sample);
                }
            }

            for rule in rules.iter() {
                let (marathi_month, tithi) = match rule.trigger {
                    Trigger::Lunar { masa, paksha, tithi } => {
                        let wanted = tithi_index_of(paksha, tithi);
                        let hit = observed[rule.observance.slot()]
                            .iter()
                            .any(|(index, month)| *index == wanted && month.masa == masa && !month.adhika);
                        if !hit {
                            continue;
                        }
                        (masa.marathi().to_string(), tithi_description(paksha, tithi))
                    }
                    Trigger::Sankranti { rashi } => {
                        if today.ingress() != Some(rashi) {
                            continue;
                        }
                        (month_label(&today.month), "-".to_string())
                    }
                };

                let observed_on = rule.adjustment.apply(date);
                if observed_on.year() != year || claimed.contains_key(&observed_on) {
                    continue;
                }
                claimed.insert(
                    observed_on,
                    Festival {
                        date: observed_on,
                        name: rule.name.clone(),
                        english_name: rule.english_name.clone(),
                        marathi_month,
                        tithi,
                        description: rule.description.clone(),
                    },
                );
            }

            previous = Some(today);
        }

        Ok(claimed.into_values().collect())
    }
}
