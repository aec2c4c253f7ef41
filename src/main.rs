/// Command-line entry point for the panchang engine
///
/// Usage:
///   panchang today
///   panchang date 2024-03-25
///   panchang month 2024 2
///   panchang festivals 2024 2025
///   panchang ekadashis 5
use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use panchang::{
    config::load_config,
    error::{PanchangError, Result},
    panchang::PanchangQueryService,
    utils::parse_date,
    Config, Location,
};

const DEFAULT_EKADASHI_COUNT: i64 = 5;

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Today,
    Date(chrono::NaiveDate),
    Month(i32, u32),
    Festivals(Vec<i32>),
    Ekadashis(i64),
    TithiNames,
    NakshatraNames,
    MarathiMonths,
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| PanchangError::invalid(field, format!("'{}' is not a number", value)))
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let name = args.first().map(String::as_str).unwrap_or("today");
        let rest = args.get(1..).unwrap_or_default();

        match (name, rest) {
            ("today", []) => Ok(Command::Today),
            ("date", [date]) => Ok(Command::Date(parse_date(date)?)),
            ("month", [year, month]) => Ok(Command::Month(
                parse_number("year", year)?,
                parse_number("month", month)?,
            )),
            ("festivals", years) if !years.is_empty() => Ok(Command::Festivals(
                years
                    .iter()
                    .map(|y| parse_number("year", y))
                    .collect::<Result<Vec<i32>>>()?,
            )),
            ("ekadashis", []) => Ok(Command::Ekadashis(DEFAULT_EKADASHI_COUNT)),
            ("ekadashis", [count]) => Ok(Command::Ekadashis(parse_number("count", count)?)),
            ("tithi-names", []) => Ok(Command::TithiNames),
            ("nakshatra-names", []) => Ok(Command::NakshatraNames),
            ("marathi-months", []) => Ok(Command::MarathiMonths),
            _ => Err(PanchangError::invalid(
                "command",
                format!(
                    "unrecognised '{}'; expected today | date <YYYY-MM-DD> | month <Y> <M> | festivals <Y>... | ekadashis [N] | tithi-names | nakshatra-names | marathi-months",
                    args.join(" ")
                ),
            )),
        }
    }
}

/// Application state
pub struct PanchangApp {
    service: PanchangQueryService,
    location: Location,
}

impl PanchangApp {
    pub fn new(config: &Config) -> Result<Self> {
        let location = Location::try_from(&config.location)?;
        let service = PanchangQueryService::from_config(config)?;
        info!(
            "🛕 Panchang ready for {} ({:.4}, {:.4}, {})",
            location.name, location.latitude, location.longitude, location.timezone
        );
        Ok(PanchangApp { service, location })
    }

    async fn run(&self, command: Command) -> anyhow::Result<serde_json::Value> {
        info!("Running {:?}", command);
        let output = match command {
            Command::Today => serde_json::to_value(self.service.today(&self.location)?)?,
            Command::Date(date) => serde_json::to_value(self.service.by_date(date, &self.location)?)?,
            Command::Month(year, month) => {
                serde_json::to_value(self.service.by_month(year, month, &self.location)?)?
            }
            Command::Festivals(years) => self.festivals(years).await?,
            Command::Ekadashis(count) => {
                serde_json::to_value(self.service.upcoming_ekadashis_from_today(count, &self.location)?)?
            }
            Command::TithiNames => serde_json::to_value(self.service.tithi_names())?,
            Command::NakshatraNames => serde_json::to_value(self.service.nakshatra_names())?,
            Command::MarathiMonths => serde_json::to_value(self.service.marathi_months())?,
        };
        Ok(output)
    }

    /// Years are computed concurrently on the blocking pool
    async fn festivals(&self, years: Vec<i32>) -> anyhow::Result<serde_json::Value> {
        let tasks = years.iter().map(|&year| {
            let registry = Arc::clone(self.service.festivals());
            tokio::task::spawn_blocking(move || registry.festivals_for_year(year))
        });

        let mut listing = Vec::with_capacity(years.len());
        for (year, joined) in years.iter().zip(join_all(tasks).await) {
            let festivals = joined??;
            info!("✅ {} festivals in {}", festivals.len(), year);
            listing.push(json!({ "year": year, "festivals": festivals.as_ref() }));
        }
        Ok(serde_json::Value::Array(listing))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("CONFIG_PATH")
        .unwrap_or_else(|_| "config.toml".to_string());

    let config = load_config(&config_path)?;

    // Logs go to stderr so stdout stays pure JSON
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("panchang={},warn", config.log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let app = PanchangApp::new(&config)?;
    match app.run(command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            match e.downcast_ref::<PanchangError>() {
                Some(err) => error!("[{}] {}", err.error_code(), err),
                None => error!("{}", e),
            }
            Err(e)
        }
    }
}
