/// Export computed festivals for a range of years to JSON
/// Usage: cargo run --release --bin export_festivals -- 2024 2026
///
/// Writes data/festivals_<from>_<to>.json with one entry per festival,
/// ascending by date across the whole range.

use std::sync::Arc;

use futures_util::future::join_all;
use panchang::config::load_config;
use panchang::panchang::FestivalRegistry;
use panchang::{Festival, Location};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🪔 Festival Export Utility");
    info!("==========================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (from, to) = match args.as_slice() {
        [year] => (year.parse::<i32>()?, year.parse::<i32>()?),
        [from, to] => (from.parse::<i32>()?, to.parse::<i32>()?),
        _ => anyhow::bail!("usage: export_festivals <from-year> [to-year]"),
    };
    if from > to {
        anyhow::bail!("from-year {} is after to-year {}", from, to);
    }

    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = load_config(&config_path)?;
    let location = Location::try_from(&config.location)?;
    let registry = Arc::new(FestivalRegistry::maharashtra_at(location)?);
    info!("📍 Observing from {}", registry.location().name);
    if let Some(path) = &config.festival_rules_path {
        registry.load_rules(path)?;
    }

    let tasks = (from..=to).map(|year| {
        let registry = Arc::clone(&registry);
        tokio::task::spawn_blocking(move || registry.festivals_for_year(year))
    });

    let mut festivals: Vec<Festival> = Vec::new();
    for (year, joined) in (from..=to).zip(join_all(tasks).await) {
        let year_festivals = joined??;
        if year_festivals.is_empty() {
            warn!("   {}: no festivals matched", year);
        } else {
            info!("   {}: {} festivals", year, year_festivals.len());
        }
        festivals.extend(year_festivals.iter().cloned());
    }

    tokio::fs::create_dir_all("data").await?;
    let output_path = format!("data/festivals_{}_{}.json", from, to);
    let json = serde_json::to_string_pretty(&festivals)?;
    tokio::fs::write(&output_path, json).await?;

    info!("✅ Saved {} festivals to: {}", festivals.len(), output_path);
    Ok(())
}
