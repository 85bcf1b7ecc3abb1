use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use forecast_core::{
    Aggregator, Config, Dashboard, IconResolver, LoadState, Location, OpenWeatherProvider, Route,
    config::DEFAULT_LOCATION,
};
use inquire::{CustomType, Password, PasswordDisplayMode, Text};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Single-city weather dashboard")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the OpenWeather API key and the city to show.
    Configure,

    /// Show today's weather with the week, or one weekday's hours.
    Show {
        /// Weekday, e.g. "monday". Anything else shows the week.
        day: Option<String>,

        /// Print the dashboard as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print where the configuration file lives.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { day, json } => show(day.as_deref().unwrap_or_default(), json).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;
    let current = cfg.location().unwrap_or(DEFAULT_LOCATION);

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let latitude = CustomType::<f64>::new("Latitude:")
        .with_default(current.latitude)
        .with_error_message("Please enter a number")
        .prompt()
        .context("Failed to read latitude")?;

    let longitude = CustomType::<f64>::new("Longitude:")
        .with_default(current.longitude)
        .with_error_message("Please enter a number")
        .prompt()
        .context("Failed to read longitude")?;

    let city = Text::new("City label (leave empty to use the provider's name):")
        .with_initial_value(cfg.city.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read city label")?;

    cfg.set_location(Location::new(latitude, longitude))?;
    if !api_key.trim().is_empty() {
        cfg.api_key = Some(api_key.trim().to_string());
    }
    cfg.city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    let path = cfg.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

async fn show(segment: &str, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let provider = OpenWeatherProvider::new(cfg.api_key()?);
    let aggregator = Aggregator::openweather(IconResolver::new(cfg.icon_dir()));

    let mut dashboard = Dashboard::new(provider, aggregator, cfg.location()?);
    if let Some(city) = &cfg.city {
        dashboard = dashboard.with_city(city.clone());
    }
    if let Some(offset) = cfg.utc_offset()? {
        dashboard = dashboard.with_offset(offset);
    }

    let route = Route::from_segment(segment);
    debug!(?route, "loading dashboard");

    match dashboard.load(route).await {
        LoadState::Ready(snapshot) if json => {
            println!("{}", serde_json::to_string_pretty(snapshot)?);
        }
        LoadState::Ready(snapshot) => print!("{}", render::snapshot(snapshot)),
        LoadState::Failed(message) => bail!("{message}"),
        LoadState::Idle | LoadState::Loading { .. } => bail!("Dashboard did not finish loading"),
    }

    Ok(())
}
