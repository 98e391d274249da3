use anyhow::{Context, anyhow};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Password, Select, Text};
use skyboard_core::{
    Config, Dashboard, FetchError, ForecastRange, GeocodeClient, Location, SuggestionSource,
    Units, compare, provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyboard", version, about = "Weather dashboard in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RangeArg {
    Today,
    Tomorrow,
    Week,
}

impl From<RangeArg> for ForecastRange {
    fn from(value: RangeArg) -> Self {
        match value {
            RangeArg::Today => ForecastRange::Today,
            RangeArg::Tomorrow => ForecastRange::Tomorrow,
            RangeArg::Week => ForecastRange::Week,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API keys, default location and units.
    Configure,

    /// Show the dashboard for a location.
    Show {
        /// "City,CountryCode"; defaults to the configured location.
        location: Option<String>,

        /// Day to show in detail, 0 is today.
        #[arg(long, default_value_t = 0)]
        day: usize,

        /// Which forecast cards to show.
        #[arg(long, value_enum, default_value = "week")]
        range: RangeArg,

        /// Unit group: metric, us, uk or base.
        #[arg(long)]
        units: Option<String>,

        /// Also show the largest cities of the same country.
        #[arg(long)]
        cities: bool,
    },

    /// Compare the largest cities of a location's country.
    Compare {
        location: Option<String>,
    },

    /// Look up city suggestions for a partial name.
    Suggest {
        query: String,

        /// Pick one interactively and show its dashboard.
        #[arg(long)]
        pick: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                location,
                day,
                range,
                units,
                cities,
            } => {
                let mut cfg = Config::resolve()?;
                if let Some(units) = units {
                    cfg.units = Units::try_from(units.as_str())?;
                }
                let location = resolve_location(&cfg, location)?;
                show(&cfg, location, day, range.into(), cities).await
            }
            Command::Compare { location } => {
                let cfg = Config::resolve()?;
                let location = resolve_location(&cfg, location)?;
                show_comparison(&cfg, &location).await
            }
            Command::Suggest { query, pick } => {
                let cfg = Config::resolve()?;
                suggest(&cfg, &query, pick).await
            }
        }
    }
}

fn resolve_location(cfg: &Config, arg: Option<String>) -> anyhow::Result<Location> {
    let location = match arg {
        Some(value) => Location::new(value)?,
        None => cfg.default_location()?,
    };
    Ok(location)
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("Weather provider API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        cfg.set_api_key(api_key.trim().to_string());
    }

    let geocoding_key = Password::new("Geocoding API key (empty to skip):")
        .without_confirmation()
        .prompt()
        .context("Failed to read geocoding API key")?;
    if !geocoding_key.trim().is_empty() {
        cfg.geocoding_api_key = Some(geocoding_key.trim().to_string());
    }

    cfg.default_location = Text::new("Default location:")
        .with_default(&cfg.default_location)
        .with_help_message("City,CountryCode, e.g. Vilnius,LT")
        .prompt()
        .context("Failed to read default location")?;
    Location::new(cfg.default_location.as_str())?;

    let starting = Units::all()
        .iter()
        .position(|u| *u == cfg.units)
        .unwrap_or_default();
    cfg.units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(starting)
        .prompt()
        .context("Failed to read units")?;

    let path = cfg.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn show(
    cfg: &Config,
    location: Location,
    day: usize,
    range: ForecastRange,
    with_cities: bool,
) -> anyhow::Result<()> {
    let provider = provider_from_config(cfg)?;
    let mut dash = Dashboard::new(location, cfg.units);

    if let Err(err) = dash.refresh(provider.as_ref()).await {
        return Err(fetch_failure(err));
    }

    dash.set_range(range);
    if day != 0 && dash.select_day(day).is_none() {
        tracing::warn!(day, available = dash.day_count(), "requested day is not in the timeline");
    }

    let today = Local::now().weekday();
    print!("{}", render::dashboard(&dash, today)?);

    if with_cities {
        let cities = compare::cities_for(dash.location());
        let comparison = compare::compare(provider.as_ref(), &cities).await;
        print!("{}", render::comparison(&comparison)?);
    }

    Ok(())
}

/// Configuration errors already tell the user what to fix; request
/// failures get the dashboard's generic message on top.
fn fetch_failure(err: FetchError) -> anyhow::Error {
    if err.is_configuration() {
        anyhow::Error::from(err)
    } else {
        let message = err.user_message();
        anyhow::Error::from(err).context(message)
    }
}

async fn show_comparison(cfg: &Config, location: &Location) -> anyhow::Result<()> {
    let provider = provider_from_config(cfg)?;
    let cities = compare::cities_for(location);
    let comparison = compare::compare(provider.as_ref(), &cities).await;

    print!("{}", render::comparison(&comparison)?);
    Ok(())
}

async fn suggest(cfg: &Config, query: &str, pick: bool) -> anyhow::Result<()> {
    let client = GeocodeClient::from_config(cfg)?;
    let suggestions = client
        .suggest(query)
        .await
        .context("Failed to fetch city suggestions")?;

    if !pick {
        print!("{}", render::suggestions(&suggestions));
        return Ok(());
    }

    if suggestions.is_empty() {
        return Err(anyhow!("No cities match '{query}'"));
    }

    let labels: Vec<String> = suggestions.iter().map(render::suggestion_label).collect();
    let choice = Select::new("City:", labels.clone())
        .prompt()
        .context("Failed to read city choice")?;
    let index = labels.iter().position(|l| *l == choice).unwrap_or_default();
    let location = suggestions[index].to_location()?;

    show(cfg, location, 0, ForecastRange::Week, false).await
}
