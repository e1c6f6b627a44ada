use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use weathery_core::{
    Config, CredentialResolver, DashboardController, DashboardStatus, FileCredentialStore,
    Location, OpenWeatherGateway,
    display::{MapLayer, map_url},
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathery", version, about = "Weather dashboard for Philippine cities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and show the dashboard for a city.
    Show {
        /// City id, e.g. "manila" or "cebu". Defaults to the configured city.
        #[arg(long, value_parser = parse_city)]
        city: Option<&'static Location>,

        /// Print the raw view state as JSON.
        #[arg(long)]
        json: bool,

        /// Do not ask for an API key when none is available.
        #[arg(long)]
        no_prompt: bool,
    },

    /// List the available cities.
    Cities,

    /// Save an OpenWeatherMap API key.
    Configure,

    /// Print a weather-map link for a city.
    Map {
        #[arg(long, value_parser = parse_city)]
        city: Option<&'static Location>,

        /// temp_new, precipitation_new, clouds_new, wind_new or pressure_new.
        #[arg(long, default_value = "temp_new", value_parser = parse_layer)]
        layer: MapLayer,

        #[arg(long)]
        zoom: Option<u8>,
    },
}

fn parse_city(value: &str) -> Result<&'static Location, String> {
    Location::find(value).map_err(|err| {
        let ids: Vec<_> = Location::all().iter().map(|loc| loc.id).collect();
        format!("{err}. Available cities: {}", ids.join(", "))
    })
}

fn parse_layer(value: &str) -> Result<MapLayer, String> {
    MapLayer::try_from(value).map_err(|err| err.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        config.apply_env();

        match self.command {
            Command::Show { city, json, no_prompt } => {
                show(&config, city, json, no_prompt).await?;
            }
            Command::Cities => {
                for loc in Location::all() {
                    println!("{:<12} {:<12} {:>8.4} {:>9.4}", loc.id, loc.display_name, loc.lat, loc.lon);
                }
            }
            Command::Configure => {
                let key = inquire::Password::new("OpenWeatherMap API key:")
                    .without_confirmation()
                    .prompt()
                    .context("Failed to read API key")?;

                if key.trim().is_empty() {
                    println!("No key entered, nothing saved.");
                } else {
                    credentials(&config)?.persist(&key);
                    println!("API key saved.");
                    if config.api_key.is_some() {
                        println!("Note: the configured key (OPENWEATHER_API_KEY or config.toml) still takes precedence.");
                    }
                }
            }
            Command::Map { city, layer, zoom } => {
                let location = city.unwrap_or_else(|| weathery_core::resolve_location(&config.default_location));
                println!("{}", map_url(location, layer, zoom.unwrap_or(config.map_zoom)));
            }
        }

        Ok(())
    }
}

fn credentials(config: &Config) -> anyhow::Result<Arc<CredentialResolver>> {
    let store = FileCredentialStore::in_config_dir()?;
    Ok(Arc::new(CredentialResolver::from_config(config, Box::new(store))))
}

async fn show(
    config: &Config,
    city: Option<&'static Location>,
    json: bool,
    no_prompt: bool,
) -> anyhow::Result<()> {
    let creds = credentials(config)?;
    let gateway = OpenWeatherGateway::from_config(config, creds.clone())
        .context("Failed to build HTTP client")?;
    let controller = DashboardController::from_config(config, Arc::new(gateway), creds);

    let location_id = city.map_or(config.default_location.as_str(), |loc| loc.id);
    let mut state = controller.change_location(location_id).await;

    while state.status == DashboardStatus::CredentialMissing && !no_prompt && !json {
        render::credential_prompt(&state);

        let key = inquire::Text::new("API key (leave empty to quit):")
            .prompt()
            .context("Failed to read API key")?;
        if key.trim().is_empty() {
            break;
        }

        state = controller.save_credential(&key).await;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else if state.status == DashboardStatus::CredentialMissing {
        render::credential_prompt(&state);
    } else {
        render::dashboard(&state, config.map_zoom)?;
    }

    Ok(())
}
