use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use weather_core::{
    AppContext, Config, Controller, Coordinates, FileMemoStore, FixedLocator, InputClass, Outcome,
    provider_from_config,
};

use crate::render::TerminalRenderer;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name; defaults to the last successful search.
        city: Option<String>,
    },

    /// Show weather at the given position.
    Here {
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,
    },

    /// Check whether a city name would be accepted, without searching.
    Check {
        text: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => {
                let controller = controller(None)?;
                let query = match city {
                    Some(city) => city,
                    None => controller.restore_last_city().await.unwrap_or_default(),
                };
                Ok(exit_code(&controller.search(&query).await))
            }
            Command::Here { lat, lon } => {
                let coords = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
                let controller = controller(coords)?;
                Ok(exit_code(&controller.use_my_location().await))
            }
            Command::Check { text } => {
                let verdict = match weather_core::classify(&text) {
                    InputClass::Blank => "blank",
                    InputClass::Valid => "valid",
                    InputClass::Invalid => "invalid",
                };
                println!("{verdict}");
                Ok(if verdict == "valid" { ExitCode::SUCCESS } else { ExitCode::FAILURE })
            }
        }
    }
}

fn controller(
    coords: Option<Coordinates>,
) -> anyhow::Result<Controller<TerminalRenderer, FileMemoStore>> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let store = FileMemoStore::open_default()?;

    let ctx = AppContext::new(Arc::from(provider), Arc::new(FixedLocator::new(coords)));
    Ok(Controller::new(ctx, TerminalRenderer::stdout(), store))
}

fn configure() -> anyhow::Result<ExitCode> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Create one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(ExitCode::SUCCESS)
}

fn exit_code(outcome: &Outcome) -> ExitCode {
    match outcome {
        Outcome::Shown => ExitCode::SUCCESS,
        Outcome::Rejected | Outcome::Failed(_) | Outcome::Superseded => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_here_with_negative_longitude() {
        let args = ["weather", "here", "--lat", "51.5", "--lon", "-0.12"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Here { lat, lon } => {
                assert_eq!(lat, Some(51.5));
                assert_eq!(lon, Some(-0.12));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn here_requires_both_coordinates() {
        assert!(Cli::try_parse_from(["weather", "here", "--lat", "51.5"]).is_err());
    }

    #[test]
    fn show_city_is_optional() {
        let cli = Cli::try_parse_from(["weather", "-v", "show"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, Command::Show { city: None }));
    }
}
