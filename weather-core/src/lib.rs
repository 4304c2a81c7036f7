//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - City-name validation and the live input classifier
//! - The OpenWeather client that merges current conditions with a 5-day forecast
//! - Forecast reduction and display mapping (icons, compass, dates)
//! - The search controller, with its geolocation and persistence seams
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod app;
pub mod config;
pub mod error;
pub mod forecast;
pub mod geolocation;
pub mod memo;
pub mod model;
pub mod present;
pub mod provider;
pub mod units;
pub mod validate;

pub use app::{AppContext, Controller, Outcome, Renderer, View};
pub use config::Config;
pub use error::{FetchError, ForecastError, GeolocationError, SearchError, ValidationError};
pub use geolocation::{FixedLocator, Locator, PositionOptions};
pub use memo::{FileMemoStore, InMemoryMemoStore, MemoStore};
pub use model::{Coordinates, CurrentConditions, ForecastDay, RawSample, WeatherReport};
pub use present::{IconKey, direction_for, icon_for};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use validate::{CityName, InputClass, classify, validate};
