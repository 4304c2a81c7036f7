use crate::{
    Config,
    error::FetchError,
    model::{Coordinates, WeatherReport},
    provider::openweather::OpenWeatherProvider,
    validate::CityName,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A weather service able to produce a merged conditions + forecast report.
///
/// Forecast failures never surface here: implementations return the current
/// conditions with an absent forecast instead.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_by_city(&self, city: &CityName) -> Result<WeatherReport, FetchError>;

    async fn fetch_by_coordinates(&self, coords: Coordinates)
    -> Result<WeatherReport, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.resolve_api_key()?;
    let provider = OpenWeatherProvider::builder(api_key)
        .base_url(config.base_url.clone())
        .timeout(config.request_timeout())
        .build()?;

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_works_when_key_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
