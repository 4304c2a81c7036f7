use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    config::DEFAULT_BASE_URL,
    error::{FetchError, ForecastError},
    forecast,
    model::{Coordinates, CurrentConditions, ForecastDay, RawSample, WeatherReport},
    present::round_half_up,
    validate::CityName,
};

use super::WeatherProvider;

const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProviderBuilder {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl OpenWeatherProviderBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenWeatherProvider> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client for OpenWeather")?;

        Ok(OpenWeatherProvider {
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

/// How a single HTTP exchange went wrong, before it is given a domain meaning.
#[derive(Debug)]
enum RequestFailure {
    Transport(String),
    Status { status: StatusCode, body: String },
    Decode(String),
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    pub fn builder(api_key: String) -> OpenWeatherProviderBuilder {
        OpenWeatherProviderBuilder {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, RequestFailure> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, ?params, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str()), ("units", UNITS)])
            .send()
            .await
            .map_err(|e| RequestFailure::Transport(e.to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| RequestFailure::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(RequestFailure::Status { status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|e| RequestFailure::Decode(e.to_string()))
    }

    async fn fetch_current(
        &self,
        params: &[(&str, &str)],
        on_rejected: FetchError,
    ) -> Result<CurrentConditions, FetchError> {
        let parsed: OwCurrentResponse =
            self.get_json("weather", params).await.map_err(|e| match e {
                RequestFailure::Status { status, body } => {
                    debug!(%status, %body, "OpenWeather rejected conditions request");
                    on_rejected
                }
                RequestFailure::Transport(msg) => FetchError::Transport(msg),
                RequestFailure::Decode(msg) => FetchError::MalformedResponse(msg),
            })?;

        parsed.into_conditions()
    }

    async fn fetch_forecast(
        &self,
        coords: Coordinates,
    ) -> Result<Vec<ForecastDay>, ForecastError> {
        let lat = coords.lat.to_string();
        let lon = coords.lon.to_string();

        let parsed: OwForecastResponse = self
            .get_json("forecast", &[("lat", lat.as_str()), ("lon", lon.as_str())])
            .await
            .map_err(|e| match e {
                RequestFailure::Transport(msg) => ForecastError::Request(msg),
                RequestFailure::Status { status, body } => {
                    ForecastError::Status { status: status.as_u16(), body }
                }
                RequestFailure::Decode(msg) => ForecastError::Malformed(msg),
            })?;

        let offset = parsed
            .city
            .as_ref()
            .and_then(|c| c.timezone)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());

        forecast::try_reduce_at(
            parsed.list.unwrap_or_default(),
            offset,
            OwForecastEntry::timestamp,
            OwForecastEntry::into_sample,
        )
    }

    /// Second leg of every lookup. Forecast errors are logged and dropped.
    async fn complete(&self, current: CurrentConditions) -> WeatherReport {
        let forecast = match self.fetch_forecast(current.coordinates).await {
            Ok(days) if days.is_empty() => None,
            Ok(days) => Some(days),
            Err(err) => {
                warn!(
                    error = %err,
                    location = %current.location_name,
                    "forecast unavailable, returning current conditions only"
                );
                None
            }
        };

        WeatherReport { current, forecast }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, city), fields(city = %city))]
    async fn fetch_by_city(&self, city: &CityName) -> Result<WeatherReport, FetchError> {
        let not_found = FetchError::NotFound { city: city.to_string() };
        let current = self.fetch_current(&[("q", city.as_str())], not_found).await?;

        Ok(self.complete(current).await)
    }

    #[instrument(skip(self))]
    async fn fetch_by_coordinates(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherReport, FetchError> {
        let lat = coords.lat.to_string();
        let lon = coords.lon.to_string();
        let params = [("lat", lat.as_str()), ("lon", lon.as_str())];
        let current = self.fetch_current(&params, FetchError::LocationUnavailable).await?;

        Ok(self.complete(current).await)
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<u8>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    dt: Option<i64>,
    coord: Option<OwCoord>,
    main: Option<OwMain>,
    weather: Option<Vec<OwWeather>>,
    wind: Option<OwWind>,
    visibility: Option<u32>,
}

impl OwCurrentResponse {
    fn into_conditions(self) -> Result<CurrentConditions, FetchError> {
        let malformed = |field: &str| FetchError::MalformedResponse(format!("missing `{field}`"));

        let coord = self.coord.ok_or_else(|| malformed("coord"))?;
        let main = self.main.ok_or_else(|| malformed("main"))?;
        let wind = self.wind.ok_or_else(|| malformed("wind"))?;
        let weather = self
            .weather
            .and_then(|w| w.into_iter().next())
            .ok_or_else(|| malformed("weather[0]"))?;

        Ok(CurrentConditions {
            location_name: self.name.ok_or_else(|| malformed("name"))?,
            coordinates: Coordinates {
                lat: coord.lat.ok_or_else(|| malformed("coord.lat"))?,
                lon: coord.lon.ok_or_else(|| malformed("coord.lon"))?,
            },
            temperature_c: round_half_up(main.temp.ok_or_else(|| malformed("main.temp"))?),
            feels_like_c: round_half_up(
                main.feels_like.ok_or_else(|| malformed("main.feels_like"))?,
            ),
            humidity_pct: main.humidity.ok_or_else(|| malformed("main.humidity"))?,
            pressure_hpa: round_half_up(main.pressure.ok_or_else(|| malformed("main.pressure"))?)
                .max(0) as u32,
            wind_speed_mps: wind.speed.ok_or_else(|| malformed("wind.speed"))?,
            wind_deg: wind.deg,
            visibility_m: self.visibility,
            condition: weather.main.ok_or_else(|| malformed("weather[0].main"))?,
            description: weather.description.ok_or_else(|| malformed("weather[0].description"))?,
            observation_time: self.dt.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwCity {
    /// Shift in seconds from UTC.
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: Option<i64>,
    main: Option<OwMain>,
    weather: Option<Vec<OwWeather>>,
}

impl OwForecastEntry {
    fn timestamp(&self) -> Result<DateTime<Utc>, ForecastError> {
        self.dt
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .ok_or_else(|| ForecastError::Malformed("missing `list[].dt`".into()))
    }

    /// Only called for entries that open a new day.
    fn into_sample(self) -> Result<RawSample, ForecastError> {
        let malformed =
            |field: &str| ForecastError::Malformed(format!("missing `list[].{field}`"));

        let timestamp = self.timestamp()?;
        let temperature_c =
            self.main.and_then(|m| m.temp).ok_or_else(|| malformed("main.temp"))?;
        let weather = self
            .weather
            .and_then(|w| w.into_iter().next())
            .ok_or_else(|| malformed("weather[0]"))?;

        Ok(RawSample {
            timestamp,
            temperature_c,
            condition: weather.main.ok_or_else(|| malformed("weather[0].main"))?,
            description: weather.description.ok_or_else(|| malformed("weather[0].description"))?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: Option<OwCity>,
    list: Option<Vec<OwForecastEntry>>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn london() -> serde_json::Value {
        json!({
            "coord": { "lon": -0.1257, "lat": 51.5085 },
            "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
            "main": { "temp": 14.5, "feels_like": 13.6, "humidity": 70, "pressure": 1012 },
            "visibility": 10000,
            "wind": { "speed": 4.12, "deg": 230 },
            "dt": 1_760_878_800,
            "name": "London"
        })
    }

    #[test]
    fn conditions_are_assembled_field_by_field() {
        let parsed: OwCurrentResponse = serde_json::from_value(london()).unwrap();
        let current = parsed.into_conditions().unwrap();

        assert_eq!(current.location_name, "London");
        assert_eq!(current.temperature_c, 15);
        assert_eq!(current.feels_like_c, 14);
        assert_eq!(current.humidity_pct, 70);
        assert_eq!(current.pressure_hpa, 1012);
        assert_eq!(current.coordinates, Coordinates::new(51.5085, -0.1257));
        assert_eq!(current.wind_direction(), Some("SW"));
        assert_eq!(current.visibility_m, Some(10000));
        assert_eq!(current.condition, "Rain");
        assert!(current.observation_time.is_some());
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let mut body = london();
        body["main"].as_object_mut().unwrap().remove("temp");

        let parsed: OwCurrentResponse = serde_json::from_value(body).unwrap();
        let err = parsed.into_conditions().unwrap_err();
        assert_eq!(err, FetchError::MalformedResponse("missing `main.temp`".into()));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let mut body = london();
        body.as_object_mut().unwrap().remove("visibility");
        body["wind"].as_object_mut().unwrap().remove("deg");

        let parsed: OwCurrentResponse = serde_json::from_value(body).unwrap();
        let current = parsed.into_conditions().unwrap();
        assert_eq!(current.visibility_m, None);
        assert_eq!(current.wind_direction(), None);
    }

    #[test]
    fn empty_weather_array_is_malformed() {
        let mut body = london();
        body["weather"] = json!([]);

        let parsed: OwCurrentResponse = serde_json::from_value(body).unwrap();
        assert!(matches!(parsed.into_conditions(), Err(FetchError::MalformedResponse(_))));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
