use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::present::{self, IconKey};

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Snapshot of the weather at one location, temperatures already rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub coordinates: Coordinates,
    pub temperature_c: i64,
    pub feels_like_c: i64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    pub wind_deg: Option<f64>,
    pub visibility_m: Option<u32>,
    /// Primary condition label, e.g. "Rain".
    pub condition: String,
    /// Human description, e.g. "light rain".
    pub description: String,
    pub observation_time: Option<DateTime<Utc>>,
}

impl CurrentConditions {
    pub fn icon(&self) -> IconKey {
        present::icon_for(&self.condition)
    }

    pub fn wind_direction(&self) -> Option<&'static str> {
        self.wind_deg.map(present::direction_for)
    }
}

/// One 3-hour forecast sample as returned by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub condition: String,
    pub description: String,
}

/// One summarized forecast day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Day-of-week label, "Sun" through "Sat".
    pub day: String,
    pub temperature_c: i64,
    pub description: String,
    pub icon: IconKey,
}

/// Result of a successful lookup.
///
/// `forecast` is `None` when the forecast request failed or produced no days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Option<Vec<ForecastDay>>,
}

impl WeatherReport {
    pub fn is_degraded(&self) -> bool {
        self.forecast.is_none()
    }
}
