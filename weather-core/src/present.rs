//! Display helpers: condition icons, compass directions and date text.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Icon names understood by the render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IconKey {
    Sun,
    #[default]
    Cloud,
    CloudRain,
    Snowflake,
    Bolt,
    CloudDrizzle,
    Smog,
    Wind,
    Tornado,
}

impl IconKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconKey::Sun => "sun",
            IconKey::Cloud => "cloud",
            IconKey::CloudRain => "cloud-rain",
            IconKey::Snowflake => "snowflake",
            IconKey::Bolt => "bolt",
            IconKey::CloudDrizzle => "cloud-drizzle",
            IconKey::Smog => "smog",
            IconKey::Wind => "wind",
            IconKey::Tornado => "tornado",
        }
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match on the service's primary condition label.
pub fn icon_for(condition: &str) -> IconKey {
    match condition {
        "Clear" => IconKey::Sun,
        "Clouds" => IconKey::Cloud,
        "Rain" => IconKey::CloudRain,
        "Snow" => IconKey::Snowflake,
        "Thunderstorm" => IconKey::Bolt,
        "Drizzle" => IconKey::CloudDrizzle,
        "Mist" | "Fog" | "Haze" | "Smoke" | "Dust" | "Sand" | "Ash" => IconKey::Smog,
        "Squall" => IconKey::Wind,
        "Tornado" => IconKey::Tornado,
        _ => IconKey::default(),
    }
}

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// 8-point compass label for a wind bearing in degrees.
///
/// Total over every finite input; negative bearings wrap the same way.
pub fn direction_for(degrees: f64) -> &'static str {
    let sector = round_half_up(degrees / 45.0).rem_euclid(8);
    COMPASS[sector as usize]
}

/// Nearest integer, halves going towards positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Meters to kilometers with one decimal, e.g. `"10.0"`.
pub fn visibility_km(meters: u32) -> String {
    format!("{:.1}", f64::from(meters) / 1000.0)
}

/// "Monday, October 19, 2026"
pub fn format_long_date(date: NaiveDate) -> String {
    format!("{}, {} {}, {}", date.format("%A"), date.format("%B"), date.day(), date.year())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => TimeOfDay::Night,
            6..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Night => "night",
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_conditions_map_to_icons() {
        assert_eq!(icon_for("Rain"), IconKey::CloudRain);
        assert_eq!(icon_for("Clear"), IconKey::Sun);
        assert_eq!(icon_for("Haze"), IconKey::Smog);
        assert_eq!(icon_for("Squall").as_str(), "wind");
        assert_eq!(icon_for("Drizzle").as_str(), "cloud-drizzle");
    }

    #[test]
    fn unknown_condition_falls_back_to_cloud() {
        assert_eq!(icon_for("Plasma"), IconKey::Cloud);
        assert_eq!(icon_for("rain"), IconKey::Cloud);
        assert_eq!(icon_for(""), IconKey::Cloud);
    }

    #[test]
    fn compass_rounding_and_wrap() {
        assert_eq!(direction_for(0.0), "N");
        assert_eq!(direction_for(44.0), "NE");
        assert_eq!(direction_for(22.0), "N");
        assert_eq!(direction_for(22.5), "NE");
        assert_eq!(direction_for(225.0), "SW");
        assert_eq!(direction_for(315.0), "NW");
        assert_eq!(direction_for(350.0), "N");
        assert_eq!(direction_for(360.0), "N");
        assert_eq!(direction_for(720.0), "N");
        assert_eq!(direction_for(-90.0), "W");
    }

    #[test]
    fn rounds_halves_up() {
        assert_eq!(round_half_up(14.5), 15);
        assert_eq!(round_half_up(14.49), 14);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
    }

    #[test]
    fn long_date_is_english() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(format_long_date(date), "Monday, October 19, 2026");
    }

    #[test]
    fn time_of_day_buckets() {
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(6), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(23).as_str(), "evening");
    }

    #[test]
    fn visibility_has_one_decimal() {
        assert_eq!(visibility_km(10000), "10.0");
        assert_eq!(visibility_km(8500), "8.5");
    }
}
