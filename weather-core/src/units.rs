use serde::{Deserialize, Serialize};

use crate::present::round_half_up;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

/// Converts and rounds; identical units return the value unchanged.
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> f64 {
    match (from, to) {
        (TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit) => {
            round_half_up(value * 9.0 / 5.0 + 32.0) as f64
        }
        (TemperatureUnit::Fahrenheit, TemperatureUnit::Celsius) => {
            round_half_up((value - 32.0) * 5.0 / 9.0) as f64
        }
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TemperatureUnit::*;

    #[test]
    fn converts_both_ways() {
        assert_eq!(convert_temperature(100.0, Celsius, Fahrenheit), 212.0);
        assert_eq!(convert_temperature(-40.0, Fahrenheit, Celsius), -40.0);
        assert_eq!(convert_temperature(70.0, Fahrenheit, Celsius), 21.0);
    }

    #[test]
    fn same_unit_is_untouched() {
        assert_eq!(convert_temperature(21.37, Celsius, Celsius), 21.37);
    }
}
