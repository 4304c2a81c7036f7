use std::fmt;

use serde::Serialize;

use crate::error::ValidationError;

pub const MIN_LEN: usize = 2;
pub const MAX_LEN: usize = 50;

/// Lowercased inputs that look like form-field placeholders rather than places.
const REJECTED: &[&str] = &[
    "country", "state", "province", "region", "zip", "postal", "code", "number", "123", "test",
    "demo",
];

/// A trimmed city name that passed [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CityName(String);

impl CityName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for CityName {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate(value)
    }
}

/// Live feedback for a partially typed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputClass {
    /// Nothing but whitespace; no styling.
    Blank,
    Valid,
    Invalid,
}

/// Gatekeeper for city-name input.
///
/// Rules are checked in order, so an all-whitespace input is always `Empty`.
pub fn validate(raw: &str) -> Result<CityName, ValidationError> {
    let city = raw.trim();

    if city.is_empty() {
        return Err(ValidationError::Empty);
    }

    if !city.chars().all(is_allowed_char) {
        return Err(ValidationError::InvalidCharacters);
    }

    // Only ASCII remains, so byte length equals character count.
    if city.len() < MIN_LEN {
        return Err(ValidationError::TooShort);
    }
    if city.len() > MAX_LEN {
        return Err(ValidationError::TooLong);
    }

    let lower = city.to_ascii_lowercase();
    if REJECTED.contains(&lower.as_str()) || city.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::Disallowed);
    }

    Ok(CityName(city.to_owned()))
}

/// Non-failing twin of [`validate`] used for input styling.
pub fn classify(raw: &str) -> InputClass {
    if raw.trim().is_empty() {
        InputClass::Blank
    } else if validate(raw).is_ok() {
        InputClass::Valid
    } else {
        InputClass::Invalid
    }
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c.is_ascii_whitespace() || c == '-' || c == '\''
}
