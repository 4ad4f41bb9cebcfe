//! Common types used across the registry

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// GPS coordinates (WGS84)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Error raised when a measurement has no usable leading number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasurementError {
    #[error("measurement is empty")]
    Empty,

    #[error("measurement has no leading number: {0}")]
    NotNumeric(String),
}

/// A length as it arrives from survey records: either a bare number or a
/// string carrying a unit suffix such as `"15m"` or `"85cm"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Measurement {
    Number(f64),
    Text(String),
}

impl Measurement {
    /// Numeric value, if one can be read
    pub fn value(&self) -> Option<f64> {
        match self {
            Measurement::Number(n) => Some(*n),
            Measurement::Text(s) => parse_leading_number(s).ok(),
        }
    }

    /// Positive finite value, or `default` when absent, unparsable or not positive
    pub fn positive_or(measurement: Option<&Measurement>, default: f64) -> f64 {
        measurement
            .and_then(Measurement::value)
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(default)
    }
}

impl From<f64> for Measurement {
    fn from(value: f64) -> Self {
        Measurement::Number(value)
    }
}

impl From<&str> for Measurement {
    fn from(value: &str) -> Self {
        Measurement::Text(value.to_string())
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Measurement::Number(n) => write!(f, "{}", n),
            Measurement::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for Measurement {
    type Err = MeasurementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_leading_number(s).map(Measurement::Number)
    }
}

/// Read the longest decimal number at the start of `input`, ignoring
/// leading whitespace and any trailing unit text.
pub fn parse_leading_number(input: &str) -> Result<f64, MeasurementError> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return Err(MeasurementError::Empty);
    }

    let bytes = trimmed.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return Err(MeasurementError::NotNumeric(input.to_string()));
    }

    // Optional exponent, only taken when followed by digits
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    trimmed[..end]
        .parse::<f64>()
        .map_err(|_| MeasurementError::NotNumeric(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_unit_suffix() {
        assert_eq!(parse_leading_number("15m"), Ok(15.0));
        assert_eq!(parse_leading_number("85cm"), Ok(85.0));
        assert_eq!(parse_leading_number(" 12.5 m"), Ok(12.5));
        assert_eq!(parse_leading_number("1.5e1m"), Ok(15.0));
        assert_eq!(parse_leading_number("3em"), Ok(3.0));
        assert_eq!(parse_leading_number(".5"), Ok(0.5));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(parse_leading_number(""), Err(MeasurementError::Empty));
        assert!(matches!(
            parse_leading_number("tall"),
            Err(MeasurementError::NotNumeric(_))
        ));
        assert!(parse_leading_number("-m").is_err());
        assert!(parse_leading_number(".").is_err());
    }

    #[test]
    fn test_positive_or_defaults() {
        let text = Measurement::from("20m");
        let number = Measurement::from(18.0);
        let junk = Measurement::from("unknown");
        let zero = Measurement::from("0m");

        assert_eq!(Measurement::positive_or(Some(&text), 15.0), 20.0);
        assert_eq!(Measurement::positive_or(Some(&number), 15.0), 18.0);
        assert_eq!(Measurement::positive_or(Some(&junk), 15.0), 15.0);
        assert_eq!(Measurement::positive_or(Some(&zero), 15.0), 15.0);
        assert_eq!(Measurement::positive_or(None, 30.0), 30.0);
    }

    #[test]
    fn test_measurement_deserializes_number_or_string() {
        let number: Measurement = serde_json::from_str("12").unwrap();
        let text: Measurement = serde_json::from_str("\"12m\"").unwrap();

        assert_eq!(number, Measurement::Number(12.0));
        assert_eq!(text, Measurement::Text("12m".to_string()));
        assert_eq!(text.value(), Some(12.0));
    }
}
