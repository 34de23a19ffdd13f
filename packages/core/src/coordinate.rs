//! Coordinates as they arrive from upstream, numeric or text.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A latitude or longitude value.
///
/// The jobs API sends coordinates as strings while webhooks usually send
/// numbers. Both are kept verbatim on the wire, integers included, so relayed
/// events match what was posted; [`Coordinate::normalized`] converts text once
/// a client takes ownership of the job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(Number),
    Text(String),
}

impl Coordinate {
    /// Numeric value if the coordinate is a finite number or parses as one.
    pub fn value(&self) -> Option<f64> {
        match self {
            Coordinate::Number(value) => value.as_f64().filter(|v| v.is_finite()),
            Coordinate::Text(text) => parse_text(text),
        }
    }

    /// Replace parseable text with its number. Unparseable text stays as is.
    pub fn normalized(self) -> Self {
        match self {
            Coordinate::Text(text) => match parse_text(&text).and_then(Number::from_f64) {
                Some(value) => Coordinate::Number(value),
                None => Coordinate::Text(text),
            },
            number => number,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Coordinate::Number(_)) && self.value().is_some()
    }
}

fn parse_text(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl From<f64> for Coordinate {
    /// Non-finite values have no JSON number form and are kept as text.
    fn from(value: f64) -> Self {
        match Number::from_f64(value) {
            Some(number) => Coordinate::Number(number),
            None => Coordinate::Text(value.to_string()),
        }
    }
}

impl From<&str> for Coordinate {
    fn from(value: &str) -> Self {
        Coordinate::Text(value.to_string())
    }
}

impl From<String> for Coordinate {
    fn from(value: String) -> Self {
        Coordinate::Text(value)
    }
}

/// A point on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}
