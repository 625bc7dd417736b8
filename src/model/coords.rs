//! Geographic coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// A latitude/longitude pair in decimal degrees.
///
/// Serialized as a two-element array, `[lat, lng]`. Longitudes past ±180
/// are kept as-is: a map that repeats the world horizontally reports them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    lat: f64,
    lng: f64,
}

impl Coords {
    /// Both components must be finite.
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValidationError> {
        if !(lat.is_finite() && lng.is_finite()) {
            return Err(ValidationError::NonFiniteCoords { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    /// Rejects latitudes outside `[-90, 90]` and longitudes outside
    /// `[-180, 180]`. Applied to typed-in locations only.
    pub fn within_range(self) -> Result<Self, ValidationError> {
        let lat_ok = (-90.0..=90.0).contains(&self.lat);
        let lng_ok = (-180.0..=180.0).contains(&self.lng);
        if !(lat_ok && lng_ok) {
            return Err(ValidationError::CoordsOutOfRange {
                lat: self.lat,
                lng: self.lng,
            });
        }
        Ok(self)
    }

    pub fn lat(self) -> f64 {
        self.lat
    }

    pub fn lng(self) -> f64 {
        self.lng
    }
}

impl TryFrom<[f64; 2]> for Coords {
    type Error = ValidationError;

    fn try_from([lat, lng]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(lat, lng)
    }
}

impl From<Coords> for [f64; 2] {
    fn from(coords: Coords) -> Self {
        [coords.lat, coords.lng]
    }
}

/// Parses `"<lat>,<lng>"`, whitespace around either number allowed.
/// Both components must be within range.
impl FromStr for Coords {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedCoords(s.to_string());
        let (lat, lng) = s.split_once(',').ok_or_else(malformed)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| malformed())?;
        let lng = lng.trim().parse::<f64>().map_err(|_| malformed())?;
        Self::new(lat, lng)?.within_range()
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}
