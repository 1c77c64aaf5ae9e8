use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_finite;

/// WGS84 coordinate pair, degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct LatLng {
    #[validate(range(min = -90.0, max = 90.0), custom(function = validate_finite))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0), custom(function = validate_finite))]
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lng)
    }
}

/// A geocoded property position, with the queried address when one was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0), custom(function = validate_finite))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0), custom(function = validate_finite))]
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            address: None,
        }
    }

    pub fn with_address(lat: f64, lng: f64, address: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            address: Some(address.into()),
        }
    }
}

/// Compass orientation of a roof section.
///
/// Descriptive only: the estimation formula does not consume it yet, but it is
/// part of the accepted shape and is forwarded to the narrative collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Orientation {
    North,
    South,
    East,
    West,
    #[default]
    Unknown,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
            Self::Unknown => "Unknown",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Orientation {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "north" => Ok(Self::North),
            "south" => Ok(Self::South),
            "east" => Ok(Self::East),
            "west" => Ok(Self::West),
            "unknown" => Ok(Self::Unknown),
            _ => Err("invalid orientation; expected North/South/East/West/Unknown"),
        }
    }
}

/// Roof geometry as produced by the mapping collaborator.
///
/// `area_m2` is the only field the estimation engine reads. Zero is a valid
/// area meaning "nothing drawn" and yields an all-zero estimate. Negative or
/// non-finite areas are out of domain and are rejected at the boundary via
/// [`Validate`] before the engine ever sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RoofGeometry {
    /// Total drawn roof area in square meters.
    #[validate(range(min = 0.0), custom(function = validate_finite))]
    pub area_m2: f64,
    /// Perimeter drawn on the satellite map. May be empty when the caller
    /// supplies a pre-measured area.
    #[serde(default)]
    #[validate(nested)]
    pub polygon: Vec<LatLng>,
    #[serde(default)]
    pub orientation: Orientation,
}

impl RoofGeometry {
    /// Geometry from a bare area, without perimeter points.
    pub fn from_area(area_m2: f64, orientation: Orientation) -> Self {
        Self {
            area_m2,
            polygon: Vec::new(),
            orientation,
        }
    }
}
