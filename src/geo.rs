//! # Roof Geometry Capability
//!
//! The narrow surface the rest of the service needs from a mapping provider:
//! geodesic area of a drawn polygon, and address-to-coordinate lookup behind
//! the [`Geocoder`] trait. Rendering and drawing stay on the client side.

use anyhow::Result;
use async_trait::async_trait;
use std::f64::consts::PI;

use crate::domain::{LatLng, Location};

/// Earth equatorial radius in meters (WGS84), the radius mapping SDKs use
/// for spherical geometry.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Area of a lat/lng ring on the Earth sphere, in m².
///
/// Spherical-excess sum over polar triangles, matching what mapping SDKs
/// compute for a drawn path. Winding order does not matter; the result is
/// always non-negative. Fewer than three vertices is a degenerate path and
/// yields `0.0`.
pub fn polygon_area_m2(path: &[LatLng]) -> f64 {
    if path.len() < 3 {
        return 0.0;
    }

    // Signed spherical excess, accumulated edge by edge against the closing
    // vertex.
    let last = path[path.len() - 1];
    let mut prev_tan_lat = ((PI / 2.0 - last.lat.to_radians()) / 2.0).tan();
    let mut prev_lng = last.lng.to_radians();

    let mut total = 0.0;
    for point in path {
        let tan_lat = ((PI / 2.0 - point.lat.to_radians()) / 2.0).tan();
        let lng = point.lng.to_radians();
        total += polar_triangle_area(tan_lat, lng, prev_tan_lat, prev_lng);
        prev_tan_lat = tan_lat;
        prev_lng = lng;
    }

    (total * EARTH_RADIUS_M * EARTH_RADIUS_M).abs()
}

/// Signed area of the triangle (pole, point 1, point 2). `tan1`/`tan2` are
/// the half-colatitude tangents of the two points.
fn polar_triangle_area(tan1: f64, lng1: f64, tan2: f64, lng2: f64) -> f64 {
    let delta_lng = lng1 - lng2;
    let t = tan1 * tan2;
    2.0 * (t * delta_lng.sin()).atan2(1.0 + t * delta_lng.cos())
}

/// Resolves a street address to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Location>;
}

/// Stub geocoder returning a fixed San Francisco coordinate for every query.
///
/// Stands in until a real geocoding provider is wired up; the seam is what
/// matters. The queried address is echoed back on the result.
#[derive(Debug, Clone, Default)]
pub struct FixedGeocoder;

impl FixedGeocoder {
    pub const LAT: f64 = 37.7749;
    pub const LNG: f64 = -122.4194;
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, address: &str) -> Result<Location> {
        Ok(Location::with_address(Self::LAT, Self::LNG, address))
    }
}
