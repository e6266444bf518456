//! Geocoding provider response types.
//!
//! These mirror the provider's JSON result shape so HTTP responses deserialize
//! directly into them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::GeoType;

/// Geographic point (lat/lng)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in kilometres
    pub fn distance_km(&self, other: &LatLng) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlng = (other.lng - self.lng).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

/// Formats as the stored `"lat,lng"` geocode text
impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for LatLng {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected 'lat,lng', got '{}'", s))?;
        let lat = lat.trim().parse::<f64>().map_err(|e| e.to_string())?;
        let lng = lng.trim().parse::<f64>().map_err(|e| e.to_string())?;
        Ok(Self { lat, lng })
    }
}

/// One labeled part of a geocode result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    pub fn has_type(&self, geo_type: GeoType) -> bool {
        self.types.iter().any(|t| t == geo_type.as_str())
    }

    /// Tracked levels tagged on this component, untracked tags skipped
    pub fn geo_types(&self) -> impl Iterator<Item = GeoType> + '_ {
        self.types.iter().filter_map(|t| GeoType::from_tag(t))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

/// A single provider result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    pub geometry: Geometry,
    pub place_id: String,
    /// Result-level type tags (e.g. `["administrative_area_level_1", "political"]`)
    #[serde(default)]
    pub types: Vec<String>,
}

impl GeocodeResult {
    /// The most specific component, which describes the result itself
    pub fn primary_component(&self) -> Option<&AddressComponent> {
        self.address_components.first()
    }

    /// First component tagged with `geo_type`, in provider order.
    ///
    /// A component carrying several tracked tags can answer for more than one
    /// level.
    pub fn component_for(&self, geo_type: GeoType) -> Option<&AddressComponent> {
        self.address_components.iter().find(|c| c.has_type(geo_type))
    }

    /// The tracked level this result describes: first recognized result-level
    /// tag, falling back to the primary component's tags
    pub fn geo_type(&self) -> Option<GeoType> {
        self.types
            .iter()
            .find_map(|t| GeoType::from_tag(t))
            .or_else(|| self.primary_component().and_then(|c| c.geo_types().next()))
    }

    /// Comma-joined type tags, preferring the result-level list
    pub fn types_csv(&self) -> String {
        if !self.types.is_empty() {
            return self.types.join(",");
        }
        self.primary_component()
            .map(|c| c.types.join(","))
            .unwrap_or_default()
    }
}
