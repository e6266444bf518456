//! User-facing place bound to one resolved address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::GeoType;
use crate::geocode::LatLng;

/// Shape submitted by the address form: the raw text, optionally with the
/// geocode / place id the browser widget already picked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceInput {
    pub address: String,
    #[serde(default)]
    pub geocode: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
}

/// A place resolved from an address, with one name and one map item
/// reference per political level.
///
/// Levels the provider did not return keep both the name and the item empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoliticalPlace {
    /// `None` until first saved
    #[serde(default)]
    pub id: Option<u64>,

    pub address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,

    /// `"lat,lng"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_area_level_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_area_level_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_area_level_3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublocality: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent_item: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_item: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_area_level_1_item: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_area_level_2_item: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_area_level_3_item: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality_item: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublocality_item: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PoliticalPlace {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            ..Self::default()
        }
    }

    pub fn from_input(input: &PlaceInput) -> Self {
        Self {
            address: input.address.clone(),
            geocode: input.geocode.clone().filter(|g| !g.is_empty()),
            place_id: input.place_id.clone().filter(|p| !p.is_empty()),
            ..Self::default()
        }
    }

    /// Name stored for a level
    pub fn name(&self, level: GeoType) -> Option<&str> {
        let name = match level {
            GeoType::Continent => &self.continent,
            GeoType::Country => &self.country,
            GeoType::AdministrativeAreaLevel1 => &self.administrative_area_level_1,
            GeoType::AdministrativeAreaLevel2 => &self.administrative_area_level_2,
            GeoType::AdministrativeAreaLevel3 => &self.administrative_area_level_3,
            GeoType::Locality => &self.locality,
            GeoType::Sublocality => &self.sublocality,
        };
        name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn set_name(&mut self, level: GeoType, name: Option<String>) {
        match level {
            GeoType::Continent => self.continent = name,
            GeoType::Country => self.country = name,
            GeoType::AdministrativeAreaLevel1 => self.administrative_area_level_1 = name,
            GeoType::AdministrativeAreaLevel2 => self.administrative_area_level_2 = name,
            GeoType::AdministrativeAreaLevel3 => self.administrative_area_level_3 = name,
            GeoType::Locality => self.locality = name,
            GeoType::Sublocality => self.sublocality = name,
        }
    }

    /// Map item id referenced for a level
    pub fn item(&self, level: GeoType) -> Option<u64> {
        match level {
            GeoType::Continent => self.continent_item,
            GeoType::Country => self.country_item,
            GeoType::AdministrativeAreaLevel1 => self.administrative_area_level_1_item,
            GeoType::AdministrativeAreaLevel2 => self.administrative_area_level_2_item,
            GeoType::AdministrativeAreaLevel3 => self.administrative_area_level_3_item,
            GeoType::Locality => self.locality_item,
            GeoType::Sublocality => self.sublocality_item,
        }
    }

    pub fn set_item(&mut self, level: GeoType, item: Option<u64>) {
        match level {
            GeoType::Continent => self.continent_item = item,
            GeoType::Country => self.country_item = item,
            GeoType::AdministrativeAreaLevel1 => self.administrative_area_level_1_item = item,
            GeoType::AdministrativeAreaLevel2 => self.administrative_area_level_2_item = item,
            GeoType::AdministrativeAreaLevel3 => self.administrative_area_level_3_item = item,
            GeoType::Locality => self.locality_item = item,
            GeoType::Sublocality => self.sublocality_item = item,
        }
    }

    /// Drop every level name and item reference
    pub fn clear_levels(&mut self) {
        for level in GeoType::all() {
            self.set_name(*level, None);
            self.set_item(*level, None);
        }
    }

    pub fn location(&self) -> Option<LatLng> {
        self.geocode.as_deref().and_then(|g| g.parse().ok())
    }

    pub fn lat(&self) -> Option<f64> {
        self.location().map(|p| p.lat)
    }

    pub fn lng(&self) -> Option<f64> {
        self.location().map(|p| p.lng)
    }
}

impl fmt::Display for PoliticalPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.formatted_address.as_deref().unwrap_or(&self.address))
    }
}
