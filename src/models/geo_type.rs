//! Geographic classification levels tracked by the place hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlacesError;

/// Political level of a region, broadest first.
///
/// Providers return many more component tags (`route`, `postal_code`,
/// `sublocality_level_1`, ...). Only these seven are tracked; anything else
/// is ignored by [`GeoType::from_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum GeoType {
    /// Synthetic level, never returned by the provider
    #[serde(rename = "continent")]
    Continent,
    #[serde(rename = "country")]
    Country,
    /// Region / state
    #[serde(rename = "administrative_area_level_1")]
    AdministrativeAreaLevel1,
    /// Province / county
    #[serde(rename = "administrative_area_level_2")]
    AdministrativeAreaLevel2,
    /// Municipality
    #[serde(rename = "administrative_area_level_3")]
    AdministrativeAreaLevel3,
    #[serde(rename = "locality")]
    Locality,
    #[serde(rename = "sublocality")]
    Sublocality,
}

impl GeoType {
    /// Parse a provider type tag, `None` for tags that are not tracked
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "continent" => Some(GeoType::Continent),
            "country" => Some(GeoType::Country),
            "administrative_area_level_1" => Some(GeoType::AdministrativeAreaLevel1),
            "administrative_area_level_2" => Some(GeoType::AdministrativeAreaLevel2),
            "administrative_area_level_3" => Some(GeoType::AdministrativeAreaLevel3),
            "locality" => Some(GeoType::Locality),
            "sublocality" => Some(GeoType::Sublocality),
            _ => None,
        }
    }

    /// The provider tag / field name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoType::Continent => "continent",
            GeoType::Country => "country",
            GeoType::AdministrativeAreaLevel1 => "administrative_area_level_1",
            GeoType::AdministrativeAreaLevel2 => "administrative_area_level_2",
            GeoType::AdministrativeAreaLevel3 => "administrative_area_level_3",
            GeoType::Locality => "locality",
            GeoType::Sublocality => "sublocality",
        }
    }

    /// Get all levels in hierarchical order (continent first)
    pub fn all() -> &'static [GeoType] {
        &[
            GeoType::Continent,
            GeoType::Country,
            GeoType::AdministrativeAreaLevel1,
            GeoType::AdministrativeAreaLevel2,
            GeoType::AdministrativeAreaLevel3,
            GeoType::Locality,
            GeoType::Sublocality,
        ]
    }

    /// Levels that can appear as address components, broadest first
    pub fn component_levels() -> &'static [GeoType] {
        &GeoType::all()[1..]
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, GeoType::Continent)
    }
}

impl fmt::Display for GeoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeoType {
    type Err = PlacesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeoType::from_tag(s.trim()).ok_or_else(|| PlacesError::UnknownGeoType(s.to_string()))
    }
}
