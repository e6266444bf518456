//! Normalized region node of the place hierarchy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::GeoType;
use crate::geocode::LatLng;
use crate::slug::slugify;

/// Where a map item's data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemSource {
    /// Fetched from the geocoding provider (has geocode and place id)
    Provider,
    /// Derived locally from the continent table, no provider identity
    Synthetic,
}

/// A cached political region.
///
/// Identity is `place_id` when present, otherwise `(long_name, geo_type)`
/// compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapItem {
    pub id: u64,
    pub geo_type: GeoType,
    pub long_name: String,
    pub short_name: String,
    /// Comma-joined provider type tags
    #[serde(default)]
    pub types: String,
    /// `"lat,lng"`
    #[serde(default)]
    pub geocode: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
    /// First established parent; never overwritten
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default)]
    pub(crate) relative_url: Option<String>,
    pub source: ItemSource,
    pub updated_at: DateTime<Utc>,
}

/// Provider data written by an upsert
#[derive(Debug, Clone, PartialEq)]
pub struct MapItemData {
    pub geo_type: GeoType,
    pub long_name: String,
    pub short_name: String,
    pub types: String,
    pub geocode: Option<String>,
    pub place_id: Option<String>,
}

impl MapItem {
    pub(crate) fn from_data(id: u64, data: MapItemData) -> Self {
        let mut item = Self {
            id,
            geo_type: data.geo_type,
            long_name: String::new(),
            short_name: String::new(),
            types: String::new(),
            geocode: None,
            place_id: None,
            parent: None,
            relative_url: None,
            source: ItemSource::Provider,
            updated_at: Utc::now(),
        };
        item.apply(data);
        item
    }

    /// A continent node: no geocode, no place id, no parent
    pub(crate) fn continent(id: u64, name: &str) -> Self {
        Self {
            id,
            geo_type: GeoType::Continent,
            long_name: name.to_string(),
            short_name: name.to_string(),
            types: GeoType::Continent.as_str().to_string(),
            geocode: None,
            place_id: None,
            parent: None,
            relative_url: Some(format!("/{}", slugify(name))),
            source: ItemSource::Synthetic,
            updated_at: Utc::now(),
        }
    }

    /// Overwrite provider fields, keeping identity, level, parent and URL
    pub(crate) fn apply(&mut self, data: MapItemData) {
        self.long_name = data.long_name;
        self.short_name = data.short_name;
        self.types = data.types;
        if data.geocode.is_some() {
            self.geocode = data.geocode;
        }
        if data.place_id.is_some() {
            self.place_id = data.place_id;
        }
        self.source = ItemSource::Provider;
        self.updated_at = Utc::now();
    }

    pub fn relative_url(&self) -> Option<&str> {
        self.relative_url.as_deref()
    }

    /// Slug of the short name, falling back to the long name
    pub fn slug(&self) -> String {
        let name = if self.short_name.is_empty() {
            &self.long_name
        } else {
            &self.short_name
        };
        slugify(name)
    }

    /// Slug path children extend: the URL without this item's trailing id.
    /// Continent URLs carry no id.
    pub fn url_prefix(&self) -> Option<String> {
        let url = self.relative_url.as_deref()?;
        if self.geo_type.is_synthetic() {
            return Some(url.to_string());
        }
        url.strip_suffix(&format!("/{}", self.id)).map(str::to_string)
    }

    /// URL under a parent prefix: `{prefix}/{slug}/{id}`
    pub(crate) fn url_under(&self, parent_prefix: &str) -> String {
        format!("{}/{}/{}", parent_prefix, self.slug(), self.id)
    }

    pub fn location(&self) -> Option<LatLng> {
        self.geocode.as_deref().and_then(|g| g.parse().ok())
    }

    /// Identity key for name-based matching
    pub fn name_key(geo_type: GeoType, long_name: &str) -> String {
        format!("{}|{}", geo_type.as_str(), long_name.trim().to_lowercase())
    }
}

impl fmt::Display for MapItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.long_name, self.geo_type)
    }
}
