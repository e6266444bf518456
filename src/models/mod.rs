//! Core data models for the place hierarchy.

pub mod geo_type;
pub mod map_item;
pub mod political_place;

pub use geo_type::GeoType;
pub use map_item::{ItemSource, MapItem, MapItemData};
pub use political_place::{PlaceInput, PoliticalPlace};
