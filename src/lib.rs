//! politicalplaces - resolve free-text addresses into a normalized hierarchy
//! of political regions.
//!
//! An address is geocoded once, split into its political levels, and every
//! level is stored as a shared [`MapItem`] linked to its parent, from a
//! synthetic continent down to the sublocality.

pub mod config;
pub mod continent;
pub mod error;
pub mod geocode;
pub mod models;
pub mod resolver;
pub mod slug;
pub mod store;

pub use error::{PlacesError, Result};
pub use geocode::{Geocoder, GoogleGeocoder};
pub use models::{GeoType, MapItem, PlaceInput, PoliticalPlace};
pub use resolver::{MapItemResolver, PoliticalPlaceResolver};
pub use store::PlaceStore;
