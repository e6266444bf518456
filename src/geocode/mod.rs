//! Geocoding provider boundary.

mod client;
#[cfg(test)]
pub(crate) mod fixture;
mod types;

pub use client::{Geocoder, GoogleGeocoder};
pub use types::{AddressComponent, GeocodeResult, Geometry, LatLng};
