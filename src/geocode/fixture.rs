//! Canned provider responses for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{AddressComponent, GeocodeResult, Geocoder, Geometry, LatLng};
use crate::error::{PlacesError, Result};

const POLITICAL: &str = "political";
const COUNTRY: &str = "country";
const ADMIN1: &str = "administrative_area_level_1";
const ADMIN2: &str = "administrative_area_level_2";
const ADMIN3: &str = "administrative_area_level_3";
const LOCALITY: &str = "locality";

pub const ROME_PLACE_ID: &str = "ChIJu46S-ZZhLxMROG5lkwZ3D7k";
pub const LAZIO_PLACE_ID: &str = "ChIJNWU6NebuJBMRKYWj8WSQSm8";
pub const GASTINELLI_ADDRESS: &str = "via Luigi Gastinelli 118, Rome, Italy";
pub const GASTINELLI_PLACE_ID: &str = "ChIJ8XlpK6hjLxMRvW4YmcLb6hE";
/// One component tagged as both region and locality
pub const PRAGUE_CITY_ADDRESS: &str = "Prague city";
pub const PRAGUE_CITY_PLACE_ID: &str = "ChIJ5Ql2oayUC0cRkEAWZg-vAAQ";

/// In-memory [`Geocoder`] answering from fixed results
pub struct StaticGeocoder {
    by_address: HashMap<String, Vec<GeocodeResult>>,
    by_place_id: HashMap<String, Vec<GeocodeResult>>,
    calls: AtomicUsize,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self {
            by_address: HashMap::new(),
            by_place_id: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Register a result under an address query and under its own place id
    pub fn with(mut self, address: &str, result: GeocodeResult) -> Self {
        self.by_place_id
            .entry(result.place_id.clone())
            .or_insert_with(|| vec![result.clone()]);
        self.by_address
            .entry(address.to_string())
            .or_default()
            .push(result);
        self
    }

    /// Total provider calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.by_address
            .get(address)
            .cloned()
            .ok_or_else(|| PlacesError::NoResults(address.to_string()))
    }

    async fn geocode_by_place_id(&self, place_id: &str) -> Result<Vec<GeocodeResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Unknown ids are rejected by the provider as malformed requests.
        self.by_place_id
            .get(place_id)
            .cloned()
            .ok_or_else(|| PlacesError::Transport(format!("INVALID_REQUEST {}", place_id)))
    }
}

fn component(long_name: &str, short_name: &str, types: &[&str]) -> AddressComponent {
    AddressComponent {
        long_name: long_name.to_string(),
        short_name: short_name.to_string(),
        types: types.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn result(
    place_id: &str,
    formatted_address: &str,
    location: (f64, f64),
    types: &[&str],
    components: Vec<AddressComponent>,
) -> GeocodeResult {
    GeocodeResult {
        formatted_address: formatted_address.to_string(),
        address_components: components,
        geometry: Geometry {
            location: LatLng::new(location.0, location.1),
        },
        place_id: place_id.to_string(),
        types: types.iter().map(|t| t.to_string()).collect(),
    }
}

fn italy() -> AddressComponent {
    component("Italy", "IT", &[COUNTRY, POLITICAL])
}

fn lazio() -> AddressComponent {
    component("Lazio", "Lazio", &[ADMIN1, POLITICAL])
}

fn metro_rome() -> AddressComponent {
    component("Metropolitan City of Rome", "RM", &[ADMIN2, POLITICAL])
}

fn rome_admin3() -> AddressComponent {
    component("Rome", "Rome", &[ADMIN3, POLITICAL])
}

fn rome_locality() -> AddressComponent {
    component("Rome", "Rome", &[LOCALITY, POLITICAL])
}

fn czechia() -> AddressComponent {
    component("Czechia", "CZ", &[COUNTRY, POLITICAL])
}

/// Responses covering Italy, Lazio, Rome, Prague (twice) and a few single regions
pub fn world() -> StaticGeocoder {
    StaticGeocoder::new()
        .with(
            "Italy",
            result(
                "ChIJA9KNRIL-1BIRb15jJFz1LOI",
                "Italy",
                (41.87194, 12.56738),
                &[COUNTRY, POLITICAL],
                vec![italy()],
            ),
        )
        .with(
            "Lazio, Italy",
            result(
                LAZIO_PLACE_ID,
                "Lazio, Italy",
                (41.6552418, 12.989615),
                &[ADMIN1, POLITICAL],
                vec![lazio(), italy()],
            ),
        )
        .with(
            "Calabria, Italy",
            result(
                "ChIJ_WGmIUlxFxMRZHJmXPcJ2Jg",
                "Calabria, Italy",
                (39.3087714, 16.3463791),
                &[ADMIN1, POLITICAL],
                vec![component("Calabria", "Calabria", &[ADMIN1, POLITICAL]), italy()],
            ),
        )
        .with(
            "Metropolitan City of Rome, Lazio, Italy",
            result(
                "ChIJ1UCDJ1NgLxMRtrsCzOHxdvY",
                "Metropolitan City of Rome, Italy",
                (41.8933203, 12.4829321),
                &[ADMIN2, POLITICAL],
                vec![metro_rome(), lazio(), italy()],
            ),
        )
        .with(
            "Rome, Metropolitan City of Rome, Lazio, Italy",
            result(
                "ChIJqWqOqFeKLxMR8yWs5yWkPv4",
                "Rome, Metropolitan City of Rome, Italy",
                (41.9102415, 12.3959153),
                &[ADMIN3, POLITICAL],
                vec![rome_admin3(), metro_rome(), lazio(), italy()],
            ),
        )
        .with(
            "Rome, Rome, Metropolitan City of Rome, Lazio, Italy",
            result(
                ROME_PLACE_ID,
                "Rome, Metropolitan City of Rome, Italy",
                (41.9027835, 12.4963655),
                &[LOCALITY, POLITICAL],
                vec![rome_locality(), rome_admin3(), metro_rome(), lazio(), italy()],
            ),
        )
        .with(
            "Montesacro, Rome",
            result(
                "ChIJo5d2MQ1hLxMRbo1m5Y1ZKlU",
                "Montesacro, Rome, Metropolitan City of Rome, Italy",
                (41.9404106, 12.5307279),
                &[POLITICAL, "sublocality", "sublocality_level_1"],
                vec![
                    component("Montesacro", "Montesacro", &[POLITICAL, "sublocality", "sublocality_level_1"]),
                    rome_locality(),
                    rome_admin3(),
                    metro_rome(),
                    lazio(),
                    italy(),
                    component("00139", "00139", &["postal_code"]),
                ],
            ),
        )
        .with(
            GASTINELLI_ADDRESS,
            result(
                GASTINELLI_PLACE_ID,
                "Via Luigi Gastinelli, 118, 00132 Roma RM, Italy",
                (41.8998, 12.6396),
                &["street_address"],
                vec![
                    component("118", "118", &["street_number"]),
                    component("Via Luigi Gastinelli", "Via Luigi Gastinelli", &["route"]),
                    lazio(),
                    italy(),
                    component("00132", "00132", &["postal_code"]),
                ],
            ),
        )
        .with(
            "Praha",
            result(
                "ChIJi3lwCZyTC0cRkEAWZg-vAAQ",
                "Prague, Czechia",
                (50.0755381, 14.4378005),
                &[LOCALITY, POLITICAL],
                vec![
                    component("Prague", "Prague", &[LOCALITY, POLITICAL]),
                    component("Prague", "Prague", &[ADMIN1, POLITICAL]),
                    czechia(),
                ],
            ),
        )
        .with(
            "Czechia",
            result(
                "ChIJQ4Ld14-UC0cRb1jyDRHbhxE",
                "Czechia",
                (49.817492, 15.472962),
                &[COUNTRY, POLITICAL],
                vec![czechia()],
            ),
        )
        .with(
            "Prague, Czechia",
            result(
                "ChIJBT9H1UuUC0cRbyCSVBjFg8M",
                "Prague, Czechia",
                (50.0596288, 14.446459),
                &[ADMIN1, POLITICAL],
                vec![component("Prague", "Prague", &[ADMIN1, POLITICAL]), czechia()],
            ),
        )
        .with(
            PRAGUE_CITY_ADDRESS,
            result(
                PRAGUE_CITY_PLACE_ID,
                "Prague, Czechia",
                (50.0755381, 14.4378005),
                &[ADMIN1, LOCALITY, POLITICAL],
                vec![
                    component("Prague", "Prague", &[ADMIN1, LOCALITY, POLITICAL]),
                    czechia(),
                ],
            ),
        )
        .with(
            "Tonga",
            result(
                "ChIJHdCfu0S2k3ERqeJexcrMbfM",
                "Tonga",
                (-21.178986, -175.198242),
                &[COUNTRY, POLITICAL],
                vec![component("Tonga", "TO", &[COUNTRY, POLITICAL])],
            ),
        )
        .with(
            "Kayuma",
            result(
                "ChIJ4_CniEcdKxoRb3-I6gCh7II",
                "Kayuma, Democratic Republic of the Congo",
                (-9.383333, 21.833333),
                &[LOCALITY, POLITICAL],
                vec![
                    component("Kayuma", "Kayuma", &[LOCALITY, POLITICAL]),
                    component("Democratic Republic of the Congo", "CD", &[COUNTRY, POLITICAL]),
                ],
            ),
        )
}
