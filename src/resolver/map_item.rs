use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{PlacesError, Result};
use crate::geocode::{AddressComponent, GeocodeResult, Geocoder, LatLng};
use crate::models::{GeoType, MapItem, MapItemData};
use crate::store::PlaceStore;

/// Names and level already established for a component, threaded from an
/// address lookup into the upsert
#[derive(Debug, Clone)]
pub(crate) struct LevelHint {
    pub geo_type: GeoType,
    pub long_name: String,
    pub short_name: String,
}

impl LevelHint {
    pub(crate) fn new(geo_type: GeoType, component: &AddressComponent) -> Self {
        Self {
            geo_type,
            long_name: component.long_name.clone(),
            short_name: component.short_name.clone(),
        }
    }
}

/// Finds or creates single map items from provider lookups.
///
/// Never sets `parent`; linking is done by the place resolver so the first
/// established ancestor chain stays stable.
pub struct MapItemResolver {
    geocoder: Arc<dyn Geocoder>,
    store: PlaceStore,
}

impl MapItemResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, store: PlaceStore) -> Self {
        Self { geocoder, store }
    }

    pub fn store(&self) -> &PlaceStore {
        &self.store
    }

    pub(crate) fn geocoder(&self) -> &dyn Geocoder {
        self.geocoder.as_ref()
    }

    /// Geocode `address` and upsert the item it describes, which must be of
    /// `geo_type`
    pub async fn update_or_create_from_address(&self, address: &str, geo_type: GeoType) -> Result<MapItem> {
        self.resolve_address(address, geo_type, None).await
    }

    /// Like [`Self::update_or_create_from_address`], preferring among
    /// several matching results the one closest to `near`
    pub(crate) async fn resolve_address(
        &self,
        address: &str,
        geo_type: GeoType,
        near: Option<LatLng>,
    ) -> Result<MapItem> {
        let results = self.geocoder.geocode(address).await?;
        let result = pick_result(&results, geo_type, near)
            .ok_or_else(|| PlacesError::NoResults(address.to_string()))?;
        let component = level_component(result, geo_type, address)?;

        // The result already carries the place id, so no second lookup by id
        self.upsert_from_result(result, Some(&LevelHint::new(geo_type, component)))
    }

    /// Look up a provider place id and upsert the region it names
    pub async fn update_or_create_from_place_id(&self, place_id: &str) -> Result<MapItem> {
        let results = self.geocoder.geocode_by_place_id(place_id).await?;
        let result = results
            .first()
            .ok_or_else(|| PlacesError::NoResults(place_id.to_string()))?;
        self.upsert_from_result(result, None)
    }

    /// Write a provider result into the store. Without a hint the level comes
    /// from the result's own type tags.
    pub(crate) fn upsert_from_result(&self, result: &GeocodeResult, hint: Option<&LevelHint>) -> Result<MapItem> {
        let hint = match hint {
            Some(hint) => hint.clone(),
            None => {
                let geo_type = result
                    .geo_type()
                    .ok_or_else(|| PlacesError::UntrackedPlace(result.place_id.clone()))?;
                match result.component_for(geo_type) {
                    Some(component) => LevelHint::new(geo_type, component),
                    None => LevelHint {
                        geo_type,
                        long_name: result.formatted_address.clone(),
                        short_name: result.formatted_address.clone(),
                    },
                }
            }
        };

        debug!(
            "Upserting {}({}) from place {}",
            hint.long_name, hint.geo_type, result.place_id
        );

        let item = self.store.upsert_map_item(MapItemData {
            geo_type: hint.geo_type,
            long_name: hint.long_name,
            short_name: hint.short_name,
            types: result.types_csv(),
            geocode: Some(result.geometry.location.to_string()),
            place_id: Some(result.place_id.clone()),
        })?;

        info!("Resolved {} #{}", item, item.id);
        Ok(item)
    }
}

/// First result, or with a reference point the nearest result whose primary
/// component is of `geo_type`
fn pick_result<'a>(
    results: &'a [GeocodeResult],
    geo_type: GeoType,
    near: Option<LatLng>,
) -> Option<&'a GeocodeResult> {
    let first = results.first()?;
    let Some(near) = near else {
        return Some(first);
    };

    results
        .iter()
        .filter(|r| r.primary_component().is_some_and(|c| c.has_type(geo_type)))
        .min_by(|a, b| {
            let da = a.geometry.location.distance_km(&near);
            let db = b.geometry.location.distance_km(&near);
            da.total_cmp(&db)
        })
        .or(Some(first))
}

/// The component describing the result itself, which must carry `geo_type`
fn level_component<'a>(
    result: &'a GeocodeResult,
    geo_type: GeoType,
    query: &str,
) -> Result<&'a AddressComponent> {
    let primary = result
        .primary_component()
        .ok_or_else(|| PlacesError::NoResults(query.to_string()))?;

    if primary.has_type(geo_type) {
        Ok(primary)
    } else {
        Err(PlacesError::GeoTypeMismatch {
            query: query.to_string(),
            expected: geo_type,
            found: primary.types.join(","),
        })
    }
}
