use std::sync::Arc;
use tracing::{debug, info};

use super::map_item::{LevelHint, MapItemResolver};
use crate::continent::continent_for;
use crate::error::{PlacesError, Result};
use crate::geocode::{GeocodeResult, Geocoder, LatLng};
use crate::models::{GeoType, MapItem, PlaceInput, PoliticalPlace};
use crate::store::PlaceStore;

/// Turns addresses into [`PoliticalPlace`]s and keeps their map item chain
/// (continent → country → admin levels → locality → sublocality) linked.
pub struct PoliticalPlaceResolver {
    items: MapItemResolver,
}

impl PoliticalPlaceResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, store: PlaceStore) -> Self {
        Self {
            items: MapItemResolver::new(geocoder, store),
        }
    }

    pub fn map_items(&self) -> &MapItemResolver {
        &self.items
    }

    pub fn store(&self) -> &PlaceStore {
        self.items.store()
    }

    /// Return the place stored for `address`, or geocode and create it
    pub async fn get_or_create_from_address(&self, address: &str) -> Result<PoliticalPlace> {
        self.resolve_input(&PlaceInput {
            address: address.to_string(),
            ..PlaceInput::default()
        })
        .await
    }

    /// Form submission: an address, optionally with the geocode and place id
    /// the map widget already picked. A place id is looked up directly.
    pub async fn resolve_input(&self, input: &PlaceInput) -> Result<PoliticalPlace> {
        if let Some(existing) = self.store().find_place_by_address(&input.address)? {
            debug!("Place '{}' already resolved as #{:?}", input.address, existing.id);
            return Ok(existing);
        }

        let mut place = PoliticalPlace::from_input(input);
        let supplied_geocode = place.geocode.clone();

        let results = self.lookup(&place).await?;
        let result = first_result(&results, &place)?;
        apply_result(&mut place, result);
        if supplied_geocode.is_some() {
            place.geocode = supplied_geocode;
        }

        self.link_chain(&mut place, Some(result)).await?;

        let place = self.store().claim_place(place)?;
        info!("Resolved '{}' to {}", input.address, place);
        Ok(place)
    }

    /// Build and attach the map item chain from the place's level names.
    ///
    /// Walks from the broadest present level to the narrowest; a missing
    /// level leaves its item empty and the next present level attaches to the
    /// nearest present ancestor. Does not persist the place.
    pub async fn create_map_items(&self, place: &mut PoliticalPlace) -> Result<()> {
        self.link_chain(place, None).await
    }

    /// Re-attach item references from names already set on the place,
    /// deriving the continent from the country when missing. Stored items are
    /// reused; only unknown levels reach the provider.
    pub async fn link_map_items(&self, place: &mut PoliticalPlace) -> Result<()> {
        if place.name(GeoType::Continent).is_none() {
            let continent = place.country.as_deref().and_then(continent_for).map(str::to_string);
            place.set_name(GeoType::Continent, continent);
        }
        self.link_chain(place, None).await
    }

    /// Geocode again (by place id when known, else by address), overwrite
    /// every derived field and item reference, and save
    pub async fn refresh_data(&self, place: &mut PoliticalPlace) -> Result<()> {
        let results = self.lookup(place).await?;
        let result = first_result(&results, place)?;
        apply_result(place, result);
        self.link_chain(place, Some(result)).await?;
        self.store().save_place(place)?;
        info!("Refreshed place #{:?} {}", place.id, place);
        Ok(())
    }

    async fn lookup(&self, place: &PoliticalPlace) -> Result<Vec<GeocodeResult>> {
        match place.place_id.as_deref().filter(|p| !p.is_empty()) {
            Some(place_id) => self.items.geocoder().geocode_by_place_id(place_id).await,
            None => self.items.geocoder().geocode(&place.address).await,
        }
    }

    async fn link_chain(&self, place: &mut PoliticalPlace, seed: Option<&GeocodeResult>) -> Result<()> {
        let near = place.location();
        let mut parent: Option<MapItem> = None;
        // Names of present levels, nearest first, used to qualify queries
        let mut ancestors: Vec<String> = Vec::new();

        match place.name(GeoType::Continent).map(str::to_string) {
            Some(name) => {
                let continent = self.store().get_or_create_continent(&name)?;
                place.set_item(GeoType::Continent, Some(continent.id));
                parent = Some(continent);
            }
            None => place.set_item(GeoType::Continent, None),
        }

        for &level in GeoType::component_levels() {
            let Some(name) = place.name(level).map(str::to_string) else {
                place.set_item(level, None);
                continue;
            };

            let item = self
                .resolve_level(level, &name, parent.as_ref(), &ancestors, seed, near)
                .await?;
            let item = match &parent {
                Some(parent) => self.store().attach_parent(item.id, parent.id)?,
                None => item,
            };

            place.set_item(level, Some(item.id));
            ancestors.insert(0, name);
            parent = Some(item);
        }

        Ok(())
    }

    async fn resolve_level(
        &self,
        level: GeoType,
        name: &str,
        parent: Option<&MapItem>,
        ancestors: &[String],
        seed: Option<&GeocodeResult>,
        near: Option<LatLng>,
    ) -> Result<MapItem> {
        // Stored item under the same parent (or not yet linked)
        if let Some(existing) = self.store().find_map_item(name, level)? {
            if existing.parent.is_none() || existing.parent == parent.map(|p| p.id) {
                debug!("Reusing {} #{}", existing, existing.id);
                return Ok(existing);
            }
        }

        // The place's own result already identifies this level
        if let Some(result) = seed {
            if let Some(primary) = result.primary_component() {
                if primary.has_type(level) && primary.long_name.eq_ignore_ascii_case(name) {
                    return self
                        .items
                        .upsert_from_result(result, Some(&LevelHint::new(level, primary)));
                }
            }
        }

        let query = level_query(name, ancestors);
        self.items.resolve_address(&query, level, near).await
    }
}

fn first_result<'a>(results: &'a [GeocodeResult], place: &PoliticalPlace) -> Result<&'a GeocodeResult> {
    results
        .first()
        .ok_or_else(|| PlacesError::NoResults(place.address.clone()))
}

/// Overwrite provider-derived fields and level names from a result
fn apply_result(place: &mut PoliticalPlace, result: &GeocodeResult) {
    place.formatted_address = Some(result.formatted_address.clone());
    place.geocode = Some(result.geometry.location.to_string());
    place.place_id = Some(result.place_id.clone());

    place.clear_levels();
    for &level in GeoType::component_levels() {
        let name = result.component_for(level).map(|c| c.long_name.clone());
        place.set_name(level, name);
    }

    let continent = place.country.as_deref().and_then(continent_for).map(str::to_string);
    place.set_name(GeoType::Continent, continent);
}

/// `"Rome, Metropolitan City of Rome, Lazio, Italy"`
fn level_query(name: &str, ancestors: &[String]) -> String {
    let mut parts = Vec::with_capacity(ancestors.len() + 1);
    parts.push(name);
    parts.extend(ancestors.iter().map(String::as_str));
    parts.join(", ")
}
