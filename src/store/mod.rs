//! sled-backed persistence for map items and political places.
//!
//! Every check-then-act step (find-or-create, set-parent-if-null, claiming an
//! address) runs inside a sled transaction so concurrent resolutions of the
//! same region never produce duplicate rows.

use chrono::Utc;
use sled::transaction::{
    ConflictableTransactionError, ConflictableTransactionResult, TransactionalTree, Transactional,
};
use sled::{Db, Tree};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{PlacesError, Result};
use crate::models::{GeoType, MapItem, MapItemData, PoliticalPlace};

type TxResult<T> = ConflictableTransactionResult<T, PlacesError>;

fn id_key(id: u64) -> Vec<u8> {
    id.to_be_bytes().to_vec()
}

fn decode_id(bytes: &[u8]) -> Result<u64> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| PlacesError::CorruptKey)?;
    Ok(u64::from_be_bytes(raw))
}

fn abort<E: Into<PlacesError>>(err: E) -> ConflictableTransactionError<PlacesError> {
    ConflictableTransactionError::Abort(err.into())
}

fn read_item_tx(items: &TransactionalTree, id: u64) -> TxResult<Option<MapItem>> {
    match items.get(id_key(id))? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes).map_err(abort)?)),
        None => Ok(None),
    }
}

fn write_item_tx(items: &TransactionalTree, item: &MapItem) -> TxResult<()> {
    let bytes = serde_json::to_vec(item).map_err(abort)?;
    items.insert(id_key(item.id), bytes)?;
    Ok(())
}

fn read_place_tx(places: &TransactionalTree, id: u64) -> TxResult<Option<PoliticalPlace>> {
    match places.get(id_key(id))? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes).map_err(abort)?)),
        None => Ok(None),
    }
}

/// Handle to the place database. Cheap to clone.
#[derive(Clone)]
pub struct PlaceStore {
    db: Db,
    items: Tree,
    items_by_place_id: Tree,
    items_by_name: Tree,
    places: Tree,
    places_by_address: Tree,
}

impl PlaceStore {
    /// Open (or create) a store on disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Opening place store at {}", path.as_ref().display());
        Self::from_db(sled::open(path)?)
    }

    /// In-memory store removed on drop
    pub fn temporary() -> Result<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: Db) -> Result<Self> {
        Ok(Self {
            items: db.open_tree("map_items")?,
            items_by_place_id: db.open_tree("map_items_by_place_id")?,
            items_by_name: db.open_tree("map_items_by_name")?,
            places: db.open_tree("political_places")?,
            places_by_address: db.open_tree("political_places_by_address")?,
            db,
        })
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    pub fn map_item(&self, id: u64) -> Result<Option<MapItem>> {
        match self.items.get(id_key(id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Look up by `(long_name, geo_type)`, case-insensitive
    pub fn find_map_item(&self, long_name: &str, geo_type: GeoType) -> Result<Option<MapItem>> {
        let key = MapItem::name_key(geo_type, long_name);
        match self.items_by_name.get(key.as_bytes())? {
            Some(id) => self.map_item(decode_id(&id)?),
            None => Ok(None),
        }
    }

    pub fn find_by_place_id(&self, place_id: &str) -> Result<Option<MapItem>> {
        match self.items_by_place_id.get(place_id.as_bytes())? {
            Some(id) => self.map_item(decode_id(&id)?),
            None => Ok(None),
        }
    }

    pub fn map_item_count(&self) -> usize {
        self.items.len()
    }

    pub fn map_items(&self) -> Result<Vec<MapItem>> {
        self.items
            .iter()
            .values()
            .map(|bytes| -> Result<MapItem> { Ok(serde_json::from_slice(&bytes?)?) })
            .collect()
    }

    /// Direct children of an item, ordered by URL
    pub fn children(&self, parent_id: u64) -> Result<Vec<MapItem>> {
        let mut children: Vec<MapItem> = self
            .map_items()?
            .into_iter()
            .filter(|item| item.parent == Some(parent_id))
            .collect();
        children.sort_by(|a, b| a.relative_url().cmp(&b.relative_url()));
        Ok(children)
    }

    /// Resolve a browsable relative URL back to its item
    pub fn map_item_by_url(&self, url: &str) -> Result<Option<MapItem>> {
        let url = url.trim_end_matches('/');

        // Non-continent URLs end in the item id
        if let Some(id) = url.rsplit('/').next().and_then(|s| s.parse::<u64>().ok()) {
            if let Some(item) = self.map_item(id)? {
                if item.relative_url() == Some(url) {
                    return Ok(Some(item));
                }
            }
        }

        Ok(self
            .map_items()?
            .into_iter()
            .find(|item| item.relative_url() == Some(url)))
    }

    /// Find-or-create by identity and overwrite provider fields.
    ///
    /// Matches on `place_id` first, then on the name key when the named row
    /// has no conflicting `place_id`. A row's `geo_type` never changes: when
    /// the `place_id` already belongs to a row of another level (one component
    /// tagged with several levels), the level gets its own row without a
    /// `place_id`. Parent and URL are never touched.
    pub fn upsert_map_item(&self, data: MapItemData) -> Result<MapItem> {
        let fresh_id = self.db.generate_id()?;
        let name_key = MapItem::name_key(data.geo_type, &data.long_name);

        let (item, created) = (&self.items, &self.items_by_place_id, &self.items_by_name)
            .transaction(|(items, by_place, by_name)| -> TxResult<(MapItem, bool)> {
                let mut data = data.clone();
                let mut existing = None;
                let owner_id = match data.place_id.as_deref() {
                    Some(pid) => by_place.get(pid.as_bytes())?,
                    None => None,
                };
                if let Some(id) = owner_id {
                    match read_item_tx(items, decode_id(&id).map_err(abort)?)? {
                        Some(owner) if owner.geo_type == data.geo_type => existing = Some(owner),
                        Some(_) => data.place_id = None,
                        None => {}
                    }
                }
                if existing.is_none() {
                    if let Some(id) = by_name.get(name_key.as_bytes())? {
                        existing = read_item_tx(items, decode_id(&id).map_err(abort)?)?
                            .filter(|named| match (&named.place_id, &data.place_id) {
                                (Some(theirs), Some(ours)) => theirs == ours,
                                _ => true,
                            });
                    }
                }

                let created = existing.is_none();
                let item = match existing {
                    Some(mut item) => {
                        let old_key = MapItem::name_key(item.geo_type, &item.long_name);
                        item.apply(data);
                        if old_key != name_key {
                            if let Some(id) = by_name.get(old_key.as_bytes())? {
                                if id[..] == id_key(item.id)[..] {
                                    by_name.remove(old_key.as_bytes())?;
                                }
                            }
                        }
                        item
                    }
                    None => MapItem::from_data(fresh_id, data),
                };

                write_item_tx(items, &item)?;
                if let Some(pid) = item.place_id.as_deref() {
                    by_place.insert(pid.as_bytes(), id_key(item.id))?;
                }
                if by_name.get(name_key.as_bytes())?.is_none() {
                    by_name.insert(name_key.as_bytes(), id_key(item.id))?;
                }
                Ok((item, created))
            })?;

        if created {
            info!("Created map item {} #{}", item, item.id);
        } else {
            debug!("Updated map item {} #{}", item, item.id);
        }
        Ok(item)
    }

    /// Find-or-create the synthetic continent node for `name`
    pub fn get_or_create_continent(&self, name: &str) -> Result<MapItem> {
        let fresh_id = self.db.generate_id()?;
        let key = MapItem::name_key(GeoType::Continent, name);

        let (item, created) = (&self.items, &self.items_by_name).transaction(
            |(items, by_name)| -> TxResult<(MapItem, bool)> {
                if let Some(id) = by_name.get(key.as_bytes())? {
                    if let Some(item) = read_item_tx(items, decode_id(&id).map_err(abort)?)? {
                        return Ok((item, false));
                    }
                }
                let item = MapItem::continent(fresh_id, name);
                write_item_tx(items, &item)?;
                by_name.insert(key.as_bytes(), id_key(item.id))?;
                Ok((item, true))
            },
        )?;

        if created {
            info!("Created continent {} #{}", item, item.id);
        }
        Ok(item)
    }

    /// Set `child.parent` only if it is unset (first write wins), then fill
    /// in the child's URL if it has none and the parent has one.
    pub fn attach_parent(&self, child_id: u64, parent_id: u64) -> Result<MapItem> {
        let child = self.items.transaction(|items| -> TxResult<MapItem> {
            let mut child = read_item_tx(items, child_id)?
                .ok_or_else(|| abort(PlacesError::MissingItem(child_id)))?;
            if child_id == parent_id {
                return Ok(child);
            }

            let mut changed = false;
            if child.parent.is_none() {
                child.parent = Some(parent_id);
                changed = true;
            }
            if child.parent == Some(parent_id) && child.relative_url.is_none() {
                let parent = read_item_tx(items, parent_id)?
                    .ok_or_else(|| abort(PlacesError::MissingItem(parent_id)))?;
                if let Some(prefix) = parent.url_prefix() {
                    child.relative_url = Some(child.url_under(&prefix));
                    changed = true;
                }
            }

            if changed {
                write_item_tx(items, &child)?;
            }
            Ok(child)
        })?;

        if child.parent != Some(parent_id) {
            debug!(
                "Keeping parent {:?} of {} #{}, ignoring #{}",
                child.parent, child, child.id, parent_id
            );
        }
        Ok(child)
    }

    pub fn political_place(&self, id: u64) -> Result<Option<PoliticalPlace>> {
        match self.places.get(id_key(id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn find_place_by_address(&self, address: &str) -> Result<Option<PoliticalPlace>> {
        match self.places_by_address.get(address.as_bytes())? {
            Some(id) => self.political_place(decode_id(&id)?),
            None => Ok(None),
        }
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    /// Insert or overwrite a place, assigning an id on first save
    pub fn save_place(&self, place: &mut PoliticalPlace) -> Result<()> {
        let id = match place.id {
            Some(id) => id,
            None => self.db.generate_id()?,
        };
        place.id = Some(id);
        place.updated_at = Some(Utc::now());
        let record = &*place;

        (&self.places, &self.places_by_address).transaction(
            |(places, by_address)| -> TxResult<()> {
                if let Some(old) = read_place_tx(places, id)? {
                    if old.address != record.address {
                        if let Some(owner) = by_address.get(old.address.as_bytes())? {
                            if owner[..] == id_key(id)[..] {
                                by_address.remove(old.address.as_bytes())?;
                            }
                        }
                    }
                }
                let bytes = serde_json::to_vec(record).map_err(abort)?;
                places.insert(id_key(id), bytes)?;
                if by_address.get(record.address.as_bytes())?.is_none() {
                    by_address.insert(record.address.as_bytes(), id_key(id))?;
                }
                Ok(())
            },
        )?;

        debug!("Saved political place #{} '{}'", id, place.address);
        Ok(())
    }

    /// Insert a new place unless its address is already claimed, in which
    /// case the existing place is returned instead
    pub fn claim_place(&self, mut place: PoliticalPlace) -> Result<PoliticalPlace> {
        let id = match place.id {
            Some(id) => id,
            None => self.db.generate_id()?,
        };
        place.id = Some(id);
        place.updated_at = Some(Utc::now());

        let claimed = (&self.places, &self.places_by_address).transaction(
            |(places, by_address)| -> TxResult<PoliticalPlace> {
                if let Some(owner) = by_address.get(place.address.as_bytes())? {
                    if let Some(existing) = read_place_tx(places, decode_id(&owner).map_err(abort)?)? {
                        return Ok(existing);
                    }
                }
                let bytes = serde_json::to_vec(&place).map_err(abort)?;
                places.insert(id_key(id), bytes)?;
                by_address.insert(place.address.as_bytes(), id_key(id))?;
                Ok(place.clone())
            },
        )?;

        if claimed.id == Some(id) {
            info!("Created political place #{} '{}'", id, claimed.address);
        }
        Ok(claimed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemSource;

    fn lazio() -> MapItemData {
        MapItemData {
            geo_type: GeoType::AdministrativeAreaLevel1,
            long_name: "Lazio".into(),
            short_name: "Lazio".into(),
            types: "administrative_area_level_1,political".into(),
            geocode: Some("41.6552418,12.989615".into()),
            place_id: Some("ChIJNWU6NebuJBMRKYWj8WSQSm8".into()),
        }
    }

    fn italy() -> MapItemData {
        MapItemData {
            geo_type: GeoType::Country,
            long_name: "Italy".into(),
            short_name: "IT".into(),
            types: "country,political".into(),
            geocode: Some("41.87194,12.56738".into()),
            place_id: Some("ChIJA9KNRIL-1BIRb15jJFz1LOI".into()),
        }
    }

    #[test]
    fn test_upsert_same_place_id_once() {
        let store = PlaceStore::temporary().unwrap();
        let first = store.upsert_map_item(lazio()).unwrap();
        let second = store.upsert_map_item(lazio()).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.map_item_count(), 1);
    }

    #[test]
    fn test_upsert_fills_place_id_on_name_match() {
        let store = PlaceStore::temporary().unwrap();
        let mut nameless = lazio();
        nameless.place_id = None;
        nameless.geocode = None;
        let first = store.upsert_map_item(nameless).unwrap();
        assert!(first.place_id.is_none());

        let filled = store.upsert_map_item(lazio()).unwrap();
        assert_eq!(filled.id, first.id);
        assert_eq!(filled.place_id.as_deref(), Some("ChIJNWU6NebuJBMRKYWj8WSQSm8"));
        assert_eq!(
            store.find_by_place_id("ChIJNWU6NebuJBMRKYWj8WSQSm8").unwrap().unwrap().id,
            first.id
        );
        assert_eq!(store.map_item_count(), 1);
    }

    #[test]
    fn test_same_name_different_place_id_is_new_row() {
        let store = PlaceStore::temporary().unwrap();
        let rome_it = MapItemData {
            geo_type: GeoType::Locality,
            long_name: "Rome".into(),
            short_name: "Rome".into(),
            types: "locality,political".into(),
            geocode: Some("41.9027835,12.4963655".into()),
            place_id: Some("ChIJu46S-ZZhLxMROG5lkwZ3D7k".into()),
        };
        let rome_us = MapItemData {
            geocode: Some("34.257038,-85.1646726".into()),
            place_id: Some("ChIJa8lu5gvtimIRRnDe7dr0TkY".into()),
            ..rome_it.clone()
        };
        let a = store.upsert_map_item(rome_it).unwrap();
        let b = store.upsert_map_item(rome_us).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.map_item_count(), 2);
        // Name index keeps the first row
        assert_eq!(store.find_map_item("rome", GeoType::Locality).unwrap().unwrap().id, a.id);
    }

    #[test]
    fn test_shared_place_id_keeps_levels_apart() {
        let store = PlaceStore::temporary().unwrap();
        let region = MapItemData {
            geo_type: GeoType::AdministrativeAreaLevel1,
            long_name: "Prague".into(),
            short_name: "Prague".into(),
            types: "administrative_area_level_1,locality,political".into(),
            geocode: Some("50.0755381,14.4378005".into()),
            place_id: Some("ChIJ5Ql2oayUC0cRkEAWZg-vAAQ".into()),
        };
        let city = MapItemData {
            geo_type: GeoType::Locality,
            ..region.clone()
        };

        let a = store.upsert_map_item(region.clone()).unwrap();
        let b = store.upsert_map_item(city.clone()).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.geo_type, GeoType::AdministrativeAreaLevel1);
        assert_eq!(b.geo_type, GeoType::Locality);
        assert!(b.place_id.is_none());
        assert_eq!(b.geocode.as_deref(), Some("50.0755381,14.4378005"));

        // The place id stays with the first row, which keeps its level
        let owner = store.find_by_place_id("ChIJ5Ql2oayUC0cRkEAWZg-vAAQ").unwrap().unwrap();
        assert_eq!(owner.id, a.id);
        assert_eq!(owner.geo_type, GeoType::AdministrativeAreaLevel1);
        assert_eq!(
            store.find_map_item("Prague", GeoType::AdministrativeAreaLevel1).unwrap().unwrap().id,
            a.id
        );

        assert_eq!(store.upsert_map_item(city).unwrap().id, b.id);
        assert_eq!(store.upsert_map_item(region).unwrap().id, a.id);
        assert_eq!(store.map_item_count(), 2);
    }

    #[test]
    fn test_find_map_item_case_insensitive() {
        let store = PlaceStore::temporary().unwrap();
        store.upsert_map_item(italy()).unwrap();
        assert!(store.find_map_item("ITALY", GeoType::Country).unwrap().is_some());
        assert!(store.find_map_item("Italy", GeoType::Locality).unwrap().is_none());
    }

    #[test]
    fn test_concurrent_upserts_create_one_row() {
        let store = PlaceStore::temporary().unwrap();
        std::thread::scope(|s| {
            for _ in 0..8 {
                let store = store.clone();
                s.spawn(move || store.upsert_map_item(lazio()).unwrap());
            }
        });
        assert_eq!(store.map_item_count(), 1);
    }

    #[test]
    fn test_continent_created_once() {
        let store = PlaceStore::temporary().unwrap();
        let a = store.get_or_create_continent("Europe").unwrap();
        let b = store.get_or_create_continent("Europe").unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.source, ItemSource::Synthetic);
        assert_eq!(a.relative_url(), Some("/europe"));
        assert!(a.parent.is_none());
        assert_eq!(store.map_item_count(), 1);
    }

    #[test]
    fn test_attach_parent_builds_url() {
        let store = PlaceStore::temporary().unwrap();
        let europe = store.get_or_create_continent("Europe").unwrap();
        let italy = store.upsert_map_item(italy()).unwrap();
        let lazio = store.upsert_map_item(lazio()).unwrap();

        let italy = store.attach_parent(italy.id, europe.id).unwrap();
        assert_eq!(italy.relative_url(), Some(format!("/europe/it/{}", italy.id).as_str()));

        let lazio = store.attach_parent(lazio.id, italy.id).unwrap();
        assert_eq!(lazio.parent, Some(italy.id));
        assert_eq!(lazio.relative_url(), Some(format!("/europe/it/lazio/{}", lazio.id).as_str()));
    }

    #[test]
    fn test_attach_parent_first_write_wins() {
        let store = PlaceStore::temporary().unwrap();
        let europe = store.get_or_create_continent("Europe").unwrap();
        let asia = store.get_or_create_continent("Asia").unwrap();
        let italy = store.upsert_map_item(italy()).unwrap();

        store.attach_parent(italy.id, europe.id).unwrap();
        let again = store.attach_parent(italy.id, asia.id).unwrap();
        assert_eq!(again.parent, Some(europe.id));
        assert_eq!(again.relative_url(), Some(format!("/europe/it/{}", italy.id).as_str()));

        // A later upsert keeps parent and URL
        let refreshed = store.upsert_map_item(super::tests::italy()).unwrap();
        assert_eq!(refreshed.parent, Some(europe.id));
        assert!(refreshed.relative_url().is_some());
    }

    #[test]
    fn test_attach_parent_without_parent_url() {
        let store = PlaceStore::temporary().unwrap();
        let italy = store.upsert_map_item(italy()).unwrap();
        let lazio = store.upsert_map_item(lazio()).unwrap();
        let lazio = store.attach_parent(lazio.id, italy.id).unwrap();
        assert_eq!(lazio.parent, Some(italy.id));
        assert!(lazio.relative_url().is_none());
    }

    #[test]
    fn test_attach_missing_item() {
        let store = PlaceStore::temporary().unwrap();
        assert!(matches!(store.attach_parent(99, 1), Err(PlacesError::MissingItem(99))));
    }

    #[test]
    fn test_browse_by_url_and_children() {
        let store = PlaceStore::temporary().unwrap();
        let europe = store.get_or_create_continent("Europe").unwrap();
        let italy = store.upsert_map_item(italy()).unwrap();
        let italy = store.attach_parent(italy.id, europe.id).unwrap();

        let url = italy.relative_url().unwrap().to_string();
        assert_eq!(store.map_item_by_url(&url).unwrap().unwrap().id, italy.id);
        assert_eq!(store.map_item_by_url(&format!("{}/", url)).unwrap().unwrap().id, italy.id);
        assert_eq!(store.map_item_by_url("/europe").unwrap().unwrap().id, europe.id);
        assert!(store.map_item_by_url("/europe/fr/1").unwrap().is_none());

        let children = store.children(europe.id).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, italy.id);
    }

    #[test]
    fn test_save_place_assigns_id_and_indexes_address() {
        let store = PlaceStore::temporary().unwrap();
        let mut place = PoliticalPlace::new("Praha");
        store.save_place(&mut place).unwrap();
        let id = place.id.unwrap();

        assert_eq!(store.find_place_by_address("Praha").unwrap().unwrap().id, Some(id));

        place.address = "Prague".into();
        store.save_place(&mut place).unwrap();
        assert_eq!(place.id, Some(id));
        assert!(store.find_place_by_address("Praha").unwrap().is_none());
        assert_eq!(store.find_place_by_address("Prague").unwrap().unwrap().id, Some(id));
        assert_eq!(store.place_count(), 1);
    }

    #[test]
    fn test_claim_place_returns_existing() {
        let store = PlaceStore::temporary().unwrap();
        let first = store.claim_place(PoliticalPlace::new("Praha")).unwrap();
        let mut other = PoliticalPlace::new("Praha");
        other.country = Some("Czechia".into());
        let second = store.claim_place(other).unwrap();
        assert_eq!(first.id, second.id);
        assert!(second.country.is_none());
        assert_eq!(store.place_count(), 1);
    }

    #[test]
    fn test_reopen_persists() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("places.db");
        let id = {
            let store = PlaceStore::open(&path).unwrap();
            let item = store.upsert_map_item(italy()).unwrap();
            store.flush().unwrap();
            item.id
        };
        let store = PlaceStore::open(&path).unwrap();
        assert_eq!(store.map_item(id).unwrap().unwrap().short_name, "IT");
    }
}
