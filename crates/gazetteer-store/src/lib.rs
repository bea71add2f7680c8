//! Place store implementations.
//!
//! The hierarchy engine only sees the `PlaceStore`/`ChangeHistory` traits;
//! this crate provides the in-memory, snapshot-backed implementation used by
//! tests and the file-backed CLI mode. Geometry is out of scope, so the
//! point-in-polygon query is answered from an explicit containment relation
//! (code -> enclosing place codes) carried in the snapshot.

pub mod persistence;


use anyhow::Result;
use gazetteer_hierarchy::{ChangeHistory, ChangeRecord, EntityBatch, Place, PlaceCode, PlaceStore};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};

/// Serializable snapshot of a place store: the unit the CLI loads and saves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub places: Vec<Place>,
    #[serde(default)]
    pub history: Vec<ChangeRecord>,
    /// code -> codes of places whose geometry encloses it; stands in for the
    /// store's point-in-polygon evaluation.
    #[serde(default)]
    pub containment: BTreeMap<PlaceCode, Vec<PlaceCode>>,
}

/// In-memory place store over a [`StoreSnapshot`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    places: BTreeMap<PlaceCode, Place>,
    history: HashMap<PlaceCode, ChangeRecord>,
    containment: BTreeMap<PlaceCode, Vec<PlaceCode>>,
    spatial_queries: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut store = Self::new();
        for place in snapshot.places {
            store.places.insert(place.id.clone(), place);
        }
        for record in snapshot.history {
            store.history.insert(record.code.clone(), record);
        }
        store.containment = snapshot.containment;
        store
    }

    /// Snapshot of the current state, places ordered by code.
    pub fn to_snapshot(&self) -> StoreSnapshot {
        let mut history: Vec<ChangeRecord> = self.history.values().cloned().collect();
        history.sort_by(|a, b| a.code.cmp(&b.code));
        StoreSnapshot {
            places: self.places.values().cloned().collect(),
            history,
            containment: self.containment.clone(),
        }
    }

    pub fn insert(&mut self, place: Place) {
        self.places.insert(place.id.clone(), place);
    }

    pub fn insert_record(&mut self, record: ChangeRecord) {
        self.history.insert(record.code.clone(), record);
    }

    pub fn insert_containment(&mut self, code: PlaceCode, enclosing: PlaceCode) {
        self.containment.entry(code).or_default().push(enclosing);
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Number of point-in-polygon queries answered so far this run.
    pub fn spatial_queries(&self) -> usize {
        self.spatial_queries.get()
    }
}

impl PlaceStore for MemoryStore {
    fn entities(&self) -> Result<Vec<EntityBatch>> {
        let mut batches: Vec<EntityBatch> = Vec::new();
        for place in self.places.values() {
            if batches.iter().any(|b| b.entity == place.entity) {
                continue;
            }
            batches.push(EntityBatch {
                entity: place.entity.clone(),
                entity_name: place.entity_name.clone(),
                entity_abbr: place.entity_abbr.clone(),
            });
        }
        batches.sort_by(|a, b| b.entity.cmp(&a.entity));
        Ok(batches)
    }

    fn scan_unresolved(&self, entity: &str) -> Result<Vec<Place>> {
        // BTreeMap iteration gives the ordered-by-id scan.
        Ok(self
            .places
            .values()
            .filter(|p| p.entity == entity && !p.fully_resolved())
            .cloned()
            .collect())
    }

    fn get(&self, code: &PlaceCode) -> Result<Option<Place>> {
        Ok(self.places.get(code).cloned())
    }

    fn enclosing_parent(
        &self,
        code: &PlaceCode,
        candidate_entities: &[String],
    ) -> Result<Option<PlaceCode>> {
        self.spatial_queries.set(self.spatial_queries.get() + 1);
        let Some(enclosing) = self.containment.get(code) else {
            return Ok(None);
        };
        for candidate in enclosing {
            let Some(place) = self.places.get(candidate) else {
                continue;
            };
            if candidate_entities.iter().any(|c| c == &place.entity) {
                return Ok(Some(candidate.clone()));
            }
        }
        Ok(None)
    }

    fn update_parents(&mut self, place: &Place) -> Result<()> {
        let stored = self
            .places
            .entry(place.id.clone())
            .or_insert_with(|| place.clone());
        stored.name = place.name.clone();
        stored.placetype = place.placetype.clone();
        stored.parent_admin = place.parent_admin.clone();
        stored.parent_census = place.parent_census.clone();
        stored.parent_electoral = place.parent_electoral.clone();
        Ok(())
    }

    fn update_hierarchy(&mut self, place: &Place) -> Result<()> {
        let stored = self
            .places
            .entry(place.id.clone())
            .or_insert_with(|| place.clone());
        stored.path_admin = place.path_admin.clone();
        stored.path_census = place.path_census.clone();
        stored.path_electoral = place.path_electoral.clone();
        stored.tree_admin = place.tree_admin.clone();
        stored.tree_census = place.tree_census.clone();
        stored.tree_electoral = place.tree_electoral.clone();
        Ok(())
    }
}

impl ChangeHistory for MemoryStore {
    fn live_record(&self, code: &PlaceCode) -> Result<Option<ChangeRecord>> {
        Ok(self
            .history
            .get(code)
            .filter(|r| r.status == "live")
            .cloned())
    }
}
