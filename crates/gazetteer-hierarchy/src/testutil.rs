//! In-memory store fixture for resolver/walker tests.

use crate::place::{Place, PlaceCode};
use crate::store::{ChangeHistory, ChangeRecord, EntityBatch, PlaceStore};
use anyhow::Result;
use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};

/// Minimal in-memory `PlaceStore` + `ChangeHistory` with a containment
/// relation standing in for geometry and a spatial-query counter.
#[derive(Default)]
pub struct MockStore {
    places: BTreeMap<PlaceCode, Place>,
    history: HashMap<PlaceCode, ChangeRecord>,
    /// code -> places whose geometry encloses it.
    containment: HashMap<PlaceCode, Vec<Place>>,
    spatial_queries: Cell<usize>,
    parent_updates: Cell<usize>,
    hierarchy_updates: Cell<usize>,
}

impl MockStore {
    pub fn add(&mut self, place: Place) {
        self.places.insert(place.id.clone(), place);
    }

    pub fn add_history(&mut self, code: &str, parent: Option<&str>) {
        let code = PlaceCode::from(code);
        self.history.insert(
            code.clone(),
            ChangeRecord {
                code,
                name: String::new(),
                parent_code: parent.map(PlaceCode::from),
                status: "live".to_string(),
            },
        );
    }

    pub fn add_containment(&mut self, code: &str, enclosing: Place) {
        self.containment
            .entry(PlaceCode::from(code))
            .or_default()
            .push(enclosing);
    }

    pub fn spatial_queries(&self) -> usize {
        self.spatial_queries.get()
    }

    pub fn parent_updates(&self) -> usize {
        self.parent_updates.get()
    }

    pub fn hierarchy_updates(&self) -> usize {
        self.hierarchy_updates.get()
    }
}

impl PlaceStore for MockStore {
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
        Ok(enclosing
            .iter()
            .find(|p| candidate_entities.iter().any(|c| c == &p.entity))
            .map(|p| p.id.clone()))
    }

    fn update_parents(&mut self, place: &Place) -> Result<()> {
        self.parent_updates.set(self.parent_updates.get() + 1);
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
        self.hierarchy_updates.set(self.hierarchy_updates.get() + 1);
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

impl ChangeHistory for MockStore {
    fn live_record(&self, code: &PlaceCode) -> Result<Option<ChangeRecord>> {
        Ok(self
            .history
            .get(code)
            .filter(|r| r.status == "live")
            .cloned())
    }
}
