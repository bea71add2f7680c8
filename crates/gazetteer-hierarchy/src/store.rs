//! Collaborator interfaces for the place store and change history.
//!
//! The persistent backend and the point-in-polygon evaluator are external to
//! this crate; the resolver and walker only see these traits. Implementations
//! live in `gazetteer-store`. Connectivity failures propagate as errors with
//! no retry; a run either completes or aborts.

use crate::place::{Place, PlaceCode};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One distinct entity type present in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBatch {
    pub entity: String,
    pub entity_name: String,
    pub entity_abbr: Option<String>,
}

/// The most recent authoritative lineage record for a place code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub code: PlaceCode,
    pub name: String,
    pub parent_code: Option<PlaceCode>,
    pub status: String,
}

/// Read/write access to place records.
pub trait PlaceStore {
    /// Distinct entity types, ordered by entity descending.
    fn entities(&self) -> Result<Vec<EntityBatch>>;

    /// Places of the given entity type with at least one unset parent
    /// dimension, ordered by id.
    fn scan_unresolved(&self, entity: &str) -> Result<Vec<Place>>;

    /// Point lookup by id.
    fn get(&self, code: &PlaceCode) -> Result<Option<Place>>;

    /// Point-in-polygon query: the place (among the candidate entity types)
    /// enclosing this place's representative point, if any.
    fn enclosing_parent(
        &self,
        code: &PlaceCode,
        candidate_entities: &[String],
    ) -> Result<Option<PlaceCode>>;

    /// Write back `placetype`/`parent_*` for one place. One transaction per
    /// place, so a mid-run failure keeps previously written places.
    fn update_parents(&mut self, place: &Place) -> Result<()>;

    /// Write back `path_*`/`tree_*` for one place. Same per-place
    /// transaction scope as [`PlaceStore::update_parents`].
    fn update_hierarchy(&mut self, place: &Place) -> Result<()>;
}

/// Lookup into the boundary change history.
pub trait ChangeHistory {
    /// The record flagged "live" for this code; absent or non-live records
    /// mean "no lineage", which is not an error.
    fn live_record(&self, code: &PlaceCode) -> Result<Option<ChangeRecord>>;
}
