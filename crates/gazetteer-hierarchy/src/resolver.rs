//! Parent resolution.
//!
//! For each place, assigns an output placetype and up to three parent codes,
//! one per hierarchy dimension declared for its entity type. Rule priority
//! per dimension:
//!
//! 1. country/root entity types never get a parent;
//! 2. a live change-history parent whose entity prefix is in the dimension's
//!    candidate set wins outright (authoritative lineage beats geometric
//!    inference, which is ambiguous near boundary changes);
//! 3. a singleton candidate set whose sole type is a configured country
//!    adopts the fixed root code without touching the spatial evaluator;
//! 4. point-in-polygon lookup among the candidate entity types;
//! 5. the manual override table, keyed by (code, dimension);
//! 6. otherwise the dimension stays unset and the failure is logged with
//!    enough context to patch the override table and re-run.
//!
//! Resolution is deterministic over the store/history snapshot and config,
//! so re-running against unchanged inputs is a no-op backfill.

use crate::config::{EntityMapping, HierarchyConfig};
use crate::place::{Dimension, Place, PlaceCode};
use crate::store::{ChangeHistory, ChangeRecord, PlaceStore};
use anyhow::Result;
use std::collections::BTreeMap;

/// The resolved hierarchy map for one run: place code -> updated record.
/// Ordered so checkpoint serialization and store writes are deterministic.
pub type RunMap = BTreeMap<PlaceCode, Place>;

/// Outcome of resolving a single place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub placetype: String,
    pub parent_admin: Option<PlaceCode>,
    pub parent_census: Option<PlaceCode>,
    pub parent_electoral: Option<PlaceCode>,
}

impl Resolution {
    pub fn parent(&self, dim: Dimension) -> Option<&PlaceCode> {
        match dim {
            Dimension::Admin => self.parent_admin.as_ref(),
            Dimension::Census => self.parent_census.as_ref(),
            Dimension::Electoral => self.parent_electoral.as_ref(),
        }
    }
}

/// Batch parent resolver over a place store and its change history.
pub struct ParentResolver<'a, S: PlaceStore + ChangeHistory> {
    store: &'a mut S,
    config: &'a HierarchyConfig,
}

impl<'a, S: PlaceStore + ChangeHistory> ParentResolver<'a, S> {
    pub fn new(store: &'a mut S, config: &'a HierarchyConfig) -> Self {
        Self { store, config }
    }

    /// Scan every entity batch, resolve each place, write `placetype` and
    /// `parent_*` back one place at a time, and return the run map for the
    /// walker phase.
    pub fn build(&mut self) -> Result<RunMap> {
        let mut run = RunMap::new();

        for batch in self.store.entities()? {
            let Some(mapping) = self.config.mapping(&batch.entity) else {
                tracing::warn!(
                    entity = %batch.entity,
                    entity_name = %batch.entity_name,
                    "no mapping for entity, skipping batch"
                );
                continue;
            };

            let places = self.store.scan_unresolved(&batch.entity)?;
            if places.is_empty() {
                tracing::debug!(entity = %batch.entity, "no unresolved places");
                continue;
            }
            tracing::info!(
                entity = %batch.entity,
                entity_name = %batch.entity_name,
                count = places.len(),
                "building empty places"
            );

            for mut place in places {
                // Idempotent re-run path: the scan only selects places with
                // at least one unset parent, so a fully resolved place here
                // is a no-op.
                if place.fully_resolved() {
                    tracing::debug!(code = %place.id, "already resolved, skipping");
                    continue;
                }

                tracing::debug!(code = %place.id, name = %place.name, "starting");
                let resolution = self.resolve(&place, mapping)?;
                place.name = self.config.sanitise_name(&place.id, &place.name);
                place.placetype = Some(resolution.placetype.clone());
                for dim in Dimension::ALL {
                    if place.parent(dim).is_none() {
                        place.set_parent(dim, resolution.parent(dim).cloned());
                    }
                }

                run.insert(place.id.clone(), place);
            }
        }

        tracing::info!(count = run.len(), "updating places");
        for place in run.values() {
            self.store.update_parents(place)?;
        }

        Ok(run)
    }

    /// Resolve one place against its entity mapping. Precondition: the
    /// mapping belongs to `place.entity` (batches without a mapping are
    /// skipped before this point).
    pub fn resolve(&self, place: &Place, mapping: &EntityMapping) -> Result<Resolution> {
        let mut resolution = Resolution {
            placetype: mapping.placetype.clone(),
            parent_admin: None,
            parent_census: None,
            parent_electoral: None,
        };

        if self.config.is_country(&place.entity) {
            tracing::debug!(code = %place.id, "skipping parent for country");
            return Ok(resolution);
        }

        let history = self.store.live_record(&place.id)?;
        for (&dim, candidates) in &mapping.parents {
            if candidates.is_empty() {
                continue;
            }
            let parent = self.resolve_dimension(place, dim, candidates, history.as_ref())?;
            match dim {
                Dimension::Admin => resolution.parent_admin = parent,
                Dimension::Census => resolution.parent_census = parent,
                Dimension::Electoral => resolution.parent_electoral = parent,
            }
        }

        Ok(resolution)
    }

    fn resolve_dimension(
        &self,
        place: &Place,
        dim: Dimension,
        candidates: &[String],
        history: Option<&ChangeRecord>,
    ) -> Result<Option<PlaceCode>> {
        // Authoritative lineage first.
        if let Some(parent) = history.and_then(|record| record.parent_code.as_ref()) {
            if let Some(prefix) = parent.entity_prefix() {
                if candidates.iter().any(|c| c == prefix) {
                    tracing::debug!(
                        code = %place.id,
                        dimension = %dim,
                        parent = %parent,
                        "adopting change-history parent"
                    );
                    return Ok(Some(parent.clone()));
                }
            }
        }

        // A country-level dimension always terminates at the nation; no
        // spatial query is issued.
        if let [sole] = candidates {
            if let Some(root) = self.config.country_root(sole) {
                return Ok(Some(root.clone()));
            }
        }

        if let Some(parent) = self.store.enclosing_parent(&place.id, candidates)? {
            tracing::debug!(
                code = %place.id,
                dimension = %dim,
                parent = %parent,
                "adopting enclosing parent"
            );
            return Ok(Some(parent));
        }

        if let Some(parent) = self.config.override_for(&place.id, dim) {
            tracing::debug!(
                code = %place.id,
                dimension = %dim,
                parent = %parent,
                "adopting override parent"
            );
            return Ok(Some(parent.clone()));
        }

        tracing::error!(
            dimension = %dim,
            code = %place.id,
            candidates = %candidates.join(","),
            "failed to resolve parent"
        );
        Ok(None)
    }
}
