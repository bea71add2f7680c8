//! Gazetteer hierarchy engine.
//!
//! Derives multi-dimensional administrative hierarchies for place records
//! from boundary/change-history reference data. Two phases over a place
//! store:
//!
//! 1. **Parent resolution** ([`resolver::ParentResolver`]): per place and per
//!    dimension (admin/census/electoral), pick exactly one parent by rule
//!    priority — lineage, country short-circuit, point-in-polygon, override.
//! 2. **Hierarchy traversal** ([`walker::HierarchyWalker`]): materialize each
//!    place's full ancestor path and metadata tree from the resolved parent
//!    map, encoded via the [`label`] codec.
//!
//! Batch, run-to-completion curation: storage and geometry stay behind the
//! [`store`] traits, and both phases are deterministic over their input
//! snapshot so a run is always safe to repeat after patching config gaps.

pub mod config;
pub mod error;
pub mod label;
pub mod place;
pub mod resolver;
pub mod store;
pub mod walker;

#[cfg(test)]
mod testutil;

pub use config::{EntityMapping, HierarchyConfig, SanitiseRule};
pub use error::HierarchyError;
pub use place::{Dimension, Place, PlaceCode, PlaceSummary, TreeEntry};
pub use resolver::{ParentResolver, Resolution, RunMap};
pub use store::{ChangeHistory, ChangeRecord, EntityBatch, PlaceStore};
pub use walker::{walk, HierarchyWalker, PlaceIndex, Walk};
