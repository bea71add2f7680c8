//! Hierarchy traversal.
//!
//! Turns the resolved parent pointers into ancestor paths and metadata trees.
//! The walk is iterative over an immutable run index built once per run; the
//! index is also the lookup memo (every ancestor is revisited by each of its
//! descendants, so lookups stay O(1) for the run's duration). A per-walk
//! visited set turns a parent cycle into a detectable error instead of an
//! infinite loop.

use crate::error::{HierarchyError, Result as HierarchyResult};
use crate::label;
use crate::place::{Dimension, Place, PlaceCode, TreeEntry};
use crate::resolver::RunMap;
use crate::store::PlaceStore;
use anyhow::Result;
use std::collections::{HashMap, HashSet};

// ============================================================================
// Run index
// ============================================================================

/// Immutable code -> place index over all places participating in a run.
///
/// Construction fails fast on the first duplicate code: a duplicate is a
/// boundary/versioning artifact upstream, and walking an index that silently
/// kept one of the two records would corrupt every descendant's path.
#[derive(Debug)]
pub struct PlaceIndex {
    places: HashMap<PlaceCode, Place>,
}

impl PlaceIndex {
    pub fn build(places: impl IntoIterator<Item = Place>) -> HierarchyResult<Self> {
        let mut index = HashMap::new();
        for place in places {
            let code = place.id.clone();
            if index.insert(code.clone(), place).is_some() {
                return Err(HierarchyError::DuplicateCode { code });
            }
        }
        Ok(Self { places: index })
    }

    pub fn get(&self, code: &PlaceCode) -> Option<&Place> {
        self.places.get(code)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

// ============================================================================
// Walking
// ============================================================================

/// Ordered ancestor codes (nearest first) and their summary metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Walk {
    pub codes: Vec<PlaceCode>,
    pub tree: Vec<TreeEntry>,
}

/// Walk one place's parent chain in one dimension.
///
/// Starts from `place.parent(dim)` and follows parents until the chain
/// reaches an unset parent or a code absent from the index (dataset
/// boundary). The place itself is not part of its own path. A revisited code
/// aborts the walk with [`HierarchyError::CycleDetected`].
pub fn walk(index: &PlaceIndex, place: &Place, dim: Dimension) -> HierarchyResult<Walk> {
    let mut codes = Vec::new();
    let mut tree = Vec::new();
    let mut visited: HashSet<PlaceCode> = HashSet::new();
    visited.insert(place.id.clone());

    let mut next = place.parent(dim).cloned();
    while let Some(code) = next {
        if !visited.insert(code.clone()) {
            return Err(HierarchyError::CycleDetected {
                code,
                dimension: dim,
            });
        }
        let Some(ancestor) = index.get(&code) else {
            break;
        };
        codes.push(code.clone());
        tree.push(TreeEntry {
            code,
            summary: ancestor.summary(),
        });
        next = ancestor.parent(dim).cloned();
    }

    Ok(Walk { codes, tree })
}

// ============================================================================
// Batch driver
// ============================================================================

/// Walks every place in a resolved run map and writes `path_*`/`tree_*` back.
#[derive(Debug)]
pub struct HierarchyWalker<'a, S: PlaceStore> {
    store: &'a mut S,
    index: PlaceIndex,
}

impl<'a, S: PlaceStore> HierarchyWalker<'a, S> {
    /// Build the run index up front; a duplicate code aborts before any walk.
    pub fn new(store: &'a mut S, places: impl IntoIterator<Item = Place>) -> HierarchyResult<Self> {
        let index = PlaceIndex::build(places)?;
        Ok(Self { store, index })
    }

    /// Walk all three dimensions for every indexed place, encode paths, and
    /// commit each place individually. A cycle aborts that place's walk for
    /// that dimension only; remaining dimensions and places continue.
    pub fn build(&mut self) -> Result<RunMap> {
        let mut hierarchy = RunMap::new();
        tracing::info!(count = self.index.len(), "building parent/child hierarchies");

        let mut places: Vec<Place> = self.index.places.values().cloned().collect();
        places.sort_by(|a, b| a.id.cmp(&b.id));

        for mut place in places {
            tracing::debug!(code = %place.id, "walking");

            for dim in Dimension::ALL {
                match walk(&self.index, &place, dim) {
                    Ok(outcome) if outcome.codes.is_empty() => {
                        place.set_path(dim, None);
                        place.set_tree(dim, None);
                    }
                    Ok(outcome) => {
                        place.set_path(dim, Some(label::encode(&outcome.codes)));
                        place.set_tree(dim, Some(outcome.tree));
                    }
                    Err(HierarchyError::CycleDetected { code, dimension }) => {
                        tracing::error!(
                            code = %code,
                            dimension = %dimension,
                            "parent cycle detected, skipping walk"
                        );
                        place.set_path(dim, None);
                        place.set_tree(dim, None);
                    }
                    Err(err) => return Err(err.into()),
                }
            }

            self.store.update_hierarchy(&place)?;
            hierarchy.insert(place.id.clone(), place);
        }

        Ok(hierarchy)
    }
}
