//! Place records and the three hierarchy dimensions.
//!
//! A place code is colon-delimited: `<namespace>:<scheme>:<entity-type>:<local-code>`,
//! e.g. `ONS:GSS:E06:000001`. The first 11 bytes (`ONS:GSS:E06`) identify the
//! entity type; candidate-parent sets in config are expressed as such prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the entity-type prefix of a place code.
pub const ENTITY_PREFIX_LEN: usize = 11;

// ============================================================================
// Place codes
// ============================================================================

/// A globally unique place code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceCode(String);

impl PlaceCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The entity-type prefix (first 11 bytes), or `None` for codes too short
    /// to carry one. Prefix lookups treat such codes as matching nothing.
    pub fn entity_prefix(&self) -> Option<&str> {
        self.0.get(..ENTITY_PREFIX_LEN)
    }
}

impl fmt::Display for PlaceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlaceCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// Hierarchy dimensions
// ============================================================================

/// The three independent classification dimensions.
///
/// Each dimension carries its own parent/path/tree fields on [`Place`]; the
/// accessors below select the matching field so the dimensions stay
/// independently testable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Admin,
    Census,
    Electoral,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Admin, Dimension::Census, Dimension::Electoral];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Admin => "admin",
            Dimension::Census => "census",
            Dimension::Electoral => "electoral",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Ancestor metadata
// ============================================================================

/// Summary metadata recorded for each ancestor in a `tree_*` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub id: PlaceCode,
    pub name: String,
    pub placetype: Option<String>,
    pub entity: String,
    pub entity_name: String,
}

/// One ancestor entry of a `tree_*` field.
///
/// Stored as an ordered list rather than a map: tree key order must match the
/// corresponding `path_*` order, and JSON object key order is not something
/// serde maps guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub code: PlaceCode,
    pub summary: PlaceSummary,
}

// ============================================================================
// Place records
// ============================================================================

/// One geographic unit, as held by the place store.
///
/// The resolver fills `placetype`/`parent_*`; the walker fills
/// `path_*`/`tree_*`. Nothing here creates or deletes places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceCode,
    pub name: String,
    #[serde(default)]
    pub name_alt: Option<String>,
    pub entity: String,
    pub entity_name: String,
    #[serde(default)]
    pub entity_abbr: Option<String>,
    #[serde(default)]
    pub placetype: Option<String>,

    #[serde(default)]
    pub parent_admin: Option<PlaceCode>,
    #[serde(default)]
    pub parent_census: Option<PlaceCode>,
    #[serde(default)]
    pub parent_electoral: Option<PlaceCode>,

    #[serde(default)]
    pub path_admin: Option<String>,
    #[serde(default)]
    pub path_census: Option<String>,
    #[serde(default)]
    pub path_electoral: Option<String>,

    #[serde(default)]
    pub tree_admin: Option<Vec<TreeEntry>>,
    #[serde(default)]
    pub tree_census: Option<Vec<TreeEntry>>,
    #[serde(default)]
    pub tree_electoral: Option<Vec<TreeEntry>>,
}

impl Place {
    /// A bare record with nothing resolved, as produced by ingestion.
    pub fn new(
        id: impl Into<PlaceCode>,
        name: impl Into<String>,
        entity: impl Into<String>,
        entity_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            name_alt: None,
            entity: entity.into(),
            entity_name: entity_name.into(),
            entity_abbr: None,
            placetype: None,
            parent_admin: None,
            parent_census: None,
            parent_electoral: None,
            path_admin: None,
            path_census: None,
            path_electoral: None,
            tree_admin: None,
            tree_census: None,
            tree_electoral: None,
        }
    }

    pub fn parent(&self, dim: Dimension) -> Option<&PlaceCode> {
        match dim {
            Dimension::Admin => self.parent_admin.as_ref(),
            Dimension::Census => self.parent_census.as_ref(),
            Dimension::Electoral => self.parent_electoral.as_ref(),
        }
    }

    pub fn set_parent(&mut self, dim: Dimension, code: Option<PlaceCode>) {
        match dim {
            Dimension::Admin => self.parent_admin = code,
            Dimension::Census => self.parent_census = code,
            Dimension::Electoral => self.parent_electoral = code,
        }
    }

    pub fn path(&self, dim: Dimension) -> Option<&str> {
        match dim {
            Dimension::Admin => self.path_admin.as_deref(),
            Dimension::Census => self.path_census.as_deref(),
            Dimension::Electoral => self.path_electoral.as_deref(),
        }
    }

    pub fn set_path(&mut self, dim: Dimension, path: Option<String>) {
        match dim {
            Dimension::Admin => self.path_admin = path,
            Dimension::Census => self.path_census = path,
            Dimension::Electoral => self.path_electoral = path,
        }
    }

    pub fn tree(&self, dim: Dimension) -> Option<&[TreeEntry]> {
        match dim {
            Dimension::Admin => self.tree_admin.as_deref(),
            Dimension::Census => self.tree_census.as_deref(),
            Dimension::Electoral => self.tree_electoral.as_deref(),
        }
    }

    pub fn set_tree(&mut self, dim: Dimension, tree: Option<Vec<TreeEntry>>) {
        match dim {
            Dimension::Admin => self.tree_admin = tree,
            Dimension::Census => self.tree_census = tree,
            Dimension::Electoral => self.tree_electoral = tree,
        }
    }

    /// All three parent dimensions already set; the resolver skips such
    /// places entirely (the scan only selects places with at least one unset
    /// parent, so this is the idempotent re-run path).
    pub fn fully_resolved(&self) -> bool {
        self.parent_admin.is_some()
            && self.parent_census.is_some()
            && self.parent_electoral.is_some()
    }

    /// Summary metadata for tree entries.
    pub fn summary(&self) -> PlaceSummary {
        PlaceSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            placetype: self.placetype.clone(),
            entity: self.entity.clone(),
            entity_name: self.entity_name.clone(),
        }
    }
}
