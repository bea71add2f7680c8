//! Entity mapping configuration.
//!
//! Consumed (not owned) JSON schema:
//!
//! ```json
//! {
//!   "mappings":  { "ONS:GSS:E06": { "placetype": "district",
//!                                   "parents": { "admin": ["ONS:GSS:E12"] } } },
//!   "countries": { "ONS:GSS:E92": "ONS:GSS:E92:000001" },
//!   "overrides": { "ONS:GSS:E06:000053": { "admin": "ONS:GSS:E12:000009" } },
//!   "sanitise":  { "ONS:GSS:E05": { "pattern": " ED$", "repl": "" } }
//! }
//! ```
//!
//! Malformed config (missing required keys, unknown dimension names, patterns
//! that do not compile) is fatal at startup.

use crate::error::{HierarchyError, Result};
use crate::place::{Dimension, PlaceCode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

/// Output placetype and per-dimension candidate parent entity types for one
/// entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMapping {
    pub placetype: String,
    /// Dimension -> acceptable parent entity-type prefixes. A dimension
    /// absent here is not resolved for this entity type.
    #[serde(default)]
    pub parents: BTreeMap<Dimension, Vec<String>>,
}

/// One name-sanitising rule, keyed by entity-type prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitiseRule {
    pub pattern: String,
    pub repl: String,
}

/// Static rules driving parent resolution.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Entity type -> placetype + candidate parents. Entities absent here
    /// are skipped wholesale by the resolver (configuration gap, warned).
    pub mappings: BTreeMap<String, EntityMapping>,
    /// Country/root entity types and their fixed root codes. Such entities
    /// never receive a parent in any dimension.
    #[serde(default)]
    pub countries: BTreeMap<String, PlaceCode>,
    /// Manual (code, dimension) -> parent exceptions, consulted last.
    #[serde(default)]
    pub overrides: BTreeMap<PlaceCode, BTreeMap<Dimension, PlaceCode>>,
    /// Per-entity display-name rewrite rules.
    #[serde(default)]
    pub sanitise: BTreeMap<String, SanitiseRule>,

    #[serde(skip)]
    compiled_sanitise: HashMap<String, Regex>,
}

impl HierarchyConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut config: HierarchyConfig = serde_json::from_reader(reader)?;
        config.compile_sanitise()?;
        Ok(config)
    }

    /// Compile sanitise patterns up front so a bad pattern fails the run at
    /// startup instead of mid-scan.
    fn compile_sanitise(&mut self) -> Result<()> {
        self.compiled_sanitise.clear();
        for (entity, rule) in &self.sanitise {
            let re = Regex::new(&rule.pattern).map_err(|source| {
                HierarchyError::BadSanitisePattern {
                    entity: entity.clone(),
                    source,
                }
            })?;
            self.compiled_sanitise.insert(entity.clone(), re);
        }
        Ok(())
    }

    pub fn mapping(&self, entity: &str) -> Option<&EntityMapping> {
        self.mappings.get(entity)
    }

    pub fn is_country(&self, entity: &str) -> bool {
        self.countries.contains_key(entity)
    }

    pub fn country_root(&self, entity: &str) -> Option<&PlaceCode> {
        self.countries.get(entity)
    }

    pub fn override_for(&self, code: &PlaceCode, dim: Dimension) -> Option<&PlaceCode> {
        self.overrides.get(code)?.get(&dim)
    }

    /// Apply the sanitise rule for the code's entity prefix, if one exists.
    pub fn sanitise_name(&self, code: &PlaceCode, name: &str) -> String {
        let Some(prefix) = code.entity_prefix() else {
            return name.to_string();
        };
        match (self.compiled_sanitise.get(prefix), self.sanitise.get(prefix)) {
            (Some(re), Some(rule)) => re.replace_all(name, rule.repl.as_str()).into_owned(),
            _ => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "mappings": {
            "ONS:GSS:E06": {
                "placetype": "district",
                "parents": {
                    "admin": ["ONS:GSS:E12"],
                    "census": ["ONS:GSS:E12"],
                    "electoral": ["ONS:GSS:E92"]
                }
            },
            "ONS:GSS:E92": { "placetype": "country", "parents": {} }
        },
        "countries": { "ONS:GSS:E92": "ONS:GSS:E92:000001" },
        "overrides": {
            "ONS:GSS:E06:000053": { "admin": "ONS:GSS:E12:000009" }
        },
        "sanitise": {
            "ONS:GSS:E05": { "pattern": " ED$", "repl": "" }
        }
    }"#;

    #[test]
    fn parses_full_schema() {
        let config = HierarchyConfig::from_reader(CONFIG.as_bytes()).unwrap();
        let mapping = config.mapping("ONS:GSS:E06").unwrap();
        assert_eq!(mapping.placetype, "district");
        assert_eq!(
            mapping.parents.get(&Dimension::Admin).unwrap(),
            &vec!["ONS:GSS:E12".to_string()]
        );
        assert!(config.is_country("ONS:GSS:E92"));
        assert_eq!(
            config.country_root("ONS:GSS:E92").unwrap().as_str(),
            "ONS:GSS:E92:000001"
        );
    }

    #[test]
    fn override_lookup_is_per_dimension() {
        let config = HierarchyConfig::from_reader(CONFIG.as_bytes()).unwrap();
        let code = PlaceCode::from("ONS:GSS:E06:000053");
        assert_eq!(
            config.override_for(&code, Dimension::Admin).unwrap().as_str(),
            "ONS:GSS:E12:000009"
        );
        assert!(config.override_for(&code, Dimension::Census).is_none());
    }

    #[test]
    fn sanitise_applies_by_entity_prefix() {
        let config = HierarchyConfig::from_reader(CONFIG.as_bytes()).unwrap();
        let ward = PlaceCode::from("ONS:GSS:E05:000001");
        assert_eq!(config.sanitise_name(&ward, "Alnwick ED"), "Alnwick");
        // No rule for districts: name passes through.
        let district = PlaceCode::from("ONS:GSS:E06:000001");
        assert_eq!(config.sanitise_name(&district, "Hartlepool ED"), "Hartlepool ED");
    }

    #[test]
    fn bad_sanitise_pattern_is_fatal() {
        let config = r#"{
            "mappings": {},
            "sanitise": { "ONS:GSS:E05": { "pattern": "(", "repl": "" } }
        }"#;
        let err = HierarchyConfig::from_reader(config.as_bytes()).unwrap_err();
        assert!(matches!(err, HierarchyError::BadSanitisePattern { .. }));
    }

    #[test]
    fn missing_mappings_key_is_fatal() {
        let err = HierarchyConfig::from_reader("{}".as_bytes()).unwrap_err();
        assert!(matches!(err, HierarchyError::Json(_)));
    }

    #[test]
    fn unknown_dimension_name_is_fatal() {
        let config = r#"{
            "mappings": {
                "ONS:GSS:E06": { "placetype": "district",
                                 "parents": { "ceremonial": ["ONS:GSS:E12"] } }
            }
        }"#;
        let err = HierarchyConfig::from_reader(config.as_bytes()).unwrap_err();
        assert!(matches!(err, HierarchyError::Json(_)));
    }
}
