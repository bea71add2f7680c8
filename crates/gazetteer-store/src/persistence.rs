//! Snapshot and checkpoint files.
//!
//! Two durable artifacts cross the phase boundary:
//! - the store snapshot (`StoreSnapshot` JSON) the CLI loads and saves, and
//! - the run checkpoint (`parents.json` / `hierarchy.json`): a code-keyed map
//!   of place records handed from the resolver phase to the walker phase.

use crate::StoreSnapshot;
use anyhow::{Context, Result};
use gazetteer_hierarchy::RunMap;
use std::path::Path;

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<StoreSnapshot> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening store snapshot {}", path.display()))?;
    let snapshot: StoreSnapshot = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("parsing store snapshot {}", path.display()))?;
    tracing::debug!(
        places = snapshot.places.len(),
        history = snapshot.history.len(),
        "loaded store snapshot"
    );
    Ok(snapshot)
}

pub fn save_snapshot(path: impl AsRef<Path>, snapshot: &StoreSnapshot) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json)
        .with_context(|| format!("writing store snapshot {}", path.display()))?;
    Ok(())
}

/// Write a resolver/walker checkpoint: place code -> full place record.
pub fn write_checkpoint(path: impl AsRef<Path>, run: &RunMap) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(run)?;
    std::fs::write(path, json)
        .with_context(|| format!("writing checkpoint {}", path.display()))?;
    Ok(())
}

/// Read a checkpoint written by [`write_checkpoint`].
pub fn read_checkpoint(path: impl AsRef<Path>) -> Result<RunMap> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening checkpoint {}", path.display()))?;
    let run = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("parsing checkpoint {}", path.display()))?;
    Ok(run)
}
