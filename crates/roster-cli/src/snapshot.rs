//! JSON snapshot files
//!
//! A snapshot holds the engineer registry and the legacy planning table:
//! `{ "engineers": [...], "planningRecords": [...] }`. Saving goes through a
//! temporary file in the same directory so a crash never leaves a torn file.

use anyhow::Context;
use roster_migration::{InMemoryStore, Snapshot};
use std::io::Write;
use std::path::Path;

pub(crate) fn load(path: &Path) -> anyhow::Result<Snapshot> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&input)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))
}

pub(crate) fn save(path: &Path, snapshot: &Snapshot) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    serde_json::to_writer_pretty(&mut file, snapshot).context("failed to serialize snapshot")?;
    file.write_all(b"\n")?;
    file.persist(path)
        .with_context(|| format!("failed to write snapshot {}", path.display()))?;

    tracing::debug!("Saved snapshot to {}", path.display());
    Ok(())
}

/// Load a snapshot into a fresh store
pub(crate) fn open_store(path: &Path) -> anyhow::Result<InMemoryStore> {
    let snapshot = load(path)?;
    tracing::info!(
        "Loaded {} engineers and {} planning records from {}",
        snapshot.engineers.len(),
        snapshot.planning_records.len(),
        path.display()
    );
    InMemoryStore::from_snapshot(snapshot)
        .with_context(|| format!("inconsistent snapshot {}", path.display()))
}
