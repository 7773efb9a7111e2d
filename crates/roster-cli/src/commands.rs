//! Subcommand implementations

use crate::snapshot;
use anyhow::Context;
use roster_identity::{
    normalize, search, IdentityIndex, MatchSource, Resolution, Resolver, Slug, StatusFilter,
};
use roster_migration::{MigrationConfig, Migrator, PlanningStore};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

fn load_config(path: Option<&Path>) -> anyhow::Result<MigrationConfig> {
    match path {
        Some(path) => MigrationConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(MigrationConfig::default()),
    }
}

/// Run the migration over a snapshot file; returns the report's `success`
pub(crate) async fn migrate(
    data: &Path,
    config: Option<&Path>,
    json_output: bool,
    dry_run: bool,
) -> anyhow::Result<bool> {
    let config = load_config(config)?;
    let store = Arc::new(snapshot::open_store(data)?);

    let report = Migrator::with_config(store.clone(), config)
        .run_migration()
        .await;

    if dry_run {
        tracing::info!("Dry run; {} left unchanged", data.display());
    } else {
        snapshot::save(data, &store.to_snapshot())?;
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.generate_text());
    }
    Ok(report.success)
}

/// Print the canonical key and base slug of each name
pub(crate) fn normalize_names(names: &[String], json_output: bool) -> anyhow::Result<()> {
    if json_output {
        let rows: Vec<_> = names
            .iter()
            .map(|name| {
                let key = normalize(name);
                json!({ "name": name, "key": key, "slug": Slug::derive(&key) })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for name in names {
            let key = normalize(name);
            println!("{}\t{}\t{}", name, key, Slug::derive(&key));
        }
    }
    Ok(())
}

/// Load the registry of a snapshot into an index
async fn load_index(data: &Path) -> anyhow::Result<IdentityIndex> {
    let store = snapshot::open_store(data)?;
    let engineers = store
        .read_engineers(&StatusFilter::All)
        .await
        .context("failed to read engineers")?;
    Ok(IdentityIndex::build(engineers))
}

/// Print the authoritative resolution of each name
pub(crate) async fn resolve(
    data: &Path,
    config: Option<&Path>,
    names: &[String],
    json_output: bool,
) -> anyhow::Result<()> {
    let aliases = load_config(config)?.alias_table();
    let index = load_index(data).await?;
    let resolver = Resolver::new(&index).with_aliases(&aliases);

    let mut rows = Vec::with_capacity(names.len());
    for name in names {
        let resolution = resolver.resolve(name);
        if json_output {
            rows.push(resolution_json(name, &resolution));
        } else {
            println!("{}", describe(name, &resolution));
        }
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }
    Ok(())
}

fn describe(name: &str, resolution: &Resolution) -> String {
    match resolution {
        Resolution::Matched { engineer, via } => {
            let via = match via {
                MatchSource::ExactKey => "exact",
                MatchSource::Alias => "alias",
            };
            format!("{name} -> {} ({}) [{via}]", engineer.slug, engineer.id)
        }
        Resolution::Collision(collision) => {
            let first = collision
                .first_seen()
                .map(|e| format!("{} ({})", e.slug, e.id))
                .unwrap_or_default();
            format!(
                "{name} -> collision on '{}': {} engineers, first-seen {first}",
                collision.key,
                collision.engineers.len()
            )
        }
        Resolution::Unmatched(key) => format!("{name} -> unmatched (key '{key}')"),
    }
}

fn resolution_json(name: &str, resolution: &Resolution) -> serde_json::Value {
    match resolution {
        Resolution::Matched { engineer, via } => json!({
            "name": name,
            "outcome": "matched",
            "via": match via {
                MatchSource::ExactKey => "exact",
                MatchSource::Alias => "alias",
            },
            "engineer": engineer,
        }),
        Resolution::Collision(collision) => json!({
            "name": name,
            "outcome": "collision",
            "collision": collision,
        }),
        Resolution::Unmatched(key) => json!({
            "name": name,
            "outcome": "unmatched",
            "key": key,
        }),
    }
}

/// Print search suggestions; exact matches are starred
pub(crate) async fn search_names(data: &Path, query: &str) -> anyhow::Result<()> {
    let index = load_index(data).await?;
    let hits = search(&index, query);

    if hits.is_empty() {
        println!("No engineers match '{query}'");
    }
    for hit in hits {
        println!(
            "{} {}\t{}\t{}",
            if hit.exact { "*" } else { " " },
            hit.engineer.slug,
            hit.engineer.display_name,
            hit.engineer.status
        );
    }
    Ok(())
}
