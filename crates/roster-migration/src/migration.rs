//! Legacy planning migration
//!
//! Backfills canonical engineer ids onto legacy planning records.
//!
//! # Workflow
//! 1. Precondition: a populated registry and fully linked records is a no-op
//! 2. Build the [`IdentityIndex`] from the registry snapshot and report every
//!    collision it already holds
//! 3. Resolve each distinct name once; create an engineer for unmatched names
//!    and index it immediately so later spellings find it
//! 4. Write `engineer_id` onto every record, best effort, bounded concurrency
//! 5. Report counts and per-record failures
//!
//! The run keeps no state between invocations. Re-running steps 3 and 4 over
//! already linked data rewrites the same ids and creates nothing.

use crate::config::MigrationConfig;
use crate::error::{MigrationError, RecordFailure, StoreError};
use crate::report::MigrationReport;
use crate::store::PlanningStore;
use crate::types::{LegacyPlanningRecord, NewEngineer, RecordKey};
use futures::stream::{self, StreamExt};
use roster_identity::{
    normalize, AliasTable, CanonicalKey, EngineerId, EngineerRecord, IdentityIndex, Resolution,
    Resolver, StatusFilter,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of linking one record, before it is written
type Link = Result<EngineerId, MigrationError>;

/// Migration procedure bound to one store
pub struct Migrator {
    store: Arc<dyn PlanningStore>,
    config: MigrationConfig,
    aliases: AliasTable,
}

impl std::fmt::Debug for Migrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Migrator {
    /// Create migrator with default configuration
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn PlanningStore>) -> Self {
        Self::with_config(store, MigrationConfig::default())
    }

    /// Create migrator with explicit configuration
    #[must_use]
    pub fn with_config(store: Arc<dyn PlanningStore>, config: MigrationConfig) -> Self {
        let aliases = config.alias_table();
        Self {
            store,
            config,
            aliases,
        }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Read both tables from the store and migrate
    ///
    /// A failed read yields a failed report rather than an error.
    pub async fn run_migration(&self) -> MigrationReport {
        tracing::info!("Starting legacy planning migration");

        let existing = match self.store.read_engineers(&StatusFilter::All).await {
            Ok(engineers) => engineers,
            Err(e) => {
                tracing::error!("Failed to read engineers: {}", e);
                return MigrationReport::input_unavailable("engineers", &e.into());
            }
        };

        let legacy = match self.store.read_legacy_planning_records().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Failed to read legacy planning records: {}", e);
                return MigrationReport::input_unavailable("legacy planning records", &e.into());
            }
        };

        self.migrate(&legacy, existing).await
    }

    /// Migrate the given legacy records against a registry snapshot
    pub async fn migrate(
        &self,
        legacy: &[LegacyPlanningRecord],
        existing: Vec<EngineerRecord>,
    ) -> MigrationReport {
        if !existing.is_empty() && legacy.iter().all(LegacyPlanningRecord::is_linked) {
            tracing::info!(
                "All {} planning records already linked; nothing to migrate",
                legacy.len()
            );
            return MigrationReport::already_migrated();
        }

        let start_time = Instant::now();
        let mut index = IdentityIndex::build(existing);
        let mut report = MigrationReport::new();
        tracing::debug!("Indexed {} engineers", index.len());

        // registry duplicates are reported whether or not a legacy name hits them
        for collision in index.collisions() {
            tracing::warn!(
                "{} engineers in the registry share the name key '{}'",
                collision.engineers.len(),
                collision.key
            );
            report.record_collision(&collision);
        }

        let plan = self.plan_links(legacy, &mut index, &mut report).await;
        self.write_links(plan, &mut report).await;

        let report = report.finish();
        tracing::info!(
            "Migration finished in {}ms: {} created, {} updated, {} errors",
            start_time.elapsed().as_millis(),
            report.migrated,
            report.planning_entries_updated,
            report.errors
        );
        report
    }

    /// Decide the engineer for every record, resolving each name once
    async fn plan_links(
        &self,
        legacy: &[LegacyPlanningRecord],
        index: &mut IdentityIndex,
        report: &mut MigrationReport,
    ) -> Vec<(RecordKey, Link)> {
        let mut by_name: HashMap<CanonicalKey, Link> = HashMap::new();
        let mut plan = Vec::with_capacity(legacy.len());

        for record in legacy {
            let link = match record.engineer_id {
                Some(id) if index.lookup_by_id(id).is_some() => Ok(id),
                linked => {
                    if let Some(dangling) = linked {
                        tracing::warn!(
                            "Record {} references unknown engineer {}; re-resolving by name",
                            record.key,
                            dangling
                        );
                    }

                    let key = normalize(&record.konstrukter);
                    if key.is_empty() {
                        Err(MigrationError::Validation(format!(
                            "konstrukter {:?} is empty after normalization",
                            record.konstrukter
                        )))
                    } else if let Some(link) = by_name.get(&key) {
                        link.clone()
                    } else {
                        let link = self.link_name(&record.konstrukter, &key, index, report).await;
                        by_name.insert(key, link.clone());
                        link
                    }
                }
            };
            plan.push((record.key.clone(), link));
        }

        tracing::debug!("Resolved {} distinct names", by_name.len());
        plan
    }

    /// Resolve one name, creating an engineer if nobody matches
    async fn link_name(
        &self,
        raw_name: &str,
        key: &CanonicalKey,
        index: &mut IdentityIndex,
        report: &mut MigrationReport,
    ) -> Link {
        if let Some(id) = self.resolve_existing(key, index, report) {
            return Ok(id);
        }
        self.create_engineer(raw_name, key, index, report).await
    }

    /// Exact key (then alias) lookup; collisions are reported and resolve to first-seen
    fn resolve_existing(
        &self,
        key: &CanonicalKey,
        index: &IdentityIndex,
        report: &mut MigrationReport,
    ) -> Option<EngineerId> {
        let resolution = Resolver::new(index)
            .with_aliases(&self.aliases)
            .resolve_key(key.clone());

        match &resolution {
            Resolution::Collision(collision) => {
                tracing::warn!(
                    "{} engineers share the name key '{}'; linking to first-seen",
                    collision.engineers.len(),
                    key
                );
                report.record_collision(collision);
            }
            Resolution::Matched { engineer, via } => {
                tracing::debug!("Matched '{}' to {} via {:?}", key, engineer.id, via);
            }
            Resolution::Unmatched(_) => {}
        }

        resolution.engineer().map(|engineer| engineer.id)
    }

    /// Create an engineer for an unmatched name
    ///
    /// A slug conflict means someone else may have just created the same person:
    /// re-read the registry, re-resolve, and only then retry with another slug.
    async fn create_engineer(
        &self,
        raw_name: &str,
        key: &CanonicalKey,
        index: &mut IdentityIndex,
        report: &mut MigrationReport,
    ) -> Link {
        let attempts = self.config.max_create_attempts.max(1);

        for attempt in 1..=attempts {
            let slug = index.allocate_slug(key);
            let request = NewEngineer::new(raw_name, slug.clone(), self.config.default_status);

            match self.store.create_engineer(&request).await {
                Ok(id) => {
                    tracing::info!("Created engineer '{}' as {} ({})", raw_name, slug, id);
                    index.insert(request.into_record(id));
                    report.migrated += 1;
                    return Ok(id);
                }
                Err(StoreError::Conflict { slug }) => {
                    tracing::warn!(
                        "Slug {} taken while creating '{}' (attempt {}/{}); re-resolving",
                        slug,
                        raw_name,
                        attempt,
                        attempts
                    );
                    let fresh = self.store.read_engineers(&StatusFilter::All).await?;
                    for engineer in fresh {
                        index.insert(engineer);
                    }
                    index.reserve_slug(slug);

                    if let Some(id) = self.resolve_existing(key, index, report) {
                        tracing::info!("'{}' was created concurrently as {}", raw_name, id);
                        return Ok(id);
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to create engineer '{}': {}", raw_name, e);
                    return Err(e.into());
                }
            }
        }

        Err(MigrationError::Conflict {
            name: raw_name.to_string(),
            attempts,
        })
    }

    /// Persist every planned link; failures are recorded, never fatal
    async fn write_links(&self, plan: Vec<(RecordKey, Link)>, report: &mut MigrationReport) {
        let store = &self.store;

        let results: Vec<Result<(), RecordFailure>> = stream::iter(plan)
            .map(|(record, link)| async move {
                let engineer_id = match link {
                    Ok(id) => id,
                    Err(e) => return Err(RecordFailure::new(record, e)),
                };
                match store.update_planning_record_engineer_id(&record, engineer_id).await {
                    Ok(()) => Ok(()),
                    Err(e) => Err(RecordFailure::new(record, e.into())),
                }
            })
            .buffered(self.config.write_concurrency.max(1))
            .collect()
            .await;

        for result in results {
            match result {
                Ok(()) => report.planning_entries_updated += 1,
                Err(failure) => {
                    tracing::warn!("{} ({})", failure, failure.error.kind());
                    report.record_failure(&failure);
                }
            }
        }
    }
}
