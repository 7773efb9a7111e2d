//! Storage collaborator
//!
//! [`PlanningStore`] is the boundary to the persistence layer: the engineer
//! registry and the legacy planning table. [`InMemoryStore`] is the reference
//! implementation used by the CLI and the test suite; it enforces the same slug
//! uniqueness constraint real storage must provide for concurrent migrations.

use crate::error::StoreError;
use crate::types::{LegacyPlanningRecord, NewEngineer, RecordKey};
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use indexmap::IndexMap;
use parking_lot::RwLock;
use roster_identity::{EngineerId, EngineerRecord, Slug, StatusFilter};
use serde::{Deserialize, Serialize};

/// Persistence boundary consumed by migration
#[async_trait::async_trait]
pub trait PlanningStore: Send + Sync {
    /// Engineers passing the status filter, in creation order
    async fn read_engineers(&self, filter: &StatusFilter) -> Result<Vec<EngineerRecord>, StoreError>;

    /// Every legacy planning record
    async fn read_legacy_planning_records(&self) -> Result<Vec<LegacyPlanningRecord>, StoreError>;

    /// Create an engineer and return its new id
    ///
    /// # Errors
    /// [`StoreError::Conflict`] if the slug already exists.
    async fn create_engineer(&self, engineer: &NewEngineer) -> Result<EngineerId, StoreError>;

    /// Set `engineer_id` on one planning record, leaving every other field as is
    async fn update_planning_record_engineer_id(
        &self,
        record: &RecordKey,
        engineer_id: EngineerId,
    ) -> Result<(), StoreError>;
}

/// Serializable contents of a store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Engineer registry
    #[serde(default)]
    pub engineers: Vec<EngineerRecord>,
    /// Legacy planning table
    #[serde(default)]
    pub planning_records: Vec<LegacyPlanningRecord>,
}

/// In-memory planning store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// Registry in creation order
    engineers: RwLock<Vec<EngineerRecord>>,

    /// Uniqueness constraint: slug -> owner
    slugs: DashMap<Slug, EngineerId>,

    /// Referential constraint for planning updates
    ids: DashSet<EngineerId>,

    /// Planning table in insertion order
    planning: RwLock<IndexMap<RecordKey, LegacyPlanningRecord>>,
}

impl InMemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot
    ///
    /// # Errors
    /// [`StoreError::Conflict`] for a duplicate slug, [`StoreError::Rejected`]
    /// for a duplicate engineer id or record key.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        let store = Self::new();
        for engineer in snapshot.engineers {
            store.insert_engineer(engineer)?;
        }
        for record in snapshot.planning_records {
            store.insert_planning_record(record)?;
        }
        Ok(store)
    }

    /// Current contents
    #[must_use]
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            engineers: self.engineers(),
            planning_records: self.planning_records(),
        }
    }

    /// Add an existing engineer, keeping its id and slug
    ///
    /// # Errors
    /// As [`InMemoryStore::from_snapshot`].
    pub fn insert_engineer(&self, engineer: EngineerRecord) -> Result<(), StoreError> {
        // slug claim and registry push happen under one lock, so a caller that
        // sees a conflict always finds the winner on its next read
        let mut engineers = self.engineers.write();

        if self.ids.contains(&engineer.id) {
            return Err(StoreError::Rejected(format!(
                "duplicate engineer id {}",
                engineer.id
            )));
        }
        match self.slugs.entry(engineer.slug.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict {
                slug: engineer.slug,
            }),
            Entry::Vacant(slot) => {
                slot.insert(engineer.id);
                self.ids.insert(engineer.id);
                engineers.push(engineer);
                Ok(())
            }
        }
    }

    /// Add a planning record
    ///
    /// # Errors
    /// [`StoreError::Rejected`] if the key exists.
    pub fn insert_planning_record(&self, record: LegacyPlanningRecord) -> Result<(), StoreError> {
        let mut planning = self.planning.write();
        if planning.contains_key(&record.key) {
            return Err(StoreError::Rejected(format!(
                "duplicate planning record {}",
                record.key
            )));
        }
        planning.insert(record.key.clone(), record);
        Ok(())
    }

    /// All engineers, in creation order
    #[must_use]
    pub fn engineers(&self) -> Vec<EngineerRecord> {
        self.engineers.read().clone()
    }

    /// All planning records, in insertion order
    #[must_use]
    pub fn planning_records(&self) -> Vec<LegacyPlanningRecord> {
        self.planning.read().values().cloned().collect()
    }

    /// One planning record
    #[must_use]
    pub fn planning_record(&self, key: &RecordKey) -> Option<LegacyPlanningRecord> {
        self.planning.read().get(key).cloned()
    }

    /// Number of engineers
    #[inline]
    #[must_use]
    pub fn engineer_count(&self) -> usize {
        self.engineers.read().len()
    }
}

#[async_trait::async_trait]
impl PlanningStore for InMemoryStore {
    async fn read_engineers(&self, filter: &StatusFilter) -> Result<Vec<EngineerRecord>, StoreError> {
        Ok(self
            .engineers
            .read()
            .iter()
            .filter(|e| filter.matches(e.status))
            .cloned()
            .collect())
    }

    async fn read_legacy_planning_records(&self) -> Result<Vec<LegacyPlanningRecord>, StoreError> {
        Ok(self.planning_records())
    }

    async fn create_engineer(&self, engineer: &NewEngineer) -> Result<EngineerId, StoreError> {
        let id = EngineerId::new();
        self.insert_engineer(engineer.clone().into_record(id))?;
        tracing::debug!("Created engineer {} ({})", engineer.slug, id);
        Ok(id)
    }

    async fn update_planning_record_engineer_id(
        &self,
        record: &RecordKey,
        engineer_id: EngineerId,
    ) -> Result<(), StoreError> {
        if !self.ids.contains(&engineer_id) {
            return Err(StoreError::Rejected(format!(
                "unknown engineer {engineer_id}"
            )));
        }

        let mut planning = self.planning.write();
        let row = planning
            .get_mut(record)
            .ok_or_else(|| StoreError::RecordNotFound(record.clone()))?;
        row.engineer_id = Some(engineer_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_identity::EngineerStatus;

    fn engineer(name: &str, slug: &str, status: EngineerStatus) -> EngineerRecord {
        EngineerRecord::new(EngineerId::new(), name, slug.parse().unwrap(), status)
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        futures::executor::block_on(future)
    }

    #[test]
    fn create_engineer_enforces_unique_slug() {
        let store = InMemoryStore::new();
        let request = NewEngineer::new("Jan Novák", "jan-novak".parse().unwrap(), EngineerStatus::Active);

        let id = block_on(store.create_engineer(&request)).unwrap();
        let second = block_on(store.create_engineer(&request));

        assert!(matches!(second, Err(StoreError::Conflict { .. })));
        assert_eq!(store.engineer_count(), 1);
        assert_eq!(store.engineers()[0].id, id);
    }

    #[test]
    fn conflicting_insert_sees_winner_in_registry() {
        for _ in 0..200 {
            let store = InMemoryStore::new();
            let slug: Slug = "jan-novak".parse().unwrap();

            std::thread::scope(|scope| {
                for _ in 0..4 {
                    scope.spawn(|| {
                        let result = store.insert_engineer(engineer("Jan Novák", "jan-novak", EngineerStatus::Active));
                        if let Err(StoreError::Conflict { .. }) = result {
                            let owners = block_on(store.read_engineers(&StatusFilter::All)).unwrap();
                            assert!(owners.iter().any(|e| e.slug == slug));
                        }
                    });
                }
            });

            assert_eq!(store.engineer_count(), 1);
        }
    }

    #[test]
    fn read_engineers_filters_by_status() {
        let store = InMemoryStore::new();
        store.insert_engineer(engineer("Jan", "jan", EngineerStatus::Active)).unwrap();
        store.insert_engineer(engineer("Eva", "eva", EngineerStatus::OnLeave)).unwrap();

        let all = block_on(store.read_engineers(&StatusFilter::All)).unwrap();
        let active = block_on(store.read_engineers(&StatusFilter::Only(vec![EngineerStatus::Active]))).unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].display_name, "Jan");
    }

    #[test]
    fn update_only_touches_engineer_id() {
        let store = InMemoryStore::new();
        let jan = engineer("Jan", "jan", EngineerStatus::Active);
        let record = LegacyPlanningRecord::new("r1", "Jan", "CW10", "2024-03", 40.0, "PRJ-1");
        store.insert_engineer(jan.clone()).unwrap();
        store.insert_planning_record(record.clone()).unwrap();

        block_on(store.update_planning_record_engineer_id(&record.key, jan.id)).unwrap();

        let stored = store.planning_record(&record.key).unwrap();
        assert_eq!(stored.engineer_id, Some(jan.id));
        assert!(stored.same_payload(&record));
    }

    #[test]
    fn update_rejects_unknown_engineer_and_record() {
        let store = InMemoryStore::new();
        let jan = engineer("Jan", "jan", EngineerStatus::Active);
        store.insert_engineer(jan.clone()).unwrap();

        let unknown_engineer =
            block_on(store.update_planning_record_engineer_id(&RecordKey::new("r1"), EngineerId::new()));
        let unknown_record = block_on(store.update_planning_record_engineer_id(&RecordKey::new("r1"), jan.id));

        assert!(matches!(unknown_engineer, Err(StoreError::Rejected(_))));
        assert_eq!(unknown_record, Err(StoreError::RecordNotFound(RecordKey::new("r1"))));
    }

    #[test]
    fn snapshot_roundtrip_preserves_order() {
        let snapshot = Snapshot {
            engineers: vec![
                engineer("Jan", "jan", EngineerStatus::Active),
                engineer("Eva", "eva", EngineerStatus::Contractor),
            ],
            planning_records: vec![
                LegacyPlanningRecord::new("r2", "Eva", "CW01", "2024-01", 8.0, "A"),
                LegacyPlanningRecord::new("r1", "Jan", "CW01", "2024-01", 8.0, "A"),
            ],
        };

        let store = InMemoryStore::from_snapshot(snapshot.clone()).unwrap();
        assert_eq!(store.to_snapshot(), snapshot);
    }

    #[test]
    fn snapshot_rejects_duplicate_slug() {
        let snapshot = Snapshot {
            engineers: vec![
                engineer("Jan", "jan", EngineerStatus::Active),
                engineer("Jan", "jan", EngineerStatus::Active),
            ],
            planning_records: Vec::new(),
        };

        assert!(matches!(
            InMemoryStore::from_snapshot(snapshot),
            Err(StoreError::Conflict { .. })
        ));
    }
}
