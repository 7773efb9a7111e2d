//! Testing utilities for the roster workspace
//!
//! Shared fixtures and store wrappers that inject failures or races.

#![allow(missing_docs)]

use parking_lot::Mutex;
use roster_identity::{normalize, EngineerId, EngineerRecord, EngineerStatus, Slug, StatusFilter};
use roster_migration::{
    InMemoryStore, LegacyPlanningRecord, NewEngineer, PlanningStore, RecordKey, StoreError,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn engineer(name: &str) -> EngineerRecord {
    engineer_with_slug(name, Slug::derive(&normalize(name)).as_str())
}

pub fn engineer_with_slug(name: &str, slug: &str) -> EngineerRecord {
    EngineerRecord::new(EngineerId::new(), name, slug.parse().unwrap(), EngineerStatus::Active)
}

pub fn legacy(key: &str, name: &str) -> LegacyPlanningRecord {
    LegacyPlanningRecord::new(key, name, "CW01", "2024-01", 40.0, "PRJ-1")
}

/// One record per name, keyed `r1`, `r2`, ...
pub fn legacy_batch(names: &[&str]) -> Vec<LegacyPlanningRecord> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            LegacyPlanningRecord::new(
                format!("r{}", i + 1),
                *name,
                format!("CW{:02}", i % 52 + 1),
                "2024-01",
                8.0 * (i % 5 + 1) as f64,
                format!("PRJ-{}", i % 3),
            )
        })
        .collect()
}

pub fn setup_store(
    engineers: &[EngineerRecord],
    records: &[LegacyPlanningRecord],
) -> Arc<InMemoryStore> {
    let store = InMemoryStore::new();
    for engineer in engineers {
        store.insert_engineer(engineer.clone()).unwrap();
    }
    for record in records {
        store.insert_planning_record(record.clone()).unwrap();
    }
    Arc::new(store)
}

/// Store whose planning updates fail for chosen record keys
pub struct FaultyStore {
    pub inner: Arc<InMemoryStore>,
    failing: HashSet<RecordKey>,
}

impl FaultyStore {
    pub fn new(inner: Arc<InMemoryStore>, failing: &[&str]) -> Self {
        Self {
            inner,
            failing: failing.iter().map(|k| RecordKey::new(*k)).collect(),
        }
    }
}

#[async_trait::async_trait]
impl PlanningStore for FaultyStore {
    async fn read_engineers(&self, filter: &StatusFilter) -> Result<Vec<EngineerRecord>, StoreError> {
        self.inner.read_engineers(filter).await
    }

    async fn read_legacy_planning_records(&self) -> Result<Vec<LegacyPlanningRecord>, StoreError> {
        self.inner.read_legacy_planning_records().await
    }

    async fn create_engineer(&self, engineer: &NewEngineer) -> Result<EngineerId, StoreError> {
        self.inner.create_engineer(engineer).await
    }

    async fn update_planning_record_engineer_id(
        &self,
        record: &RecordKey,
        engineer_id: EngineerId,
    ) -> Result<(), StoreError> {
        if self.failing.contains(record) {
            return Err(StoreError::Unavailable(format!("injected failure for {record}")));
        }
        self.inner.update_planning_record_engineer_id(record, engineer_id).await
    }
}

/// Store where a competing writer registers an engineer right before our first create
pub struct RacingStore {
    pub inner: Arc<InMemoryStore>,
    competitor: Mutex<Option<EngineerRecord>>,
    creates: AtomicUsize,
}

impl RacingStore {
    pub fn new(inner: Arc<InMemoryStore>, competitor: EngineerRecord) -> Self {
        Self {
            inner,
            competitor: Mutex::new(Some(competitor)),
            creates: AtomicUsize::new(0),
        }
    }

    /// Create calls seen, including rejected ones
    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PlanningStore for RacingStore {
    async fn read_engineers(&self, filter: &StatusFilter) -> Result<Vec<EngineerRecord>, StoreError> {
        self.inner.read_engineers(filter).await
    }

    async fn read_legacy_planning_records(&self) -> Result<Vec<LegacyPlanningRecord>, StoreError> {
        self.inner.read_legacy_planning_records().await
    }

    async fn create_engineer(&self, engineer: &NewEngineer) -> Result<EngineerId, StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let competitor = self.competitor.lock().take();
        if let Some(competitor) = competitor {
            self.inner.insert_engineer(competitor)?;
        }
        self.inner.create_engineer(engineer).await
    }

    async fn update_planning_record_engineer_id(
        &self,
        record: &RecordKey,
        engineer_id: EngineerId,
    ) -> Result<(), StoreError> {
        self.inner.update_planning_record_engineer_id(record, engineer_id).await
    }
}

/// Store that yields to the scheduler before every operation so that
/// concurrent migrations interleave
pub struct YieldingStore {
    pub inner: Arc<InMemoryStore>,
}

impl YieldingStore {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait::async_trait]
impl PlanningStore for YieldingStore {
    async fn read_engineers(&self, filter: &StatusFilter) -> Result<Vec<EngineerRecord>, StoreError> {
        tokio::task::yield_now().await;
        self.inner.read_engineers(filter).await
    }

    async fn read_legacy_planning_records(&self) -> Result<Vec<LegacyPlanningRecord>, StoreError> {
        tokio::task::yield_now().await;
        self.inner.read_legacy_planning_records().await
    }

    async fn create_engineer(&self, engineer: &NewEngineer) -> Result<EngineerId, StoreError> {
        tokio::task::yield_now().await;
        self.inner.create_engineer(engineer).await
    }

    async fn update_planning_record_engineer_id(
        &self,
        record: &RecordKey,
        engineer_id: EngineerId,
    ) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        self.inner.update_planning_record_engineer_id(record, engineer_id).await
    }
}
