//! Roster Migration
//!
//! Links legacy planning records to canonical engineer records.
//!
//! # Overview
//!
//! Legacy planning rows carry only a free-text engineer name. [`Migrator`]
//! resolves every distinct name through the identity index, creates engineers
//! that do not exist yet, and writes the resulting id back onto each row.
//! The run is idempotent and never aborts on a single bad record.
//!
//! # Example
//!
//! ```rust
//! use roster_migration::{InMemoryStore, LegacyPlanningRecord, Migrator};
//! use std::sync::Arc;
//!
//! # futures::executor::block_on(async {
//! let store = Arc::new(InMemoryStore::new());
//! store
//!     .insert_planning_record(LegacyPlanningRecord::new("r1", "Jan Novák", "CW01", "2024-01", 40.0, "PRJ-1"))
//!     .unwrap();
//!
//! let report = Migrator::new(store.clone()).run_migration().await;
//! assert!(report.success);
//! assert_eq!(report.migrated, 1);
//! # });
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod migration;
pub mod report;
pub mod store;
pub mod types;

// Re-exports
pub use config::{ConfigError, MigrationConfig};
pub use error::{MigrationError, RecordFailure, StoreError};
pub use migration::Migrator;
pub use report::{CollisionSummary, MigrationReport};
pub use store::{InMemoryStore, PlanningStore, Snapshot};
pub use types::{LegacyPlanningRecord, NewEngineer, RecordKey};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running migrations
    pub use crate::{
        InMemoryStore, LegacyPlanningRecord, MigrationConfig, MigrationReport, Migrator,
        PlanningStore, RecordKey,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
