//! Error types for roster migration
//!
//! Provides error handling for:
//! - Storage collaborator failures
//! - Per-record and per-name migration failures
//!
//! None of these abort a migration run. They are collected into the
//! [`MigrationReport`](crate::MigrationReport) and the batch continues.

use crate::types::RecordKey;
use roster_identity::{CanonicalKey, EngineerId, Slug};

/// Storage collaborator errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Uniqueness constraint hit on create
    #[error("slug already exists: {slug}")]
    Conflict { slug: Slug },

    /// Storage unreachable
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Storage refused the write
    #[error("write rejected: {0}")]
    Rejected(String),

    /// Update addressed a record that does not exist
    #[error("planning record not found: {0}")]
    RecordNotFound(RecordKey),
}

impl StoreError {
    /// Check for a uniqueness violation
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Migration error kinds
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// Malformed legacy record (skipped)
    #[error("invalid record: {0}")]
    Validation(String),

    /// Creation kept conflicting after re-resolution
    #[error("engineer '{name}' could not be created: slug conflict persisted after {attempts} attempts")]
    Conflict { name: String, attempts: u32 },

    /// Storage failed or rejected an operation
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    /// Distinct existing engineers share one canonical key
    #[error("collision: {} engineers normalize to '{key}' ({}); linked to first-seen {first_seen}", .engineers.len(), join_ids(.engineers))]
    CollisionDetected {
        key: CanonicalKey,
        engineers: Vec<EngineerId>,
        first_seen: EngineerId,
    },
}

impl MigrationError {
    /// Check if re-running the migration may clear this error
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Conflict { .. } | Self::Persistence(StoreError::Unavailable(_))
        )
    }

    /// Error kind label for logs
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Conflict { .. } => "conflict",
            Self::Persistence(_) => "persistence",
            Self::CollisionDetected { .. } => "collision",
        }
    }
}

/// A migration error tied to the legacy record it hit
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record {record}: {error}")]
pub struct RecordFailure {
    /// Offending record
    pub record: RecordKey,
    /// What went wrong
    pub error: MigrationError,
}

impl RecordFailure {
    /// Create new failure
    #[inline]
    #[must_use]
    pub fn new(record: RecordKey, error: MigrationError) -> Self {
        Self { record, error }
    }
}

fn join_ids(ids: &[EngineerId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_identity::normalize;

    #[test]
    fn store_error_display() {
        let err = StoreError::Conflict {
            slug: "jan-novak".parse().unwrap(),
        };
        assert_eq!(err.to_string(), "slug already exists: jan-novak");
        assert!(err.is_conflict());
        assert!(!StoreError::Unavailable("down".into()).is_conflict());
    }

    #[test]
    fn record_failure_display_names_record() {
        let failure = RecordFailure::new(
            RecordKey::new("r7"),
            MigrationError::Validation("empty konstrukter".into()),
        );
        assert_eq!(failure.to_string(), "record r7: invalid record: empty konstrukter");
    }

    #[test]
    fn persistence_from_store_error() {
        let err: MigrationError = StoreError::Rejected("row locked".into()).into();
        assert_eq!(err.to_string(), "persistence failed: write rejected: row locked");
        assert_eq!(err.kind(), "persistence");
        assert!(!err.is_retryable());
    }

    #[test]
    fn collision_display_lists_ids() {
        let first = EngineerId::new();
        let second = EngineerId::new();
        let err = MigrationError::CollisionDetected {
            key: normalize("Jan Novák"),
            engineers: vec![first, second],
            first_seen: first,
        };

        let message = err.to_string();
        assert!(message.starts_with("collision: 2 engineers normalize to 'jan novak'"));
        assert!(message.contains(&second.to_string()));
        assert!(message.ends_with(&format!("linked to first-seen {first}")));
    }

    #[test]
    fn retryable_kinds() {
        assert!(MigrationError::Conflict {
            name: "Jan".into(),
            attempts: 3
        }
        .is_retryable());
        assert!(MigrationError::Persistence(StoreError::Unavailable("down".into())).is_retryable());
        assert!(!MigrationError::Validation("empty".into()).is_retryable());
    }
}
