//! Migration report
//!
//! [`MigrationReport`] is the stable contract rendered by UI and CLI layers.
//! The serialized field names (`success`, `message`, `migrated`,
//! `planningEntriesUpdated`, `errors`, `errorDetails`) must not change.

use crate::error::{MigrationError, RecordFailure};
use roster_identity::{Collision, EngineerId};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Outcome of one migration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    /// True only if no error occurred
    pub success: bool,
    /// One-line human summary
    pub message: String,
    /// Engineers created
    pub migrated: usize,
    /// Planning records whose engineer id was written
    pub planning_entries_updated: usize,
    /// Number of errors
    pub errors: usize,
    /// One line per error, naming the record or key it concerns
    pub error_details: Vec<String>,
    /// Name collisions hit by legacy records
    #[serde(default)]
    pub collisions: Vec<CollisionSummary>,
}

/// Reported name collision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionSummary {
    /// Shared canonical key
    pub key: String,
    /// Every colliding engineer, first-seen first
    pub engineer_ids: Vec<EngineerId>,
    /// Engineer the affected records were linked to
    pub linked_to: EngineerId,
}

impl MigrationReport {
    /// Empty report, to be filled and then [`finish`](Self::finish)ed
    #[must_use]
    pub fn new() -> Self {
        Self {
            success: true,
            message: String::new(),
            migrated: 0,
            planning_entries_updated: 0,
            errors: 0,
            error_details: Vec::new(),
            collisions: Vec::new(),
        }
    }

    /// Report for a run whose precondition found nothing to do
    #[must_use]
    pub fn already_migrated() -> Self {
        Self {
            message: "All planning records are already linked; nothing to migrate".to_string(),
            ..Self::new()
        }
    }

    /// Report for a run that could not read its input
    #[must_use]
    pub fn input_unavailable(what: &str, error: &MigrationError) -> Self {
        let mut report = Self::new();
        report.errors = 1;
        report.error_details.push(format!("reading {what}: {error}"));
        report.finish()
    }

    /// Count one error tied to a record
    pub fn record_failure(&mut self, failure: &RecordFailure) {
        self.errors += 1;
        self.error_details.push(failure.to_string());
    }

    /// Count one collision; repeated keys are ignored
    pub fn record_collision(&mut self, collision: &Collision) {
        let key = collision.key.as_str();
        if self.collisions.iter().any(|c| c.key == key) {
            return;
        }
        let Some(first) = collision.first_seen() else {
            return;
        };

        let error = MigrationError::CollisionDetected {
            key: collision.key.clone(),
            engineers: collision.ids(),
            first_seen: first.id,
        };
        self.errors += 1;
        self.error_details.push(error.to_string());
        self.collisions.push(CollisionSummary {
            key: key.to_string(),
            engineer_ids: collision.ids(),
            linked_to: first.id,
        });
    }

    /// Set `success` and `message` from the counts
    #[must_use]
    pub fn finish(mut self) -> Self {
        self.success = self.errors == 0;
        self.message = if self.success {
            format!(
                "Migration completed: {} engineers created, {} planning entries updated",
                self.migrated, self.planning_entries_updated
            )
        } else {
            format!(
                "Migration finished with {} errors: {} engineers created, {} planning entries updated",
                self.errors, self.migrated, self.planning_entries_updated
            )
        };
        self
    }

    /// Plain-text rendering for terminals
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Migration Report");
        let _ = writeln!(out, "================");
        let _ = writeln!(out, "{}", self.message);
        let _ = writeln!(out);
        let _ = writeln!(out, "  Engineers created:        {}", self.migrated);
        let _ = writeln!(out, "  Planning entries updated: {}", self.planning_entries_updated);
        let _ = writeln!(out, "  Errors:                   {}", self.errors);
        let _ = writeln!(
            out,
            "  Status:                   {}",
            if self.success { "SUCCESS" } else { "FAILED" }
        );
        if !self.error_details.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Errors:");
            for detail in &self.error_details {
                let _ = writeln!(out, "  - {detail}");
            }
        }
        out
    }
}

impl Default for MigrationReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordKey;
    use roster_identity::{normalize, EngineerRecord, EngineerStatus};

    fn collision() -> Collision {
        let engineers = ["jan-novak", "jan-novak-2"]
            .iter()
            .map(|slug| {
                EngineerRecord::new(
                    EngineerId::new(),
                    "Jan Novák",
                    slug.parse().unwrap(),
                    EngineerStatus::Active,
                )
            })
            .collect();
        Collision {
            key: normalize("Jan Novák"),
            engineers,
        }
    }

    #[test]
    fn report_serializes_contract_names() {
        let json = serde_json::to_value(MigrationReport::new().finish()).unwrap();

        for field in ["success", "message", "migrated", "planningEntriesUpdated", "errors", "errorDetails"] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }

    #[test]
    fn report_already_migrated_is_success_with_zero_counts() {
        let report = MigrationReport::already_migrated();

        assert!(report.success);
        assert_eq!(report.migrated, 0);
        assert_eq!(report.planning_entries_updated, 0);
        assert_eq!(report.errors, 0);
        assert!(report.error_details.is_empty());
    }

    #[test]
    fn report_failure_flips_success() {
        let mut report = MigrationReport::new();
        report.planning_entries_updated = 4;
        report.record_failure(&RecordFailure::new(
            RecordKey::new("r5"),
            MigrationError::Validation("empty konstrukter".into()),
        ));
        let report = report.finish();

        assert!(!report.success);
        assert_eq!(report.errors, 1);
        assert_eq!(report.error_details, vec!["record r5: invalid record: empty konstrukter"]);
        assert!(report.message.contains("1 errors"));
    }

    #[test]
    fn report_collision_counted_once() {
        let collision = collision();
        let mut report = MigrationReport::new();

        report.record_collision(&collision);
        report.record_collision(&collision);

        assert_eq!(report.errors, 1);
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].linked_to, collision.engineers[0].id);
        assert_eq!(report.collisions[0].key, "jan novak");
    }

    #[test]
    fn report_input_unavailable() {
        let error = MigrationError::Persistence(crate::StoreError::Unavailable("timeout".into()));
        let report = MigrationReport::input_unavailable("engineers", &error);

        assert!(!report.success);
        assert_eq!(report.errors, 1);
        assert_eq!(
            report.error_details,
            vec!["reading engineers: persistence failed: storage unavailable: timeout"]
        );
    }

    #[test]
    fn report_text_lists_errors() {
        let mut report = MigrationReport::new();
        report.record_collision(&collision());
        let text = report.finish().generate_text();

        assert!(text.contains("Status:                   FAILED"));
        assert!(text.contains("  - collision: 2 engineers"));
    }
}
