//! Planning data types
//!
//! Defines the legacy planning record that predates the engineer registry and
//! the creation request sent to storage for new engineers.

use roster_identity::{EngineerId, EngineerRecord, EngineerStatus, Slug};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Storage identity of a legacy planning record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(pub String);

impl RecordKey {
    /// Create new record key
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One (engineer name, calendar week) assignment from the legacy planning table
///
/// Only `engineer_id` is ever written by migration; the payload fields are
/// opaque and must come back out exactly as they went in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPlanningRecord {
    /// Storage identity
    pub key: RecordKey,
    /// Free-text engineer name, the only identity signal
    pub konstrukter: String,
    /// Calendar week
    pub cw: String,
    /// Month label
    pub month: String,
    /// Planned hours in that week
    pub hours_per_week: f64,
    /// Project the hours are booked on
    pub project_code: String,
    /// Canonical engineer, once resolved
    #[serde(default)]
    pub engineer_id: Option<EngineerId>,
}

impl LegacyPlanningRecord {
    /// Create new unlinked record
    #[inline]
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        konstrukter: impl Into<String>,
        cw: impl Into<String>,
        month: impl Into<String>,
        hours_per_week: f64,
        project_code: impl Into<String>,
    ) -> Self {
        Self {
            key: RecordKey::new(key),
            konstrukter: konstrukter.into(),
            cw: cw.into(),
            month: month.into(),
            hours_per_week,
            project_code: project_code.into(),
            engineer_id: None,
        }
    }

    /// With engineer already linked
    #[inline]
    #[must_use]
    pub fn linked_to(mut self, engineer_id: EngineerId) -> Self {
        self.engineer_id = Some(engineer_id);
        self
    }

    /// Check if the record carries an engineer id
    #[inline]
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.engineer_id.is_some()
    }

    /// Check that everything except `engineer_id` matches
    #[must_use]
    pub fn same_payload(&self, other: &LegacyPlanningRecord) -> bool {
        self.key == other.key
            && self.konstrukter == other.konstrukter
            && self.cw == other.cw
            && self.month == other.month
            && self.hours_per_week.to_bits() == other.hours_per_week.to_bits()
            && self.project_code == other.project_code
    }
}

/// Request to create one engineer in storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEngineer {
    /// Display name
    pub display_name: String,
    /// Proposed slug; storage rejects it if taken
    pub slug: Slug,
    /// Initial status
    pub status: EngineerStatus,
    /// Employing company
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Hourly rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    /// Currency of `hourly_rate`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl NewEngineer {
    /// Create new request without commercial details
    #[inline]
    #[must_use]
    pub fn new(display_name: impl Into<String>, slug: Slug, status: EngineerStatus) -> Self {
        Self {
            display_name: display_name.into(),
            slug,
            status,
            company: None,
            hourly_rate: None,
            currency: None,
        }
    }

    /// Registry record once storage has assigned an id
    #[must_use]
    pub fn into_record(self, id: EngineerId) -> EngineerRecord {
        EngineerRecord {
            id,
            display_name: self.display_name,
            slug: self.slug,
            status: self.status,
            company: self.company,
            hourly_rate: self.hourly_rate,
            currency: self.currency,
        }
    }
}
