//! Engineer registry model
//!
//! Defines [`EngineerRecord`], the canonical registry entry every legacy
//! planning name is resolved to, and its identifier and status types.

use crate::slug::Slug;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable engineer identifier
///
/// Assigned once at creation, never reused or mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineerId(pub Uuid);

impl EngineerId {
    /// Generate new engineer ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EngineerId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EngineerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EngineerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Employment status of an engineer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineerStatus {
    /// Currently assignable
    #[default]
    Active,
    /// No longer assignable
    Inactive,
    /// External contractor
    Contractor,
    /// Temporarily away
    OnLeave,
}

impl EngineerStatus {
    /// All statuses, in declaration order
    pub const ALL: [EngineerStatus; 4] = [
        EngineerStatus::Active,
        EngineerStatus::Inactive,
        EngineerStatus::Contractor,
        EngineerStatus::OnLeave,
    ];

    /// Wire name (`active`, `inactive`, `contractor`, `on_leave`)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineerStatus::Active => "active",
            EngineerStatus::Inactive => "inactive",
            EngineerStatus::Contractor => "contractor",
            EngineerStatus::OnLeave => "on_leave",
        }
    }
}

impl Display for EngineerStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown engineer status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for EngineerStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineerStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Status selection for registry reads
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Every engineer regardless of status
    #[default]
    All,
    /// Only engineers whose status is listed
    Only(Vec<EngineerStatus>),
}

impl StatusFilter {
    /// Check whether a status passes the filter
    #[inline]
    #[must_use]
    pub fn matches(&self, status: EngineerStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(allowed) => allowed.contains(&status),
        }
    }
}

/// One real engineer in the canonical registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineerRecord {
    /// Stable identifier
    pub id: EngineerId,
    /// Human-readable name (mutable)
    pub display_name: String,
    /// URL-safe secondary identifier, fixed at creation
    pub slug: Slug,
    /// Employment status
    pub status: EngineerStatus,
    /// Employing company, for contractors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Hourly rate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    /// Currency of `hourly_rate`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl EngineerRecord {
    /// Create new record without commercial details
    #[inline]
    #[must_use]
    pub fn new(
        id: EngineerId,
        display_name: impl Into<String>,
        slug: Slug,
        status: EngineerStatus,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            slug,
            status,
            company: None,
            hourly_rate: None,
            currency: None,
        }
    }

    /// With company
    #[inline]
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// With hourly rate and currency
    #[inline]
    #[must_use]
    pub fn with_rate(mut self, hourly_rate: f64, currency: impl Into<String>) -> Self {
        self.hourly_rate = Some(hourly_rate);
        self.currency = Some(currency.into());
        self
    }

    /// Rename the engineer; the slug is left untouched
    #[inline]
    pub fn rename(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name.into();
    }
}
