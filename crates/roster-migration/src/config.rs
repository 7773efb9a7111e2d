//! Migration configuration
//!
//! [`MigrationConfig`] is plain serde data with builder-style setters. It can be
//! loaded from a TOML file:
//!
//! ```toml
//! default_status = "active"
//! write_concurrency = 8
//! max_create_attempts = 3
//!
//! [[aliases]]
//! alias = "Honza Novák"
//! slug = "jan-novak"
//! ```

use roster_identity::{normalize, AliasRule, AliasTable, EngineerStatus};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Migration configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrationConfig {
    /// Status given to engineers created by migration
    pub default_status: EngineerStatus,
    /// Planning-record writes in flight at once
    pub write_concurrency: usize,
    /// Create attempts per name before a slug conflict is surfaced
    pub max_create_attempts: u32,
    /// Fallback alias mappings, consulted after exact-key lookup misses
    pub aliases: Vec<AliasRule>,
}

impl MigrationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With default status for created engineers
    #[inline]
    #[must_use]
    pub fn with_default_status(mut self, status: EngineerStatus) -> Self {
        self.default_status = status;
        self
    }

    /// With write concurrency
    #[inline]
    #[must_use]
    pub fn with_write_concurrency(mut self, concurrency: usize) -> Self {
        self.write_concurrency = concurrency;
        self
    }

    /// With create attempts
    #[inline]
    #[must_use]
    pub fn with_max_create_attempts(mut self, attempts: u32) -> Self {
        self.max_create_attempts = attempts;
        self
    }

    /// With alias rules
    #[inline]
    #[must_use]
    pub fn with_aliases(mut self, aliases: Vec<AliasRule>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed input and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`MigrationConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.write_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "write_concurrency must be at least 1".to_string(),
            ));
        }
        if self.max_create_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_create_attempts must be at least 1".to_string(),
            ));
        }
        // an alias with an empty key could never match a name
        if let Some(rule) = self
            .aliases
            .iter()
            .find(|r| normalize(&r.alias).is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "alias for slug {} is empty",
                rule.slug
            )));
        }
        Ok(())
    }

    /// Alias fallback table built from the configured rules
    #[must_use]
    pub fn alias_table(&self) -> AliasTable {
        AliasTable::from_rules(&self.aliases)
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            default_status: EngineerStatus::Active,
            write_concurrency: 8,
            max_create_attempts: 3,
            aliases: Vec::new(),
        }
    }
}
