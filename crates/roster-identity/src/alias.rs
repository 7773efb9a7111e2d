//! Alias fallback table
//!
//! Organizational mappings from a known alias (nickname, old spelling, team
//! shorthand) to an engineer slug. The table is injected from configuration and
//! is consulted by the resolver only after exact-key lookup misses, so it can be
//! emptied once the underlying relational data exists.

use crate::normalize::{normalize, CanonicalKey};
use crate::slug::Slug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One configured alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRule {
    /// Name as it appears in legacy data
    pub alias: String,
    /// Slug of the engineer it stands for
    pub slug: Slug,
}

impl AliasRule {
    /// Create new rule
    #[inline]
    #[must_use]
    pub fn new(alias: impl Into<String>, slug: Slug) -> Self {
        Self {
            alias: alias.into(),
            slug,
        }
    }
}

/// Alias key -> slug mapping
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<CanonicalKey, Slug>,
}

impl AliasTable {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rules; the first rule for a given alias key wins
    #[must_use]
    pub fn from_rules<'a>(rules: impl IntoIterator<Item = &'a AliasRule>) -> Self {
        let mut entries = HashMap::new();
        for rule in rules {
            let key = normalize(&rule.alias);
            if key.is_empty() {
                continue;
            }
            entries.entry(key).or_insert_with(|| rule.slug.clone());
        }
        Self { entries }
    }

    /// Slug for an alias key
    #[inline]
    #[must_use]
    pub fn lookup(&self, key: &CanonicalKey) -> Option<&Slug> {
        self.entries.get(key)
    }

    /// Number of aliases
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if table is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(alias: &str, slug: &str) -> AliasRule {
        AliasRule::new(alias, slug.parse().unwrap())
    }

    #[test]
    fn alias_lookup_is_normalized() {
        let rules = vec![rule("Honza Novák", "jan-novak")];
        let table = AliasTable::from_rules(&rules);

        assert_eq!(
            table.lookup(&normalize("HONZA  NOVAK")).map(Slug::as_str),
            Some("jan-novak")
        );
        assert!(table.lookup(&normalize("Jan Novák")).is_none());
    }

    #[test]
    fn alias_first_rule_wins() {
        let rules = vec![rule("JN", "jan-novak"), rule("jn", "jana-nova")];
        let table = AliasTable::from_rules(&rules);

        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(&normalize("jn")).map(Slug::as_str), Some("jan-novak"));
    }

    #[test]
    fn alias_blank_rules_ignored() {
        let rules = vec![rule("  ", "jan-novak")];
        assert!(AliasTable::from_rules(&rules).is_empty());
    }
}
