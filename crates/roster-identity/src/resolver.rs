//! Authoritative name resolution
//!
//! Provides [`Resolver`], which maps a free-text name to an engineer by exact
//! canonical-key equality. No fuzzy, partial or substring matching happens here:
//! substring matching on names is not injective ("Novák Jan" is a substring of
//! "Novák Jana") and would merge distinct people. See [`crate::search`] for the
//! non-authoritative interactive variant.
//!
//! # Policy
//! 1. `key = normalize(name)`; an empty key is unmatched
//! 2. Exact key lookup in the [`IdentityIndex`]
//!    - one engineer: matched
//!    - several engineers: [`Resolution::Collision`], surfaced with the
//!      first-seen engineer as the deterministic choice
//! 3. Only on a miss: the optional [`AliasTable`] fallback, alias -> slug -> engineer

use crate::alias::AliasTable;
use crate::engineer::{EngineerId, EngineerRecord};
use crate::index::{Collision, IdentityIndex};
use crate::normalize::{normalize, CanonicalKey};
use indexmap::IndexSet;

/// How a match was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    /// Canonical key equality
    ExactKey,
    /// Configured alias fallback
    Alias,
}

/// Outcome of resolving one name
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Exactly one engineer
    Matched {
        /// Resolved engineer
        engineer: EngineerRecord,
        /// Strategy that found it
        via: MatchSource,
    },
    /// Several engineers share the key
    Collision(Collision),
    /// No engineer; carries the normalized key
    Unmatched(CanonicalKey),
}

impl Resolution {
    /// Engineer to link to, if any
    ///
    /// For a collision this is the first-seen candidate, never a random one.
    #[must_use]
    pub fn engineer(&self) -> Option<&EngineerRecord> {
        match self {
            Resolution::Matched { engineer, .. } => Some(engineer),
            Resolution::Collision(collision) => collision.first_seen(),
            Resolution::Unmatched(_) => None,
        }
    }

    /// Check for a clean single match
    #[inline]
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Resolution::Matched { .. })
    }

    /// Check for a collision
    #[inline]
    #[must_use]
    pub fn is_collision(&self) -> bool {
        matches!(self, Resolution::Collision(_))
    }
}

/// Resolution of a list of names (e.g. the members of a saved view)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResolution {
    /// Resolved ids, in input order, without duplicates
    pub engineer_ids: Vec<EngineerId>,
    /// Names that did not resolve, as given
    pub unresolved: Vec<String>,
    /// Collisions hit while resolving
    pub collisions: Vec<Collision>,
}

/// Exact-key resolver over one index
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    index: &'a IdentityIndex,
    aliases: Option<&'a AliasTable>,
}

impl<'a> Resolver<'a> {
    /// Create resolver without alias fallback
    #[inline]
    #[must_use]
    pub fn new(index: &'a IdentityIndex) -> Self {
        Self {
            index,
            aliases: None,
        }
    }

    /// With alias fallback
    #[inline]
    #[must_use]
    pub fn with_aliases(mut self, aliases: &'a AliasTable) -> Self {
        self.aliases = Some(aliases);
        self
    }

    /// Resolve a raw name
    #[must_use]
    pub fn resolve(&self, raw_name: &str) -> Resolution {
        self.resolve_key(normalize(raw_name))
    }

    /// Resolve an already normalized key
    #[must_use]
    pub fn resolve_key(&self, key: CanonicalKey) -> Resolution {
        if key.is_empty() {
            return Resolution::Unmatched(key);
        }

        if let Some(collision) = self.index.collision(&key) {
            return Resolution::Collision(collision);
        }

        if let Some(engineer) = self.index.lookup_by_key(&key) {
            return Resolution::Matched {
                engineer: engineer.clone(),
                via: MatchSource::ExactKey,
            };
        }

        let aliased = self
            .aliases
            .and_then(|aliases| aliases.lookup(&key))
            .and_then(|slug| self.index.lookup_by_slug(slug));

        match aliased {
            Some(engineer) => Resolution::Matched {
                engineer: engineer.clone(),
                via: MatchSource::Alias,
            },
            None => Resolution::Unmatched(key),
        }
    }

    /// Resolve many names at once
    ///
    /// Collided names still contribute their first-seen engineer; each
    /// collision is listed once.
    #[must_use]
    pub fn resolve_many<I, S>(&self, names: I) -> BatchResolution
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids = IndexSet::new();
        let mut batch = BatchResolution::default();

        for name in names {
            let name = name.as_ref();
            let resolution = self.resolve(name);

            if let Resolution::Collision(collision) = &resolution {
                if !batch.collisions.iter().any(|c| c.key == collision.key) {
                    batch.collisions.push(collision.clone());
                }
            }

            match resolution.engineer() {
                Some(engineer) => {
                    ids.insert(engineer.id);
                }
                None => batch.unresolved.push(name.to_string()),
            }
        }

        batch.engineer_ids = ids.into_iter().collect();
        batch
    }

    /// Underlying index
    #[inline]
    #[must_use]
    pub fn index(&self) -> &'a IdentityIndex {
        self.index
    }
}
