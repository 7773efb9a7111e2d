//! Identity index
//!
//! Provides [`IdentityIndex`], the canonical key to engineer mapping built from
//! one registry snapshot.
//!
//! Two distinct engineers whose names normalize to the same key are a
//! data-quality conflict. The index never drops either of them: lookups return
//! the first-seen record and [`IdentityIndex::collisions`] exposes the full list.

use crate::engineer::{EngineerId, EngineerRecord};
use crate::normalize::{normalize, CanonicalKey};
use crate::slug::Slug;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Canonical key to engineer lookup for one registry snapshot
///
/// Records are held in insertion order; every secondary map stores positions
/// into that list, so "first seen" is simply the lowest position.
#[derive(Debug, Clone, Default)]
pub struct IdentityIndex {
    /// Every record, in insertion order
    records: Vec<EngineerRecord>,

    /// Canonical key -> positions, first-seen first
    by_key: IndexMap<CanonicalKey, Vec<usize>>,

    /// Slug -> position
    by_slug: HashMap<Slug, usize>,

    /// Id -> position
    by_id: HashMap<EngineerId, usize>,

    /// Slugs known to be taken in storage but absent from the snapshot
    reserved: HashSet<Slug>,
}

/// Result of [`IdentityIndex::insert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// New key, new record
    Inserted,
    /// The same id was already indexed; nothing changed
    AlreadyPresent,
    /// Key already owned by a different engineer; both are now candidates
    Collided {
        /// Engineer that lookups keep returning
        first_seen: EngineerId,
    },
}

/// Distinct engineers sharing one canonical key
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collision {
    /// Shared key
    pub key: CanonicalKey,
    /// Colliding engineers, first-seen first
    pub engineers: Vec<EngineerRecord>,
}

impl Collision {
    /// Engineer that lookups resolve to
    #[inline]
    #[must_use]
    pub fn first_seen(&self) -> Option<&EngineerRecord> {
        self.engineers.first()
    }

    /// Ids of every colliding engineer
    #[must_use]
    pub fn ids(&self) -> Vec<EngineerId> {
        self.engineers.iter().map(|e| e.id).collect()
    }
}

impl IdentityIndex {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a complete registry snapshot
    #[must_use]
    pub fn build(records: impl IntoIterator<Item = EngineerRecord>) -> Self {
        let mut index = Self::new();
        for record in records {
            index.insert(record);
        }
        index
    }

    /// Insert one record
    ///
    /// Used while building and when migration creates an engineer, so later
    /// spellings of the same name in the same pass find it.
    pub fn insert(&mut self, record: EngineerRecord) -> InsertOutcome {
        if self.by_id.contains_key(&record.id) {
            return InsertOutcome::AlreadyPresent;
        }

        let key = normalize(&record.display_name);
        let position = self.records.len();

        self.by_id.insert(record.id, position);
        self.by_slug.entry(record.slug.clone()).or_insert(position);
        self.reserved.remove(&record.slug);
        self.records.push(record);

        let positions = self.by_key.entry(key).or_default();
        positions.push(position);

        match positions.first() {
            Some(&first) if first != position => InsertOutcome::Collided {
                first_seen: self.records[first].id,
            },
            _ => InsertOutcome::Inserted,
        }
    }

    /// First-seen engineer for a key
    #[must_use]
    pub fn lookup_by_key(&self, key: &CanonicalKey) -> Option<&EngineerRecord> {
        self.by_key
            .get(key)
            .and_then(|positions| positions.first())
            .map(|&p| &self.records[p])
    }

    /// Every engineer for a key, first-seen first
    #[must_use]
    pub fn candidates(&self, key: &CanonicalKey) -> Vec<&EngineerRecord> {
        self.by_key
            .get(key)
            .map(|positions| positions.iter().map(|&p| &self.records[p]).collect())
            .unwrap_or_default()
    }

    /// Collision for a key, if more than one engineer owns it
    #[must_use]
    pub fn collision(&self, key: &CanonicalKey) -> Option<Collision> {
        let positions = self.by_key.get(key)?;
        if positions.len() < 2 {
            return None;
        }
        Some(Collision {
            key: key.clone(),
            engineers: positions.iter().map(|&p| self.records[p].clone()).collect(),
        })
    }

    /// All collisions, in order of first occurrence
    #[must_use]
    pub fn collisions(&self) -> Vec<Collision> {
        self.by_key
            .keys()
            .filter_map(|key| self.collision(key))
            .collect()
    }

    /// Engineer by slug
    #[must_use]
    pub fn lookup_by_slug(&self, slug: &Slug) -> Option<&EngineerRecord> {
        self.by_slug.get(slug).map(|&p| &self.records[p])
    }

    /// Engineer by id
    #[must_use]
    pub fn lookup_by_id(&self, id: EngineerId) -> Option<&EngineerRecord> {
        self.by_id.get(&id).map(|&p| &self.records[p])
    }

    /// Check whether a slug is used or reserved
    #[inline]
    #[must_use]
    pub fn is_slug_taken(&self, slug: &Slug) -> bool {
        self.by_slug.contains_key(slug) || self.reserved.contains(slug)
    }

    /// Mark a slug as taken without an indexed owner
    ///
    /// Storage may hold slugs the snapshot cannot see; a conflict on create
    /// reserves the rejected slug so the next allocation skips it.
    pub fn reserve_slug(&mut self, slug: Slug) {
        if !self.by_slug.contains_key(&slug) {
            self.reserved.insert(slug);
        }
    }

    /// First free slug for a key (`base`, `base-2`, ...)
    #[must_use]
    pub fn allocate_slug(&self, key: &CanonicalKey) -> Slug {
        Slug::allocate(key, |slug| self.is_slug_taken(slug))
    }

    /// Iterate records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &EngineerRecord> {
        self.records.iter()
    }

    /// Iterate `(key, first-seen record)` pairs
    pub fn entries(&self) -> impl Iterator<Item = (&CanonicalKey, &EngineerRecord)> {
        self.by_key
            .iter()
            .filter_map(|(key, positions)| positions.first().map(|&p| (key, &self.records[p])))
    }

    /// Number of indexed engineers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if index is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engineer::EngineerStatus;

    fn engineer(name: &str, slug: &str) -> EngineerRecord {
        EngineerRecord::new(
            EngineerId::new(),
            name,
            slug.parse().unwrap(),
            EngineerStatus::Active,
        )
    }

    #[test]
    fn index_build_and_lookup() {
        let jan = engineer("Jan Novák", "jan-novak");
        let eva = engineer("Eva Malá", "eva-mala");
        let index = IdentityIndex::build(vec![jan.clone(), eva.clone()]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup_by_key(&normalize("JAN NOVAK")), Some(&jan));
        assert_eq!(index.lookup_by_key(&normalize("eva  mala")), Some(&eva));
        assert!(index.lookup_by_key(&normalize("Petr Malý")).is_none());
        assert!(index.collisions().is_empty());
    }

    #[test]
    fn index_collision_keeps_first_seen() {
        let first = engineer("Jan Novák", "jan-novak");
        let second = engineer("JAN NOVAK", "jan-novak-2");
        let index = IdentityIndex::build(vec![first.clone(), second.clone()]);

        let key = normalize("Jan Novák");
        assert_eq!(index.lookup_by_key(&key), Some(&first));
        assert_eq!(index.candidates(&key).len(), 2);

        let collisions = index.collisions();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].key, key);
        assert_eq!(collisions[0].ids(), vec![first.id, second.id]);
        assert_eq!(collisions[0].first_seen(), Some(&first));
    }

    #[test]
    fn index_insert_outcomes() {
        let first = engineer("Jan Novák", "jan-novak");
        let second = engineer("jan novak", "jan-novak-2");
        let mut index = IdentityIndex::new();

        assert_eq!(index.insert(first.clone()), InsertOutcome::Inserted);
        assert_eq!(index.insert(first.clone()), InsertOutcome::AlreadyPresent);
        assert_eq!(
            index.insert(second),
            InsertOutcome::Collided { first_seen: first.id }
        );
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn index_same_id_twice_is_not_collision() {
        let jan = engineer("Jan Novák", "jan-novak");
        let index = IdentityIndex::build(vec![jan.clone(), jan]);

        assert_eq!(index.len(), 1);
        assert!(index.collisions().is_empty());
    }

    #[test]
    fn index_slug_and_id_lookup() {
        let jan = engineer("Jan Novák", "jan-novak");
        let index = IdentityIndex::build(vec![jan.clone()]);

        assert_eq!(index.lookup_by_slug(&"jan-novak".parse().unwrap()), Some(&jan));
        assert_eq!(index.lookup_by_id(jan.id), Some(&jan));
        assert!(index.lookup_by_id(EngineerId::new()).is_none());
    }

    #[test]
    fn index_allocate_slug_skips_taken_and_reserved() {
        let mut index = IdentityIndex::build(vec![engineer("Jan Novák", "jan-novak")]);
        let key = normalize("Jan Novák");

        assert_eq!(index.allocate_slug(&key).as_str(), "jan-novak-2");

        index.reserve_slug("jan-novak-2".parse().unwrap());
        assert_eq!(index.allocate_slug(&key).as_str(), "jan-novak-3");
        assert_eq!(index.allocate_slug(&normalize("Eva")).as_str(), "eva");
    }

    #[test]
    fn index_insert_clears_reservation() {
        let mut index = IdentityIndex::new();
        let slug: Slug = "jan-novak".parse().unwrap();
        index.reserve_slug(slug.clone());

        index.insert(engineer("Jan Novák", "jan-novak"));

        assert!(index.is_slug_taken(&slug));
        assert!(index.lookup_by_slug(&slug).is_some());
    }

    #[test]
    fn index_entries_report_first_seen() {
        let first = engineer("Jan Novák", "jan-novak");
        let index = IdentityIndex::build(vec![
            first.clone(),
            engineer("jan novák", "jan-novak-2"),
            engineer("Eva", "eva"),
        ]);

        let entries: Vec<_> = index.entries().map(|(k, e)| (k.as_str(), e.id)).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("jan novak", first.id));
    }
}
