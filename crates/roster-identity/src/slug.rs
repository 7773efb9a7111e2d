//! Engineer slugs
//!
//! A [`Slug`] is the URL-safe, human-readable secondary identifier of an
//! engineer. It is derived from the canonical key once, at creation, and never
//! follows later display-name changes.

use crate::normalize::CanonicalKey;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Base used when a name has no ASCII alphanumerics at all
const FALLBACK_BASE: &str = "engineer";

/// First numeric suffix tried on collision (`jan-novak-2`)
const FIRST_SUFFIX: u32 = 2;

/// ASCII spellings for letters the canonical key keeps as is
///
/// Only affects slugs; identity comparison never sees these.
const TRANSLITERATIONS: &[(char, &str)] = &[
    ('ø', "o"),
    ('ł', "l"),
    ('đ', "d"),
    ('ð', "d"),
    ('æ', "ae"),
    ('œ', "oe"),
    ('þ', "th"),
    ('ı', "i"),
];

/// URL-safe engineer identifier
///
/// Deserialization validates the same way as [`str::parse`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

/// Errors for slug parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    /// Empty slug
    #[error("slug cannot be empty")]
    Empty,

    /// Character outside `[a-z0-9-]`
    #[error("invalid character {ch:?} in slug: {slug}")]
    InvalidCharacter { slug: String, ch: char },

    /// Leading, trailing or doubled dash
    #[error("malformed dashes in slug: {0}")]
    MalformedDashes(String),
}

impl Slug {
    /// Derive the base slug for a canonical key
    ///
    /// ASCII letters and digits are kept, a few letters are spelled out in
    /// ASCII (`ø` as `o`, `ł` as `l`), and every other run of characters becomes
    /// a single dash.
    #[must_use]
    pub fn derive(key: &CanonicalKey) -> Self {
        let mut out = String::with_capacity(key.as_str().len());
        let mut pending_dash = false;

        for c in key.as_str().chars() {
            let spelled = TRANSLITERATIONS
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to);
            if spelled.is_none() && !c.is_ascii_alphanumeric() {
                pending_dash = true;
                continue;
            }

            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            match spelled {
                Some(to) => out.push_str(to),
                None => out.push(c.to_ascii_lowercase()),
            }
        }

        if out.is_empty() {
            out.push_str(FALLBACK_BASE);
        }
        Self(out)
    }

    /// Allocate a slug for `key` that `is_taken` rejects nowhere
    ///
    /// Tries the base slug first, then `base-2`, `base-3`, ...
    #[must_use]
    pub fn allocate(key: &CanonicalKey, is_taken: impl Fn(&Slug) -> bool) -> Self {
        let base = Self::derive(key);
        if !is_taken(&base) {
            return base;
        }

        let mut suffix = FIRST_SUFFIX;
        loop {
            let candidate = base.with_suffix(suffix);
            if !is_taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Append a numeric disambiguator
    #[inline]
    #[must_use]
    pub fn with_suffix(&self, suffix: u32) -> Self {
        Self(format!("{}-{}", self.0, suffix))
    }

    /// Slug as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if let Some(ch) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidCharacter {
                slug: s.to_string(),
                ch,
            });
        }
        if s.starts_with('-') || s.ends_with('-') || s.contains("--") {
            return Err(SlugError::MalformedDashes(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
