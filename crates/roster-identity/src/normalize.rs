//! Name normalization
//!
//! Provides [`normalize`], the pure function that reduces a free-text display
//! name to the [`CanonicalKey`] used for identity comparison.
//!
//! # Pipeline
//!
//! The steps run in a fixed order. Reordering them changes the result for names
//! that carry combining marks inside whitespace runs.
//!
//! 1. Strip zero-width characters
//! 2. Replace non-breaking spaces with ordinary spaces
//! 3. Trim
//! 4. NFD decomposition, then drop every combining mark
//! 5. Apply [`SUBSTITUTIONS`]
//! 6. Lowercase (Unicode default case mapping, locale independent)
//! 7. Collapse whitespace runs to a single space
//!
//! Case mapping is not guaranteed to keep text decomposed, so the lowercased
//! text is decomposed and stripped of marks once more before collapsing.

use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Zero-width space, non-joiner, joiner and BOM used as a character.
const ZERO_WIDTH: [char; 4] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// No-break space, figure space and narrow no-break space.
const NON_BREAKING_SPACES: [char; 3] = ['\u{00A0}', '\u{2007}', '\u{202F}'];

/// Explicit substitutions for characters that decomposition does not reduce.
///
/// | from | to   | note                                                        |
/// |------|------|-------------------------------------------------------------|
/// | `ß`  | `ss` | no canonical decomposition                                  |
/// | `ẞ`  | `ss` | capital sharp s; lowercases to `ß`, so it must expand here |
/// | `ñ`  | `n`  | already reduced by NFD, kept as an explicit rule            |
/// | `Ñ`  | `N`  | uppercase counterpart of the rule above                     |
///
/// `ø`, `đ` and `ł` have no entry and pass through unchanged. New entries need
/// product sign-off and a row in the table above.
pub const SUBSTITUTIONS: &[(char, &str)] = &[('ß', "ss"), ('ẞ', "ss"), ('ñ', "n"), ('Ñ', "N")];

/// Normalized name used purely for identity comparison
///
/// A key is only ever produced by [`normalize`]; it is never shown to users.
/// Two names a human would read as the same person produce the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Key as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the key of an empty or whitespace-only name
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether this key contains another as a substring
    ///
    /// Only meaningful for interactive search; never an identity test.
    #[inline]
    #[must_use]
    pub fn contains(&self, other: &CanonicalKey) -> bool {
        self.0.contains(other.as_str())
    }

    /// Consume into the inner string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CanonicalKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reduce a raw display name to its canonical key
///
/// Total and pure: every input, including the empty string, yields a key, and
/// `normalize(normalize(x).as_str()) == normalize(x)`.
///
/// # Example
/// ```
/// use roster_identity::normalize;
///
/// assert_eq!(normalize("Novák\u{00A0} Jan").as_str(), "novak jan");
/// assert_eq!(normalize("Großmann").as_str(), "grossmann");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> CanonicalKey {
    let visible: String = raw
        .chars()
        .filter(|c| !ZERO_WIDTH.contains(c))
        .map(|c| if NON_BREAKING_SPACES.contains(&c) { ' ' } else { c })
        .collect();

    let unmarked: String = visible
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let lowered: String = substitute(&unmarked)
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    // split_whitespace also drops edge whitespace uncovered by mark stripping
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");

    CanonicalKey(collapsed)
}

fn substitute(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match SUBSTITUTIONS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}
