//! Interactive name search
//!
//! Non-authoritative "contains" lookup for pickers and filter boxes. Results are
//! suggestions for a human to choose from; they must never be used to link
//! records, since substring matches routinely hit several distinct people.

use crate::engineer::EngineerRecord;
use crate::index::IdentityIndex;
use crate::normalize::normalize;

/// One search suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Suggested engineer
    pub engineer: EngineerRecord,
    /// Whole-key match rather than a substring hit
    pub exact: bool,
}

/// Find engineers whose normalized name contains the normalized query
///
/// Exact key matches come first, then the rest ordered by normalized name.
/// A blank query yields nothing.
#[must_use]
pub fn search(index: &IdentityIndex, query: &str) -> Vec<SearchHit> {
    let needle = normalize(query);
    if needle.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<(String, SearchHit)> = index
        .iter()
        .filter_map(|engineer| {
            let key = normalize(&engineer.display_name);
            key.contains(&needle).then(|| {
                let exact = key == needle;
                (
                    key.into_string(),
                    SearchHit {
                        engineer: engineer.clone(),
                        exact,
                    },
                )
            })
        })
        .collect();

    hits.sort_by(|(a_key, a), (b_key, b)| b.exact.cmp(&a.exact).then_with(|| a_key.cmp(b_key)));
    hits.into_iter().map(|(_, hit)| hit).collect()
}
