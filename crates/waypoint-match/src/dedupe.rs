//! Cross-source deduplication on a normalized (title, organization) key.

use std::collections::HashSet;

use waypoint_core::traits::CompositeKey;
use waypoint_rank::tokenize::tokens;

/// Lowercase and split with the search tokenizer, then rejoin with single
/// spaces. "Acme, Inc." and "ACME inc" normalize alike while "C++" and "C#"
/// stay distinct.
pub fn normalize_key_fragment(input: &str) -> String { tokens(input).join(" ") }

pub fn composite_key<T: CompositeKey + ?Sized>(item: &T) -> (String, String) {
    let (title, org) = item.key_parts();
    (normalize_key_fragment(title), normalize_key_fragment(org))
}

/// Keep the first item for each composite key, preserving input order.
pub fn dedupe<T: CompositeKey>(items: Vec<T>) -> Vec<T> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(items.len());
    items.into_iter().filter(|item| seen.insert(composite_key(item))).collect()
}
