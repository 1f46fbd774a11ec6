use std::cmp::Ordering;

use waypoint_core::traits::Scorer;
use waypoint_core::types::ScoredItem;

pub const DEFAULT_LIMIT: usize = 5;

/// Order `items` by descending score and keep the best `limit`.
///
/// Items scoring zero (or a non-finite value) are dropped. The sort is
/// stable, so equal scores keep catalog insertion order. `items` and
/// `scores` are paired by position; surplus entries on either side are
/// ignored.
pub fn rank<T: Clone>(items: &[T], scores: &[f64], limit: usize) -> Vec<ScoredItem<T>> {
    let mut scored: Vec<(usize, f64)> = scores
        .iter()
        .take(items.len())
        .copied()
        .enumerate()
        .filter(|(_, s)| s.is_finite() && *s > 0.0)
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(limit);
    scored
        .into_iter()
        .map(|(i, score)| ScoredItem { item: items[i].clone(), score })
        .collect()
}

/// Score every item with `scorer`, then [`rank`].
pub fn rank_with<Q, T, S>(scorer: &S, query: &Q, items: &[T], limit: usize) -> Vec<ScoredItem<T>>
where
    Q: ?Sized,
    T: Clone,
    S: Scorer<Q, T> + ?Sized,
{
    let scores: Vec<f64> = items.iter().map(|item| scorer.score(query, item)).collect();
    rank(items, &scores, limit)
}
