//! Fuzzy ordering of merged candidate lists.

use crate::types::CompletionItem;

/// Scores one candidate against the lowercased query; `None` drops the
/// candidate. Lower keys sort first. The engine only depends on this trait,
/// so the concrete matcher is swappable.
pub(crate) trait Scorer {
    fn score(&self, candidate: &str, query: &str) -> Option<u32>;
}

/// Default matcher: exact, then prefix, then substring, then in-order
/// character subsequence. Ties keep the merged-list order, which encodes
/// pipeline and category precedence.
pub(crate) struct SubsequenceScorer;

impl Scorer for SubsequenceScorer {
    fn score(&self, candidate: &str, query: &str) -> Option<u32> {
        let candidate = candidate.to_lowercase();
        if candidate == query {
            return Some(0);
        }
        if candidate.starts_with(query) {
            return Some(1);
        }
        if candidate.contains(query) {
            return Some(2);
        }
        if is_subsequence(query, &candidate) {
            return Some(3);
        }
        None
    }
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut haystack = haystack.chars();
    needle.chars().all(|n| haystack.by_ref().any(|h| h == n))
}

/// Applies the filter text to a merged candidate list.
///
/// The text is lowercased first; a leading `$` (parameter sigil) is stripped
/// when something remains after it, so typing `$pa` matches the parameter
/// name `param`. An empty filter returns the list untouched.
pub(crate) fn rank(
    items: Vec<CompletionItem>,
    filter: &str,
    scorer: &dyn Scorer,
) -> Vec<CompletionItem> {
    let text = filter.to_lowercase();
    let stripped = text.strip_prefix('$').unwrap_or(&text);
    let query = if stripped.is_empty() { text.as_str() } else { stripped };
    if query.is_empty() {
        return items;
    }
    let mut scored: Vec<(u32, CompletionItem)> = items
        .into_iter()
        .filter_map(|item| scorer.score(&item.view, query).map(|score| (score, item)))
        .collect();
    scored.sort_by_key(|(score, _)| *score);
    scored.into_iter().map(|(_, item)| item).collect()
}
