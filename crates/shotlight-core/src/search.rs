//! Free-text search over the tagged corpus by keyword-to-tag matching.
//!
//! Matching is literal lower-cased substring containment in both directions:
//! catalog candidates are extracted from the query by substring, and records
//! are scored by how many matched candidates their tag string contains. No
//! tokenization, stemming, or fuzzy matching. A short tag that happens to be
//! part of a longer query word will match; that is a known, preserved
//! limitation of the format, not a bug.

use crate::catalog::TagCatalog;
use crate::types::{SearchResult, TaggedShot};

/// Outcome of a search: distinguishes "no query keywords matched any tag"
/// from an actual failure (which is an `Err` upstream).
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// No catalog candidate occurred in the query.
    NoTagsMatched,
    /// Ranked results, best first. May be empty if no record scored > 0.
    Ranked {
        matched_tags: Vec<String>,
        results: Vec<SearchResult>,
    },
}

/// Extract the catalog candidates that occur as substrings of the query.
pub fn match_query_tags(query: &str, candidates: &[String]) -> Vec<String> {
    let query = query.to_lowercase();
    candidates
        .iter()
        .filter(|tag| query.contains(tag.as_str()))
        .cloned()
        .collect()
}

/// Count how many matched tags appear in a record's tag string.
///
/// Each matched tag counts at most once, regardless of how often it occurs.
pub fn score_tags(tag_string: &str, matched_tags: &[String]) -> usize {
    let haystack = tag_string.to_lowercase();
    matched_tags
        .iter()
        .filter(|tag| haystack.contains(tag.as_str()))
        .count()
}

/// Score and rank the tagged corpus against a free-text query.
///
/// Records with score 0 are dropped; the rest are sorted descending by
/// score with ties keeping original row order (stable sort), truncated to
/// `top_k`.
pub fn search(
    query: &str,
    catalog: &TagCatalog,
    corpus: &[TaggedShot],
    top_k: usize,
) -> SearchOutcome {
    let candidates = catalog.flat_labels_lowercase();
    let matched_tags = match_query_tags(query, &candidates);

    if matched_tags.is_empty() {
        tracing::debug!("No catalog tags matched query {:?}", query);
        return SearchOutcome::NoTagsMatched;
    }
    tracing::debug!("Query matched tags: {:?}", matched_tags);

    let mut results: Vec<SearchResult> = corpus
        .iter()
        .filter_map(|row| {
            let score = score_tags(&row.tags, &matched_tags);
            (score > 0).then(|| SearchResult {
                id: row.id.clone(),
                shot_title: row.shot_title.clone(),
                score,
                tags: row.tags.clone(),
            })
        })
        .collect();

    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(top_k);

    SearchOutcome::Ranked {
        matched_tags,
        results,
    }
}
