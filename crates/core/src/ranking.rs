//! Relevance ranking for catalog search
//!
//! Each record's score is the weight of the single highest-priority field
//! the term matched, not a sum over fields: a title match always outranks
//! any combination of weaker matches. Ties order by recency (release year,
//! then record creation time), then id, so result pages are deterministic.

use serde::Serialize;

use crate::models::Content;
use crate::predicate::base_search_matches;

/// Search terms shorter than this are rejected before any query runs
pub const MIN_SEARCH_TERM_LENGTH: usize = 2;

/// Field weights, highest priority first
pub const WEIGHT_TITLE: u32 = 8;
pub const WEIGHT_SUBTITLE: u32 = 7;
pub const WEIGHT_CAST: u32 = 6;
pub const WEIGHT_CHARACTER: u32 = 5;
pub const WEIGHT_DIRECTOR: u32 = 4;
pub const WEIGHT_DESCRIPTION: u32 = 3;
pub const WEIGHT_TYPE: u32 = 2;
pub const WEIGHT_GENRE: u32 = 1;

/// One ranked search result with term highlighting applied
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub content: Content,
    pub score: u32,
    /// Title with every term occurrence wrapped in `<em>` tags
    pub highlighted_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted_description: Option<String>,
}

/// Score a record against a search term
///
/// Returns the weight of the highest-priority matching field, or 0 when
/// nothing matches.
pub fn score(content: &Content, term: &str) -> u32 {
    let term = term.to_lowercase();
    let contains = |s: &str| s.to_lowercase().contains(&term);
    let any_contains = |items: &[String]| items.iter().any(|s| contains(s));

    if contains(&content.title) {
        WEIGHT_TITLE
    } else if content.subtitle.as_deref().is_some_and(contains) {
        WEIGHT_SUBTITLE
    } else if any_contains(&content.cast_members) {
        WEIGHT_CAST
    } else if any_contains(&content.characters) {
        WEIGHT_CHARACTER
    } else if any_contains(&content.directors) {
        WEIGHT_DIRECTOR
    } else if content.description.as_deref().is_some_and(contains) {
        WEIGHT_DESCRIPTION
    } else if contains(content.content_type.as_str()) {
        WEIGHT_TYPE
    } else if any_contains(&content.genres) {
        WEIGHT_GENRE
    } else {
        0
    }
}

/// Rank candidates: drop non-matches, order by score descending, then
/// recency, then id, and attach highlights
pub fn rank(candidates: Vec<Content>, term: &str) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = candidates
        .into_iter()
        .filter(|c| base_search_matches(c, term))
        .map(|content| {
            let score = score(&content, term);
            let highlighted_title = highlight(&content.title, term);
            let highlighted_description = content
                .description
                .as_deref()
                .filter(|d| d.to_lowercase().contains(&term.to_lowercase()))
                .map(|d| highlight(d, term));
            SearchHit {
                content,
                score,
                highlighted_title,
                highlighted_description,
            }
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(b.content.release_year.cmp(&a.content.release_year))
            .then(b.content.created_at.cmp(&a.content.created_at))
            .then(a.content.id.cmp(&b.content.id))
    });

    hits
}

/// Wrap every case-insensitive occurrence of `term` in `<em>` tags,
/// preserving the original casing of the matched text
pub fn highlight(text: &str, term: &str) -> String {
    let lower_term = term.to_lowercase();
    if lower_term.is_empty() {
        return text.to_string();
    }

    // Lowercasing can change byte lengths and char counts (İ, ẞ), so
    // matching happens on the lowered text while every lowered byte keeps
    // the byte range of the original char it came from.
    let mut lower_text = String::with_capacity(text.len());
    let mut origin: Vec<(usize, usize)> = Vec::with_capacity(text.len());
    for (offset, ch) in text.char_indices() {
        let span = (offset, offset + ch.len_utf8());
        for low in ch.to_lowercase() {
            let before = lower_text.len();
            lower_text.push(low);
            for _ in before..lower_text.len() {
                origin.push(span);
            }
        }
    }

    let mut out = String::with_capacity(text.len() + 16);
    let mut copied = 0;
    let mut pos = 0;
    while let Some(found) = lower_text[pos..].find(&lower_term) {
        let lo = pos + found;
        let hi = lo + lower_term.len();
        let start = origin[lo].0;
        let end = origin[hi - 1].1;
        pos = hi;
        // a char that lowered to several chars can host two matches; the
        // original char was already emitted with the first
        if start < copied {
            continue;
        }
        out.push_str(&text[copied..start]);
        out.push_str("<em>");
        out.push_str(&text[start..end]);
        out.push_str("</em>");
        copied = end;
    }
    out.push_str(&text[copied..]);
    out
}
