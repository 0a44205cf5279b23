//! Fuzzy show search over title and description.
//!
//! Candidates are scored with a skim/fzf-style matcher, title hits are weighted
//! above description hits, and anything under a per-character floor is dropped
//! so that stray subsequence hits in long descriptions do not flood the list.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use super::types::ShowPreview;

/// Minimum score per query character for a show to count as a match.
const MIN_SCORE_PER_CHAR: i64 = 8;
const TITLE_WEIGHT: i64 = 2;
const DESCRIPTION_DIVISOR: i64 = 2;

/// Lowercased haystacks for one catalogue snapshot. Rebuild when the item list changes.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<IndexedShow>,
}

#[derive(Debug, Clone)]
struct IndexedShow {
    title: String,
    title_lower: String,
    description: String,
    description_lower: String,
}

impl SearchIndex {
    pub fn new(items: &[ShowPreview]) -> Self {
        let entries = items
            .iter()
            .map(|s| IndexedShow {
                title: s.title.clone(),
                title_lower: s.title.to_lowercase(),
                description: s.description.clone(),
                description_lower: s.description.to_lowercase(),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Positions into the indexed list, most relevant first. `None` for an
    /// empty query, meaning "everything, unchanged".
    pub fn ranked_positions(&self, query: &str) -> Option<Vec<usize>> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let query_lower = query.to_lowercase();
        let floor = MIN_SCORE_PER_CHAR * query.chars().count() as i64;
        let matcher = SkimMatcherV2::default().ignore_case();

        let mut ranked: Vec<(i64, usize)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(pos, e)| {
                let title = matcher
                    .fuzzy_match(&e.title, query)
                    .map(|s| title_score(s, &e.title_lower, &query_lower));
                let description = matcher
                    .fuzzy_match(&e.description, query)
                    .map(|s| description_score(s, &e.description_lower, &query_lower));
                let best = title.into_iter().chain(description).max()?;
                (best >= floor).then_some((best, pos))
            })
            .collect();

        ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        Some(ranked.into_iter().map(|(_, pos)| pos).collect())
    }

    /// `items` must be the list this index was built from.
    pub fn search(&self, items: &[ShowPreview], query: &str) -> Vec<ShowPreview> {
        debug_assert_eq!(items.len(), self.entries.len());
        match self.ranked_positions(query) {
            None => items.to_vec(),
            Some(positions) => positions
                .into_iter()
                .filter_map(|p| items.get(p).cloned())
                .collect(),
        }
    }
}

/// One-shot search without keeping an index around.
pub fn search(items: &[ShowPreview], query: &str) -> Vec<ShowPreview> {
    if query.trim().is_empty() {
        return items.to_vec();
    }
    SearchIndex::new(items).search(items, query)
}

fn title_score(base: i64, title_lower: &str, query_lower: &str) -> i64 {
    let mut score = base.saturating_mul(TITLE_WEIGHT);
    if title_lower == query_lower {
        return score.saturating_add(10_000);
    }
    if title_lower.starts_with(query_lower) {
        score = score.saturating_add(2_500);
    }
    if let Some(position) = title_lower.find(query_lower) {
        score = score.saturating_add(1_000);
        score = score.saturating_add(200_i64.saturating_sub(position as i64).max(0));
    }
    if title_lower
        .split_whitespace()
        .any(|word| word.starts_with(query_lower))
    {
        score = score.saturating_add(500);
    }
    score
}

fn description_score(base: i64, description_lower: &str, query_lower: &str) -> i64 {
    let mut score = base / DESCRIPTION_DIVISOR;
    if description_lower.contains(query_lower) {
        score = score.saturating_add(250);
    }
    score
}
