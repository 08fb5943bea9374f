//! Multi-criteria item filtering with relevance scoring.
//!
//! Every supplied criterion is an independent predicate and an item must
//! satisfy all of them. Empty lists and absent options place no
//! restriction. Filtering is stable: matches keep their input order.
//!
//! # Relevance
//!
//! A free-text query is matched case-insensitively as a substring:
//!
//! | Field | Points |
//! |-------|--------|
//! | title | 3 |
//! | content | 2 |
//! | any hashtag | 4 |
//!
//! An item passes the query iff its score is above zero. [`rank`] keeps the
//! score and orders by it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{DataItem, Priority, Sentiment, SourceKind};

pub const TITLE_POINTS: u32 = 3;
pub const CONTENT_POINTS: u32 = 2;
pub const HASHTAG_POINTS: u32 = 4;

/// Inclusive timestamp range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.start && *ts <= self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub query: Option<String>,
    pub categories: Vec<String>,
    pub sources: Vec<SourceKind>,
    pub priorities: Vec<Priority>,
    pub date_range: Option<DateRange>,
    /// Any-of: an item needs at least one of these tags.
    pub hashtags: Vec<String>,
    pub sentiment: Option<Sentiment>,
}

impl FilterCriteria {
    /// Same criteria with list fields sorted and deduplicated.
    ///
    /// Two criteria that select the same items regardless of list order
    /// produce the same canonical form; the cache keys on it.
    pub fn canonical(&self) -> FilterCriteria {
        let mut c = self.clone();
        c.categories.sort();
        c.categories.dedup();
        c.sources.sort();
        c.sources.dedup();
        c.priorities.sort_by_key(|p| p.as_str());
        c.priorities.dedup();
        c.hashtags.sort();
        c.hashtags.dedup();
        if c.query.as_deref() == Some("") {
            c.query = None;
        }
        c
    }

    fn active_query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }
}

/// An item paired with its query relevance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub score: u32,
    pub item: DataItem,
}

/// Weighted substring relevance of `item` for `query`.
pub fn relevance_score(item: &DataItem, query: &str) -> u32 {
    let q = query.to_lowercase();
    let mut score = 0;
    if item.title.to_lowercase().contains(&q) {
        score += TITLE_POINTS;
    }
    if item.content.to_lowercase().contains(&q) {
        score += CONTENT_POINTS;
    }
    if item.hashtags.iter().any(|t| t.to_lowercase().contains(&q)) {
        score += HASHTAG_POINTS;
    }
    score
}

/// Check the cheap set-membership predicates, then the query score.
///
/// Returns the score (0 when there is no query) if the item passes.
fn evaluate(item: &DataItem, criteria: &FilterCriteria) -> Option<u32> {
    let allowed = |empty: bool, hit: bool| empty || hit;

    let passes = allowed(
        criteria.categories.is_empty(),
        criteria.categories.contains(&item.category),
    ) && allowed(criteria.sources.is_empty(), criteria.sources.contains(&item.source))
        && allowed(
            criteria.priorities.is_empty(),
            criteria.priorities.contains(&item.priority),
        )
        && criteria
            .date_range
            .map_or(true, |range| range.contains(&item.timestamp))
        && allowed(
            criteria.hashtags.is_empty(),
            item.hashtags.iter().any(|t| criteria.hashtags.contains(t)),
        )
        && criteria
            .sentiment
            .map_or(true, |s| item.sentiment == Some(s));

    if !passes {
        return None;
    }

    match criteria.active_query() {
        Some(q) => Some(relevance_score(item, q)).filter(|score| *score > 0),
        None => Some(0),
    }
}

pub fn matches(item: &DataItem, criteria: &FilterCriteria) -> bool {
    evaluate(item, criteria).is_some()
}

/// Items satisfying every criterion, in their original order.
pub fn filter_items(items: &[DataItem], criteria: &FilterCriteria) -> Vec<DataItem> {
    items
        .iter()
        .filter(|item| matches(item, criteria))
        .cloned()
        .collect()
}

/// Matching items with their scores, best first; ties keep input order.
pub fn rank(items: &[DataItem], criteria: &FilterCriteria) -> Vec<ScoredItem> {
    let mut scored: Vec<ScoredItem> = items
        .iter()
        .filter_map(|item| {
            evaluate(item, criteria).map(|score| ScoredItem {
                score,
                item: item.clone(),
            })
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}
