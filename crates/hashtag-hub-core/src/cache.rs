//! Memoization layer for extraction, aggregation, and filtering results.
//!
//! Keys are namespaced by operation (`hashtags_`, `stats_`, `filter_`,
//! `rank_`) and end in a SHA-256 fingerprint of the input content, so two
//! inputs only share a key when they produce the same result.
//!
//! The cache is unbounded unless built with [`ResultCache::bounded`],
//! in which case the oldest inserted entry is evicted first. Entries have
//! no expiry; [`ResultCache::clear`] is the only invalidation.
//!
//! Uses `std::sync::RwLock`; a poisoned lock is recovered rather than
//! propagated since every stored value is a complete, immutable result.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::filter::{FilterCriteria, ScoredItem};
use crate::models::{DataItem, HashtagStat, SourceKind};

/// A memoized engine result.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Hashtags(Vec<String>),
    Stats(Vec<HashtagStat>),
    Items(Vec<DataItem>),
    Ranked(Vec<ScoredItem>),
}

/// Snapshot for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    /// Keys in insertion order.
    pub keys: Vec<String>,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Default)]
struct Entries {
    map: HashMap<String, CachedValue>,
    order: VecDeque<String>,
}

#[derive(Default)]
pub struct ResultCache {
    entries: RwLock<Entries>,
    max_entries: Option<usize>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    /// An unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding at most `max_entries` results (minimum 1).
    pub fn bounded(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries.max(1)),
            ..Self::default()
        }
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<CachedValue> {
        let value = self.read().map.get(key).cloned();
        let counter = if value.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        value
    }

    /// Insert or replace. Replacing keeps the key's original position.
    pub fn set(&self, key: impl Into<String>, value: CachedValue) {
        let key = key.into();
        let mut entries = self.write();
        if entries.map.contains_key(&key) {
            entries.map.insert(key, value);
            return;
        }
        if let Some(max) = self.max_entries {
            while entries.map.len() >= max {
                match entries.order.pop_front() {
                    Some(oldest) => {
                        entries.map.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
        entries.order.push_back(key.clone());
        entries.map.insert(key, value);
    }

    /// Remove every key containing `pattern`, or everything when `None`.
    ///
    /// Returns the number of removed entries.
    pub fn clear(&self, pattern: Option<&str>) -> usize {
        let mut entries = self.write();
        let before = entries.map.len();
        match pattern {
            Some(p) => {
                entries.map.retain(|k, _| !k.contains(p));
                entries.order.retain(|k| !k.contains(p));
            }
            None => {
                entries.map.clear();
                entries.order.clear();
            }
        }
        before - entries.map.len()
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.read();
        CacheStats {
            size: entries.map.len(),
            keys: entries.order.iter().cloned().collect(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn len(&self) -> usize {
        self.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("size", &self.len())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

// ─── Key derivation ─────────────────────────────────────────────────

const FIELD_SEP: &[u8] = &[0x1f];
const ITEM_SEP: &[u8] = &[0x1e];

pub fn hashtags_key(text: &str, source: Option<SourceKind>) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!("hashtags_{}_{:x}", source_label(source, "any"), digest)
}

pub fn stats_key(items: &[DataItem], source_filter: Option<SourceKind>) -> String {
    format!(
        "stats_{}_{}",
        source_label(source_filter, "all"),
        items_fingerprint(items)
    )
}

pub fn filter_key(items: &[DataItem], criteria: &FilterCriteria) -> String {
    format!(
        "filter_{}_{}",
        criteria_json(criteria),
        items_fingerprint(items)
    )
}

pub fn rank_key(items: &[DataItem], criteria: &FilterCriteria) -> String {
    format!("rank_{}_{}", criteria_json(criteria), items_fingerprint(items))
}

fn source_label(source: Option<SourceKind>, none: &'static str) -> &'static str {
    source.map(|s| s.as_str()).unwrap_or(none)
}

fn criteria_json(criteria: &FilterCriteria) -> String {
    let canonical = criteria.canonical();
    serde_json::to_string(&canonical).unwrap_or_else(|_| format!("{:?}", canonical))
}

/// SHA-256 over every field of every item, in order.
pub fn items_fingerprint(items: &[DataItem]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((items.len() as u64).to_le_bytes());
    for item in items {
        let fields: [&str; 9] = [
            &item.id,
            &item.title,
            &item.content,
            item.source.as_str(),
            item.channel.as_deref().unwrap_or(""),
            &item.author,
            &item.category,
            item.priority.as_str(),
            item.sentiment.map(|s| s.as_str()).unwrap_or(""),
        ];
        for field in fields {
            hasher.update(field.as_bytes());
            hasher.update(FIELD_SEP);
        }
        hasher.update(item.timestamp.timestamp_micros().to_le_bytes());
        for tag in &item.hashtags {
            hasher.update(tag.as_bytes());
            hasher.update(FIELD_SEP);
        }
        hasher.update(ITEM_SEP);
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::Utc;

    fn tags(v: &[&str]) -> CachedValue {
        CachedValue::Hashtags(v.iter().map(|s| s.to_string()).collect())
    }

    fn item(id: &str, content: &str) -> DataItem {
        DataItem {
            id: id.into(),
            title: "t".into(),
            content: content.into(),
            source: SourceKind::Chat,
            channel: None,
            author: String::new(),
            timestamp: Utc::now(),
            hashtags: vec![],
            category: "Team".into(),
            priority: Priority::Low,
            sentiment: None,
        }
    }

    #[test]
    fn test_get_set() {
        let cache = ResultCache::new();
        assert_eq!(cache.get("k"), None);
        cache.set("k", tags(&["#a"]));
        assert_eq!(cache.get("k"), Some(tags(&["#a"])));
        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_clear_by_pattern() {
        let cache = ResultCache::new();
        cache.set("hashtags_email_1", tags(&[]));
        cache.set("stats_all_1", CachedValue::Stats(vec![]));
        cache.set("stats_chat_1", CachedValue::Stats(vec![]));
        assert_eq!(cache.clear(Some("stats_")), 2);
        assert_eq!(cache.stats().keys, vec!["hashtags_email_1"]);
        assert_eq!(cache.clear(Some("nomatch")), 0);
        assert_eq!(cache.clear(None), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_keys_in_insertion_order() {
        let cache = ResultCache::new();
        cache.set("b", tags(&[]));
        cache.set("a", tags(&[]));
        cache.set("b", tags(&["#x"]));
        assert_eq!(cache.stats().keys, vec!["b", "a"]);
        assert_eq!(cache.get("b"), Some(tags(&["#x"])));
    }

    #[test]
    fn test_bounded_evicts_oldest() {
        let cache = ResultCache::bounded(2);
        cache.set("one", tags(&[]));
        cache.set("two", tags(&[]));
        cache.set("three", tags(&[]));
        assert_eq!(cache.stats().keys, vec!["two", "three"]);
        assert_eq!(cache.get("one"), None);
    }

    #[test]
    fn test_same_length_text_gets_distinct_keys() {
        let a = hashtags_key("#alpha", Some(SourceKind::Email));
        let b = hashtags_key("#omega", Some(SourceKind::Email));
        assert_ne!(a, b);
        assert!(a.starts_with("hashtags_email_"));
        assert!(hashtags_key("#alpha", None).starts_with("hashtags_any_"));
    }

    #[test]
    fn test_items_fingerprint_tracks_content() {
        let a = vec![item("1", "abc")];
        let b = vec![item("1", "abd")];
        assert_ne!(items_fingerprint(&a), items_fingerprint(&b));
        assert_eq!(items_fingerprint(&a), items_fingerprint(&a.clone()));
        assert_ne!(stats_key(&a, None), stats_key(&a, Some(SourceKind::Chat)));
    }

    #[test]
    fn test_filter_key_is_canonical() {
        let items = vec![item("1", "x")];
        let a = FilterCriteria {
            categories: vec!["B".into(), "A".into()],
            ..Default::default()
        };
        let b = FilterCriteria {
            categories: vec!["A".into(), "B".into()],
            ..Default::default()
        };
        assert_eq!(filter_key(&items, &a), filter_key(&items, &b));
        assert_ne!(filter_key(&items, &a), rank_key(&items, &a));
    }
}
