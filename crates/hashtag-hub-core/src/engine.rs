//! The engine's public surface: cached extraction, aggregation, and filtering.
//!
//! An [`Engine`] is constructed explicitly with its [`ResultCache`] so
//! tests and callers can isolate or share caches as they see fit.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use hashtag_hub_core::cache::ResultCache;
//! use hashtag_hub_core::engine::Engine;
//! use hashtag_hub_core::models::SourceKind;
//!
//! let engine = Engine::new(Arc::new(ResultCache::new()));
//! let tags = engine.extract_hashtags("Discuss #Urgent #budget approval", Some(SourceKind::Email));
//! assert_eq!(tags, vec!["#urgent", "#budget"]);
//! assert_eq!(engine.cache_stats().size, 1);
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::cache::{self, CacheStats, CachedValue, ResultCache};
use crate::classify::ItemClassifier;
use crate::extract;
use crate::filter::{self, FilterCriteria, ScoredItem};
use crate::models::{DataItem, HashtagStat, SourceKind};
use crate::record::RawRecord;
use crate::stats;

#[derive(Debug)]
pub struct Engine {
    cache: Arc<ResultCache>,
    classifier: ItemClassifier,
}

impl Engine {
    /// An engine with the default keyword sentiment classifier.
    pub fn new(cache: Arc<ResultCache>) -> Self {
        Self::with_classifier(cache, ItemClassifier::default())
    }

    pub fn with_classifier(cache: Arc<ResultCache>, classifier: ItemClassifier) -> Self {
        Self { cache, classifier }
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn extract_hashtags(&self, text: &str, source: Option<SourceKind>) -> Vec<String> {
        let key = cache::hashtags_key(text, source);
        if let Some(CachedValue::Hashtags(tags)) = self.lookup(&key) {
            return tags;
        }
        let tags = extract::extract_hashtags(text, source);
        self.cache.set(key, CachedValue::Hashtags(tags.clone()));
        tags
    }

    /// Hashtag statistics, optionally restricted to one source's items.
    pub fn calculate_hashtag_stats(
        &self,
        items: &[DataItem],
        source_filter: Option<SourceKind>,
    ) -> Vec<HashtagStat> {
        let key = cache::stats_key(items, source_filter);
        if let Some(CachedValue::Stats(stats)) = self.lookup(&key) {
            return stats;
        }
        let result = match source_filter {
            Some(source) => {
                let subset: Vec<DataItem> = items
                    .iter()
                    .filter(|i| i.source == source)
                    .cloned()
                    .collect();
                stats::aggregate(&subset)
            }
            None => stats::aggregate(items),
        };
        self.cache.set(key, CachedValue::Stats(result.clone()));
        result
    }

    pub fn filter_data(&self, items: &[DataItem], criteria: &FilterCriteria) -> Vec<DataItem> {
        let key = cache::filter_key(items, criteria);
        if let Some(CachedValue::Items(found)) = self.lookup(&key) {
            return found;
        }
        let found = filter::filter_items(items, criteria);
        self.cache.set(key, CachedValue::Items(found.clone()));
        found
    }

    /// Like [`filter_data`](Engine::filter_data), but ordered by relevance
    /// with the score attached.
    pub fn rank_data(&self, items: &[DataItem], criteria: &FilterCriteria) -> Vec<ScoredItem> {
        let key = cache::rank_key(items, criteria);
        if let Some(CachedValue::Ranked(found)) = self.lookup(&key) {
            return found;
        }
        let found = filter::rank(items, criteria);
        self.cache.set(key, CachedValue::Ranked(found.clone()));
        found
    }

    /// Normalize, extract, and classify one connector record.
    pub fn ingest(&self, raw: &RawRecord) -> DataItem {
        let draft = raw.normalize();
        let hashtags = self.extract_hashtags(&draft.tag_text, Some(draft.source));
        let labels = self.classifier.classify(&draft, &hashtags);
        DataItem {
            id: draft.id,
            title: draft.title,
            content: draft.content,
            source: draft.source,
            channel: draft.channel,
            author: draft.author,
            timestamp: draft.timestamp,
            hashtags,
            category: labels.category,
            priority: labels.priority,
            sentiment: Some(labels.sentiment),
        }
    }

    pub fn ingest_all(&self, records: &[RawRecord]) -> Vec<DataItem> {
        records.iter().map(|r| self.ingest(r)).collect()
    }

    pub fn clear_cache(&self, pattern: Option<&str>) -> usize {
        let removed = self.cache.clear(pattern);
        debug!(pattern = pattern.unwrap_or("*"), removed, "cache cleared");
        removed
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn lookup(&self, key: &str) -> Option<CachedValue> {
        let prefix = key.split('_').next().unwrap_or(key);
        match self.cache.get(key) {
            Some(value) => {
                debug!(kind = prefix, "cache hit");
                Some(value)
            }
            None => {
                debug!(kind = prefix, "cache miss");
                None
            }
        }
    }
}
