//! Property tests for extraction, aggregation, filtering, and classification.

use chrono::{TimeZone, Utc};
use hashtag_hub_core::classify::ItemClassifier;
use hashtag_hub_core::extract::{extract_hashtags, priority_tags};
use hashtag_hub_core::filter::{filter_items, DateRange, FilterCriteria};
use hashtag_hub_core::models::{DataItem, Priority, Sentiment, SourceKind};
use hashtag_hub_core::record::Draft;
use hashtag_hub_core::stats::aggregate;
use proptest::prelude::*;
use std::collections::HashSet;

const WORDS: &[&str] = &[
    "#urgent", "#Budget", "#team", "#DAILY", "#docs", "#guide", "#api", "#misc", "#Q4", "#help",
    "plain", "text", "great", "issue", "#", "##", "x#y",
];

fn source_strategy() -> impl Strategy<Value = SourceKind> {
    prop_oneof![
        Just(SourceKind::Email),
        Just(SourceKind::Chat),
        Just(SourceKind::Document),
    ]
}

fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::High), Just(Priority::Medium), Just(Priority::Low)]
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..24).prop_map(|w| w.join(" "))
}

fn item_strategy() -> impl Strategy<Value = DataItem> {
    (
        text_strategy(),
        source_strategy(),
        priority_strategy(),
        prop::sample::select(vec!["Team", "Finance", "General"]),
        0u32..28,
    )
        .prop_map(|(text, source, priority, category, day)| DataItem {
            id: String::new(),
            title: text.split(' ').take(3).collect::<Vec<_>>().join(" "),
            hashtags: extract_hashtags(&text, Some(source)),
            content: text,
            source,
            channel: None,
            author: String::new(),
            timestamp: Utc.with_ymd_and_hms(2024, 2, day + 1, 0, 0, 0).unwrap(),
            category: category.to_string(),
            priority,
            sentiment: Some(Sentiment::Neutral),
        })
}

fn items_strategy() -> impl Strategy<Value = Vec<DataItem>> {
    prop::collection::vec(item_strategy(), 0..20).prop_map(|mut items| {
        for (i, item) in items.iter_mut().enumerate() {
            item.id = format!("item_{}", i);
        }
        items
    })
}

fn is_subsequence(sub: &[DataItem], all: &[DataItem]) -> bool {
    let mut it = all.iter();
    sub.iter().all(|s| it.any(|a| a.id == s.id))
}

proptest! {
    #[test]
    fn extract_has_no_duplicates(text in text_strategy(), source in source_strategy()) {
        let tags = extract_hashtags(&text, Some(source));
        let unique: HashSet<String> = tags.iter().map(|t| t.to_lowercase()).collect();
        prop_assert_eq!(unique.len(), tags.len());
        for tag in &tags {
            prop_assert!(tag.starts_with('#') && tag.len() > 1);
            prop_assert_eq!(tag, &tag.to_lowercase());
        }
    }

    #[test]
    fn extract_partitions_priority_tags(text in text_strategy(), source in source_strategy()) {
        let tags = extract_hashtags(&text, Some(source));
        let priority = priority_tags(source);
        let split = tags.iter().position(|t| !priority.contains(&t.as_str())).unwrap_or(tags.len());
        prop_assert!(tags[split..].iter().all(|t| !priority.contains(&t.as_str())));

        // Within each group, order follows first occurrence in the text.
        let unordered = extract_hashtags(&text, None);
        let front: Vec<&String> = unordered.iter().filter(|t| priority.contains(&t.as_str())).collect();
        let back: Vec<&String> = unordered.iter().filter(|t| !priority.contains(&t.as_str())).collect();
        prop_assert_eq!(tags[..split].iter().collect::<Vec<_>>(), front);
        prop_assert_eq!(tags[split..].iter().collect::<Vec<_>>(), back);
    }

    #[test]
    fn aggregate_counts_sum_to_tag_total(items in items_strategy()) {
        let stats = aggregate(&items);
        let total: usize = stats.iter().map(|s| s.count).sum();
        let expected: usize = items.iter().map(|i| i.hashtags.len()).sum();
        prop_assert_eq!(total, expected);
        for pair in stats.windows(2) {
            prop_assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn filter_preserves_order(items in items_strategy(), query in prop::sample::select(WORDS)) {
        let criteria = FilterCriteria { query: Some(query.to_string()), ..Default::default() };
        let found = filter_items(&items, &criteria);
        prop_assert!(is_subsequence(&found, &items));
    }

    #[test]
    fn extra_restriction_never_grows_result(
        items in items_strategy(),
        source in source_strategy(),
        priority in priority_strategy(),
        start in 0u32..28,
    ) {
        let base = FilterCriteria { sources: vec![source], ..Default::default() };
        let base_found = filter_items(&items, &base);

        let mut narrower = base.clone();
        narrower.priorities = vec![priority];
        narrower.date_range = Some(DateRange {
            start: Utc.with_ymd_and_hms(2024, 2, start + 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap(),
        });
        let narrow_found = filter_items(&items, &narrower);

        prop_assert!(narrow_found.len() <= base_found.len());
        let base_ids: HashSet<&str> = base_found.iter().map(|i| i.id.as_str()).collect();
        prop_assert!(narrow_found.iter().all(|i| base_ids.contains(i.id.as_str())));
    }

    #[test]
    fn classify_is_pure(text in text_strategy(), source in source_strategy()) {
        let classifier = ItemClassifier::default();
        let draft = Draft {
            id: "d".into(),
            source,
            title: text.clone(),
            content: text.clone(),
            channel: None,
            author: String::new(),
            timestamp: Utc::now(),
            tag_text: text.clone(),
        };
        let tags = extract_hashtags(&text, Some(source));
        prop_assert_eq!(classifier.classify(&draft, &tags), classifier.classify(&draft, &tags));
    }
}
