//! Category, priority, and sentiment labelling for ingested records.
//!
//! Category and priority are driven by the record's hashtags; sentiment is
//! delegated to a [`SentimentClassifier`] so a real model can replace the
//! default keyword counter without touching the rest of the engine.
//!
//! A tag may drive both category and priority (`#meeting` is a Business
//! keyword and a Medium priority tag).

use crate::models::{Priority, Sentiment, SourceKind};
use crate::record::Draft;

/// Ordered `(category, keywords)` table. First category with a matching tag wins.
pub const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Finance", &["#budget", "#finance", "#invoice", "#approval", "#expense"]),
    ("Sales", &["#client", "#sales", "#enterprise", "#demo", "#deal"]),
    ("Product", &["#product", "#roadmap", "#features", "#release"]),
    ("Business", &["#marketing", "#strategy", "#q4", "#meeting", "#planning"]),
    ("Design", &["#design", "#ui", "#ux", "#components"]),
    ("Technical", &["#tech", "#api", "#bug", "#deploy", "#engineering"]),
    ("Customer", &["#feedback", "#customers", "#support"]),
    ("Team", &["#team", "#daily", "#standup", "#collaboration"]),
    ("Documentation", &["#docs", "#documentation", "#guide", "#reference"]),
];

pub const HIGH_PRIORITY_TAGS: &[&str] = &["#urgent", "#critical", "#asap", "#emergency"];
pub const MEDIUM_PRIORITY_TAGS: &[&str] = &["#important", "#followup", "#meeting", "#deadline"];

/// Category for records with no keyword match and no known source.
pub const GENERAL_CATEGORY: &str = "General";

pub const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "awesome",
    "happy",
    "success",
    "progress",
    "thanks",
    "perfect",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "problem",
    "issue",
    "error",
    "fail",
    "broken",
    "delay",
    "blocked",
    "terrible",
    "concern",
];

/// Labels assigned to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: String,
    pub priority: Priority,
    pub sentiment: Sentiment,
}

/// Pluggable sentiment model. Must be deterministic for a given text.
pub trait SentimentClassifier: Send + Sync {
    fn sentiment(&self, text: &str) -> Sentiment;
}

/// Counts case-insensitive occurrences of positive and negative words.
///
/// The larger count wins; a tie (including zero-zero) is neutral.
#[derive(Debug, Clone)]
pub struct KeywordSentiment {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl KeywordSentiment {
    pub fn new<P, N>(positive: P, negative: N) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        let lower = |w: &str| w.to_lowercase();
        Self {
            positive: positive.into_iter().map(|w| lower(w.as_ref())).collect(),
            negative: negative.into_iter().map(|w| lower(w.as_ref())).collect(),
        }
    }
}

impl Default for KeywordSentiment {
    fn default() -> Self {
        Self::new(POSITIVE_WORDS.iter(), NEGATIVE_WORDS.iter())
    }
}

impl SentimentClassifier for KeywordSentiment {
    fn sentiment(&self, text: &str) -> Sentiment {
        let haystack = text.to_lowercase();
        let count = |words: &[String]| -> usize {
            words
                .iter()
                .filter(|w| !w.is_empty())
                .map(|w| haystack.matches(w.as_str()).count())
                .sum()
        };
        let pos = count(&self.positive);
        let neg = count(&self.negative);
        match pos.cmp(&neg) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}

/// Derives [`Classification`]s from drafts and their extracted hashtags.
pub struct ItemClassifier {
    sentiment: Box<dyn SentimentClassifier>,
}

impl ItemClassifier {
    pub fn new(sentiment: Box<dyn SentimentClassifier>) -> Self {
        Self { sentiment }
    }

    /// Label a draft. Never fails: unmatched inputs fall back to defaults.
    pub fn classify(&self, draft: &Draft, hashtags: &[String]) -> Classification {
        let text = format!("{} {}", draft.title, draft.content);
        Classification {
            category: categorize(hashtags, Some(draft.source)),
            priority: prioritize(hashtags),
            sentiment: self.sentiment.sentiment(&text),
        }
    }
}

impl Default for ItemClassifier {
    fn default() -> Self {
        Self::new(Box::new(KeywordSentiment::default()))
    }
}

impl std::fmt::Debug for ItemClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemClassifier").finish_non_exhaustive()
    }
}

/// First table category sharing a tag with `hashtags`, else the source default.
pub fn categorize(hashtags: &[String], source: Option<SourceKind>) -> String {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| hashtags.iter().any(|t| keywords.contains(&t.as_str())))
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| default_category(source).to_string())
}

pub fn default_category(source: Option<SourceKind>) -> &'static str {
    match source {
        Some(SourceKind::Email) => "Communication",
        Some(SourceKind::Chat) => "Team",
        Some(SourceKind::Document) => "Documentation",
        None => GENERAL_CATEGORY,
    }
}

/// High beats Medium beats the Low default.
pub fn prioritize(hashtags: &[String]) -> Priority {
    let any_of = |list: &[&str]| hashtags.iter().any(|t| list.contains(&t.as_str()));
    if any_of(HIGH_PRIORITY_TAGS) {
        Priority::High
    } else if any_of(MEDIUM_PRIORITY_TAGS) {
        Priority::Medium
    } else {
        Priority::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn draft(source: SourceKind, title: &str, content: &str) -> Draft {
        Draft {
            id: "d1".into(),
            source,
            title: title.into(),
            content: content.into(),
            channel: None,
            author: String::new(),
            timestamp: Utc::now(),
            tag_text: String::new(),
        }
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_urgent_is_high_regardless_of_content() {
        let c = ItemClassifier::default();
        for source in SourceKind::ALL {
            let d = draft(source, "Great news", "excellent amazing progress");
            let result = c.classify(&d, &tags(&["#urgent"]));
            assert_eq!(result.priority, Priority::High);
        }
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(prioritize(&tags(&["#meeting", "#asap"])), Priority::High);
        assert_eq!(prioritize(&tags(&["#deadline", "#misc"])), Priority::Medium);
        assert_eq!(prioritize(&tags(&["#misc"])), Priority::Low);
        assert_eq!(prioritize(&[]), Priority::Low);
    }

    #[test]
    fn test_category_table_order() {
        // #budget (Finance) precedes #marketing (Business) in the table.
        assert_eq!(
            categorize(&tags(&["#marketing", "#budget"]), Some(SourceKind::Chat)),
            "Finance"
        );
        assert_eq!(categorize(&tags(&["#meeting"]), Some(SourceKind::Email)), "Business");
    }

    #[test]
    fn test_category_fallbacks() {
        let none = tags(&["#random"]);
        assert_eq!(categorize(&none, Some(SourceKind::Email)), "Communication");
        assert_eq!(categorize(&none, Some(SourceKind::Chat)), "Team");
        assert_eq!(categorize(&none, Some(SourceKind::Document)), "Documentation");
        assert_eq!(categorize(&none, None), GENERAL_CATEGORY);
    }

    #[test]
    fn test_keyword_sentiment() {
        let s = KeywordSentiment::default();
        assert_eq!(s.sentiment("Great team collaboration"), Sentiment::Positive);
        assert_eq!(s.sentiment("Build is BROKEN, another error"), Sentiment::Negative);
        assert_eq!(s.sentiment("Quarterly numbers"), Sentiment::Neutral);
        assert_eq!(s.sentiment("good progress but one problem"), Sentiment::Positive);
        assert_eq!(s.sentiment("good, but a problem"), Sentiment::Neutral);
    }

    #[test]
    fn test_custom_sentiment_classifier() {
        struct AlwaysNegative;
        impl SentimentClassifier for AlwaysNegative {
            fn sentiment(&self, _text: &str) -> Sentiment {
                Sentiment::Negative
            }
        }
        let c = ItemClassifier::new(Box::new(AlwaysNegative));
        let d = draft(SourceKind::Document, "Excellent", "great");
        assert_eq!(c.classify(&d, &[]).sentiment, Sentiment::Negative);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let c = ItemClassifier::default();
        let d = draft(SourceKind::Chat, "Standup", "good progress, one issue");
        let t = tags(&["#standup", "#followup"]);
        let first = c.classify(&d, &t);
        for _ in 0..5 {
            assert_eq!(c.classify(&d, &t), first);
        }
        assert_eq!(first.category, "Team");
        assert_eq!(first.priority, Priority::Medium);
    }
}
