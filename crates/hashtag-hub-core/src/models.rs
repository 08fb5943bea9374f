//! Core data models shared by the engine and the application shell.
//!
//! These types represent the normalized items and hashtag statistics that
//! flow from ingestion through aggregation and filtering.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The originating system kind for a record.
///
/// Serialized as `email` / `chat` / `document`; the provider names
/// `gmail` / `slack` / `notion` are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[serde(alias = "gmail")]
    Email,
    #[serde(alias = "slack")]
    Chat,
    #[serde(alias = "notion")]
    Document,
}

impl SourceKind {
    /// All source kinds, in sync order.
    pub const ALL: [SourceKind; 3] = [SourceKind::Email, SourceKind::Chat, SourceKind::Document];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Email => "email",
            SourceKind::Chat => "chat",
            SourceKind::Document => "document",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" | "gmail" => Ok(SourceKind::Email),
            "chat" | "slack" => Ok(SourceKind::Chat),
            "document" | "notion" => Ok(SourceKind::Document),
            other => Err(format!(
                "unknown source kind: '{}'. Use email, chat, or document.",
                other
            )),
        }
    }
}

/// Item priority assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!(
                "unknown priority: '{}'. Use high, medium, or low.",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => Err(format!(
                "unknown sentiment: '{}'. Use positive, negative, or neutral.",
                other
            )),
        }
    }
}

/// Bucketed share of the item collection that carries a hashtag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Trending,
    Popular,
    Moderate,
    Low,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Trending => "trending",
            Trend::Popular => "popular",
            Trend::Moderate => "moderate",
            Trend::Low => "low",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical normalized record produced by ingestion.
///
/// Immutable once built: the engine never edits an item in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub source: SourceKind,
    pub channel: Option<String>,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    /// Lowercase `#word` tags, deduplicated, in source-priority order.
    pub hashtags: Vec<String>,
    pub category: String,
    pub priority: Priority,
    pub sentiment: Option<Sentiment>,
}

/// Per-hashtag aggregate over an item collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashtagStat {
    pub hashtag: String,
    /// Number of items carrying the tag.
    pub count: usize,
    /// Distinct sources among contributing items, first-seen order.
    pub sources: Vec<SourceKind>,
    /// Distinct priorities among contributing items, first-seen order.
    pub priorities: Vec<Priority>,
    pub trend: Trend,
    /// `round(count / total * 100)`.
    pub engagement: u32,
}
