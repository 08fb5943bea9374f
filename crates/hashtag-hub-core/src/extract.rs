//! Hashtag extraction with source-aware ordering.
//!
//! # Algorithm
//!
//! 1. Scan the text for every `#` followed by one or more word characters.
//! 2. Lowercase each match.
//! 3. Drop repeats, keeping the first occurrence's position.
//! 4. If a source is given, move that source's priority tags to the front.
//!    Both groups keep their first-occurrence order (a stable partition).
//!
//! # Example
//!
//! ```rust
//! use hashtag_hub_core::extract::extract_hashtags;
//! use hashtag_hub_core::models::SourceKind;
//!
//! let tags = extract_hashtags("Ship the #Release #team notes #TEAM", Some(SourceKind::Chat));
//! assert_eq!(tags, vec!["#team", "#release"]);
//! ```

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::SourceKind;

static HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").expect("valid hashtag pattern"));

/// Business tags promoted for email.
pub const EMAIL_PRIORITY_TAGS: &[&str] = &["#urgent", "#followup", "#meeting", "#budget", "#approval"];

/// Collaboration tags promoted for chat.
pub const CHAT_PRIORITY_TAGS: &[&str] = &["#team", "#collaboration", "#daily", "#standup", "#help"];

/// Documentation tags promoted for documents.
pub const DOCUMENT_PRIORITY_TAGS: &[&str] = &[
    "#docs",
    "#documentation",
    "#guide",
    "#template",
    "#reference",
];

/// The tags moved to the front of extraction output for `source`.
pub fn priority_tags(source: SourceKind) -> &'static [&'static str] {
    match source {
        SourceKind::Email => EMAIL_PRIORITY_TAGS,
        SourceKind::Chat => CHAT_PRIORITY_TAGS,
        SourceKind::Document => DOCUMENT_PRIORITY_TAGS,
    }
}

/// Extract lowercase, deduplicated hashtags from `text`.
///
/// With `source = None` the tags come back in first-occurrence order.
/// Never fails: text without tags yields an empty vector.
pub fn extract_hashtags(text: &str, source: Option<SourceKind>) -> Vec<String> {
    let tags = scan_unique(text);
    match source {
        Some(kind) => partition_by_priority(tags, priority_tags(kind)),
        None => tags,
    }
}

/// Lowercased matches with repeats removed, first occurrence wins.
fn scan_unique(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for m in HASHTAG.find_iter(text) {
        let tag = m.as_str().to_lowercase();
        if seen.insert(tag.clone()) {
            tags.push(tag);
        }
    }
    tags
}

fn partition_by_priority(tags: Vec<String>, priority: &[&str]) -> Vec<String> {
    let (mut front, back): (Vec<String>, Vec<String>) = tags
        .into_iter()
        .partition(|t| priority.contains(&t.as_str()));
    front.extend(back);
    front
}
