//! Raw connector records and their normalization into a common draft.
//!
//! Each source produces a differently-shaped record. [`RawRecord::normalize`]
//! maps every variant onto a [`Draft`] with the same fields, so the
//! classifier and the ingestion step never look up fields by name.
//!
//! Missing text fields degrade to defaults (`"Untitled"`, empty string)
//! instead of failing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SourceKind;

/// Title used when a record carries none.
pub const UNTITLED: &str = "Untitled";

const CHAT_TITLE_MAX_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: String,
    pub subject: Option<String>,
    pub sender: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub content: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub thread_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: String,
    pub channel: Option<String>,
    pub user: Option<String>,
    pub text: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub thread_ts: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub database: Option<String>,
    pub last_edited: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Option<String>,
}

/// A record as returned by a connector, tagged by source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum RawRecord {
    Email(EmailRecord),
    Chat(ChatRecord),
    Document(DocumentRecord),
}

/// Source-independent view of a raw record, ready for classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub id: String,
    pub source: SourceKind,
    pub title: String,
    pub content: String,
    pub channel: Option<String>,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    /// Text scanned for hashtags (title, content, and any native tags).
    pub tag_text: String,
}

impl RawRecord {
    pub fn source(&self) -> SourceKind {
        match self {
            RawRecord::Email(_) => SourceKind::Email,
            RawRecord::Chat(_) => SourceKind::Chat,
            RawRecord::Document(_) => SourceKind::Document,
        }
    }

    pub fn normalize(&self) -> Draft {
        let source = self.source();
        match self {
            RawRecord::Email(r) => {
                let title = non_empty(r.subject.as_deref()).unwrap_or(UNTITLED).to_string();
                let content = r.content.clone().unwrap_or_default();
                Draft {
                    id: item_id(source, &r.id),
                    source,
                    tag_text: join_text(&title, &content, &[]),
                    title,
                    content,
                    channel: r.labels.first().cloned(),
                    author: r.sender.clone().unwrap_or_default(),
                    timestamp: r.timestamp,
                }
            }
            RawRecord::Chat(r) => {
                let content = r.text.clone().unwrap_or_default();
                let title = chat_title(&content);
                Draft {
                    id: item_id(source, &r.id),
                    source,
                    // The title is a prefix of the text, so scanning the text covers it.
                    tag_text: content.clone(),
                    title,
                    content,
                    channel: r.channel.clone(),
                    author: r.user.clone().unwrap_or_default(),
                    timestamp: r.timestamp,
                }
            }
            RawRecord::Document(r) => {
                let title = non_empty(r.title.as_deref()).unwrap_or(UNTITLED).to_string();
                let content = r.content.clone().unwrap_or_default();
                Draft {
                    id: item_id(source, &r.id),
                    source,
                    tag_text: join_text(&title, &content, &r.tags),
                    title,
                    content,
                    channel: r.database.clone(),
                    author: String::new(),
                    timestamp: r.last_edited,
                }
            }
        }
    }
}

fn item_id(source: SourceKind, raw_id: &str) -> String {
    format!("{}_{}", source.as_str(), raw_id)
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn chat_title(text: &str) -> String {
    match non_empty(text.lines().next()) {
        Some(line) => line.chars().take(CHAT_TITLE_MAX_CHARS).collect(),
        None => UNTITLED.to_string(),
    }
}

fn join_text(title: &str, content: &str, tags: &[String]) -> String {
    let mut text = format!("{}\n{}", title, content);
    for tag in tags {
        text.push(' ');
        text.push_str(tag);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_email_normalization() {
        let raw = RawRecord::Email(EmailRecord {
            id: "7".into(),
            subject: Some("Budget review #budget".into()),
            sender: Some("cfo@example.com".into()),
            timestamp: ts(),
            content: Some("Numbers attached #approval".into()),
            labels: vec!["INBOX".into(), "IMPORTANT".into()],
            thread_id: None,
        });
        let draft = raw.normalize();
        assert_eq!(draft.id, "email_7");
        assert_eq!(draft.source, SourceKind::Email);
        assert_eq!(draft.title, "Budget review #budget");
        assert_eq!(draft.channel.as_deref(), Some("INBOX"));
        assert_eq!(draft.author, "cfo@example.com");
        assert!(draft.tag_text.contains("#budget"));
        assert!(draft.tag_text.contains("#approval"));
    }

    #[test]
    fn test_missing_fields_degrade() {
        let raw = RawRecord::Email(EmailRecord {
            id: "1".into(),
            subject: Some("   ".into()),
            sender: None,
            timestamp: ts(),
            content: None,
            labels: vec![],
            thread_id: None,
        });
        let draft = raw.normalize();
        assert_eq!(draft.title, UNTITLED);
        assert_eq!(draft.content, "");
        assert_eq!(draft.author, "");
        assert_eq!(draft.channel, None);
    }

    #[test]
    fn test_chat_title_from_first_line() {
        let long = "x".repeat(100);
        let raw = RawRecord::Chat(ChatRecord {
            id: "general_3".into(),
            channel: Some("#general".into()),
            user: Some("user3".into()),
            text: Some(format!("{}\nsecond line #help", long)),
            timestamp: ts(),
            thread_ts: None,
        });
        let draft = raw.normalize();
        assert_eq!(draft.id, "chat_general_3");
        assert_eq!(draft.title.chars().count(), 60);
        assert!(draft.tag_text.contains("#help"));

        let empty = RawRecord::Chat(ChatRecord {
            id: "x".into(),
            channel: None,
            user: None,
            text: None,
            timestamp: ts(),
            thread_ts: None,
        });
        assert_eq!(empty.normalize().title, UNTITLED);
    }

    #[test]
    fn test_document_tags_are_scanned() {
        let raw = RawRecord::Document(DocumentRecord {
            id: "4".into(),
            title: Some("Onboarding".into()),
            content: Some("Read this first".into()),
            database: Some("Handbook".into()),
            last_edited: ts(),
            tags: vec!["#docs".into(), "#guide".into()],
            status: Some("published".into()),
        });
        let draft = raw.normalize();
        assert_eq!(draft.channel.as_deref(), Some("Handbook"));
        assert_eq!(draft.timestamp, ts());
        assert!(draft.tag_text.ends_with("#docs #guide"));
    }

    #[test]
    fn test_tagged_json_shape() {
        let json = r##"{"source":"chat","id":"1","channel":"#dev","user":"u","text":"hi #team","timestamp":"2024-05-01T12:00:00Z","thread_ts":null}"##;
        let raw: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.source(), SourceKind::Chat);
        let draft = raw.normalize();
        assert_eq!(draft.channel.as_deref(), Some("#dev"));
        assert_eq!(draft.tag_text, "hi #team");
    }
}
