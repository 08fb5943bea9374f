//! Multi-source synchronization.
//!
//! [`sync_all`] fetches from every connected source concurrently and waits
//! for all of them to settle. A failing source contributes no items and a
//! warning notification; it never aborts its siblings.
//!
//! ```text
//! connected sources ──▶ join_all(fetch) ──▶ per-source outcome
//!                                              │
//!                         ok ──▶ Engine::ingest_all ──▶ SyncReport.items
//!                        err ──▶ warn! + Notification
//! ```
//!
//! Sources without credentials are skipped; they are not failures.

use std::collections::HashMap;

use futures::future::join_all;
use hashtag_hub_core::engine::Engine;
use hashtag_hub_core::models::{DataItem, SourceKind};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::connector::{ConnectorRegistry, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
}

/// A user-facing message produced by orchestration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    fn info(message: String) -> Self {
        Self {
            level: NotificationLevel::Info,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceOutcome {
    pub source: SourceKind,
    /// Items ingested from this source; zero on failure.
    pub fetched: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Ingested items, grouped by source in sync order.
    pub items: Vec<DataItem>,
    pub outcomes: Vec<SourceOutcome>,
    pub notifications: Vec<Notification>,
}

impl SyncReport {
    pub fn failed_sources(&self) -> Vec<SourceKind> {
        self.outcomes
            .iter()
            .filter(|o| o.error.is_some())
            .map(|o| o.source)
            .collect()
    }
}

/// Connect every registered connector whose config section is enabled.
///
/// Returns one notification per connection attempt.
pub async fn connect_all(registry: &ConnectorRegistry, config: &Config) -> Vec<Notification> {
    let c = &config.connectors;
    let attempts: Vec<(SourceKind, &str)> = registry
        .connectors()
        .iter()
        .map(|connector| {
            let source = connector.source();
            let code = match source {
                SourceKind::Email => c.email.auth_code.as_str(),
                SourceKind::Chat => c.chat.auth_code.as_str(),
                SourceKind::Document => c.document.auth_code.as_str(),
            };
            (source, code)
        })
        .collect();

    let results = join_all(
        attempts
            .iter()
            .map(|(source, code)| registry.connect(*source, code)),
    )
    .await;

    attempts
        .iter()
        .zip(results)
        .map(|((source, _), result)| match result {
            Ok(_) => Notification::info(format!("{} connected", source)),
            Err(e) => {
                warn!(%source, error = %e, "connection failed");
                Notification::warning(format!("{} connection failed: {}", source, e))
            }
        })
        .collect()
}

/// Fetch and ingest one source.
pub async fn sync_source(
    registry: &ConnectorRegistry,
    engine: &Engine,
    source: SourceKind,
) -> Result<Vec<DataItem>> {
    let records = registry.fetch(source).await?;
    Ok(engine.ingest_all(&records))
}

/// Sync every connected source with partial-success semantics.
pub async fn sync_all(registry: &ConnectorRegistry, engine: &Engine) -> SyncReport {
    let sources = registry.connected_sources();
    let results = join_all(sources.iter().map(|s| registry.fetch(*s))).await;

    let mut report = SyncReport::default();
    for (source, result) in sources.into_iter().zip(results) {
        match result {
            Ok(records) => {
                let items = engine.ingest_all(&records);
                info!(%source, items = items.len(), "synced");
                report.outcomes.push(SourceOutcome {
                    source,
                    fetched: items.len(),
                    error: None,
                });
                merge_items(&mut report.items, items);
            }
            Err(e) => {
                warn!(%source, error = %e, "sync failed");
                report
                    .notifications
                    .push(Notification::warning(format!("{} sync failed: {}", source, e)));
                report.outcomes.push(SourceOutcome {
                    source,
                    fetched: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    if !report.outcomes.is_empty() {
        report.notifications.push(Notification::info(format!(
            "synced {} items from {} of {} sources",
            report.items.len(),
            report.outcomes.len() - report.failed_sources().len(),
            report.outcomes.len()
        )));
    }
    report
}

/// Append `incoming` to `existing`, replacing items that share an id.
///
/// Replaced items keep their original position.
pub fn merge_items(existing: &mut Vec<DataItem>, incoming: Vec<DataItem>) {
    let mut index: HashMap<String, usize> = existing
        .iter()
        .enumerate()
        .map(|(i, item)| (item.id.clone(), i))
        .collect();
    for item in incoming {
        match index.get(&item.id) {
            Some(&i) => existing[i] = item,
            None => {
                index.insert(item.id.clone(), existing.len());
                existing.push(item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hashtag_hub_core::models::Priority;

    fn item(id: &str, title: &str) -> DataItem {
        DataItem {
            id: id.to_string(),
            title: title.to_string(),
            content: String::new(),
            source: SourceKind::Chat,
            channel: None,
            author: String::new(),
            timestamp: Utc::now(),
            hashtags: vec![],
            category: "General".to_string(),
            priority: Priority::Low,
            sentiment: None,
        }
    }

    #[test]
    fn test_merge_replaces_in_place() {
        let mut items = vec![item("a", "old"), item("b", "b")];
        merge_items(&mut items, vec![item("c", "c"), item("a", "new")]);
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "b", "c"]);
    }

    #[test]
    fn test_merge_dedupes_within_incoming() {
        let mut items = vec![item("a", "a")];
        merge_items(
            &mut items,
            vec![item("b", "first"), item("b", "second"), item("a", "again")],
        );
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["again", "second"]);
    }

    #[tokio::test]
    async fn test_sync_with_nothing_connected() {
        let registry = ConnectorRegistry::from_config(&Config::default());
        let engine = Engine::new(Default::default());
        let report = sync_all(&registry, &engine).await;
        assert!(report.items.is_empty());
        assert!(report.outcomes.is_empty());
        assert!(report.notifications.is_empty());
    }
}
