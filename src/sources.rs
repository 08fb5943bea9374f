use anyhow::Result;
use chrono::{DateTime, Utc};
use hashtag_hub_core::models::SourceKind;
use serde::Serialize;

use crate::connector::{ConnectionStatus, ConnectorRegistry};

/// One row of `hhub sources`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceStatus {
    pub source: SourceKind,
    pub status: ConnectionStatus,
    pub expires_at: Option<DateTime<Utc>>,
    pub description: String,
}

/// Status of every source kind; sources without a connector report
/// `disconnected` with a "not configured" description.
pub fn source_statuses(registry: &ConnectorRegistry) -> Vec<SourceStatus> {
    SourceKind::ALL
        .into_iter()
        .map(|source| {
            let description = match registry.find(source) {
                Some(c) => c.description().to_string(),
                None => "not configured".to_string(),
            };
            SourceStatus {
                source,
                status: registry.status(source),
                expires_at: registry.credentials(source).map(|c| c.expires_at),
                description,
            }
        })
        .collect()
}

pub fn list_sources(registry: &ConnectorRegistry) -> Result<()> {
    println!(
        "{:<10} {:<13} {:<18} DESCRIPTION",
        "SOURCE", "STATUS", "EXPIRES"
    );
    for s in source_statuses(registry) {
        let expires = s
            .expires_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10} {:<13} {:<18} {}",
            s.source.as_str(),
            s.status.as_str(),
            expires,
            s.description
        );
    }
    Ok(())
}
