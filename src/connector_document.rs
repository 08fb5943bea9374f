//! Document workspace connector.
//!
//! Produces `page_count` synthetic pages from the configured database, two
//! minutes apart. Pages carry native tags, which ingestion scans alongside
//! the title and body.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use hashtag_hub_core::models::SourceKind;
use hashtag_hub_core::record::{DocumentRecord, RawRecord};
use uuid::Uuid;

use crate::config::DocumentConnectorConfig;
use crate::connector::{
    check_auth_code, expiry_after, Connector, ConnectorError, Credentials, Result,
};

const SCOPES: &[&str] = &["read_content", "read_user"];

const PAGES: &[(&str, &str)] = &[
    ("Onboarding Guide", "Start here. A #guide for new hires."),
    ("API Reference", "Endpoints and auth flows. #reference #api #tech"),
    ("Design System", "Components and tokens. #design #ui #components"),
    ("Product Roadmap", "Upcoming #features on the #roadmap. #product"),
    ("Meeting Notes Template", "Reusable #template for weekly notes. #meeting"),
];

pub struct DocumentConnector {
    config: DocumentConnectorConfig,
}

impl DocumentConnector {
    pub fn new(config: DocumentConnectorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for DocumentConnector {
    fn source(&self) -> SourceKind {
        SourceKind::Document
    }

    fn description(&self) -> &str {
        "Workspace pages from one database"
    }

    async fn connect(&self, auth_code: &str) -> Result<Credentials> {
        check_auth_code(SourceKind::Document, auth_code)?;
        Ok(Credentials {
            access_token: format!("document_token_{}", Uuid::new_v4().simple()),
            refresh_token: Some(format!("document_refresh_{}", Uuid::new_v4().simple())),
            expires_at: expiry_after(self.config.token_ttl_secs),
            scope: SCOPES.iter().map(|s| s.to_string()).collect(),
        })
    }

    async fn fetch(&self, credentials: &Credentials) -> Result<Vec<RawRecord>> {
        if !credentials.access_token.starts_with("document_token_") {
            return Err(ConnectorError::Fetch {
                kind: SourceKind::Document,
                message: "access token was not issued for this workspace".to_string(),
            });
        }

        let now = Utc::now();
        let records = (0..self.config.page_count)
            .map(|i| {
                let (title, body) = PAGES[i % PAGES.len()];
                let mut tags = vec!["#docs".to_string(), "#notes".to_string()];
                if i % 3 == 0 {
                    tags.push("#important".to_string());
                }
                RawRecord::Document(DocumentRecord {
                    id: i.to_string(),
                    title: Some(format!("{} ({})", title, i)),
                    content: Some(body.to_string()),
                    database: Some(self.config.database_id.clone()),
                    last_edited: now - Duration::minutes(i as i64 * 2),
                    tags,
                    status: Some(if i % 3 == 0 { "published" } else { "draft" }.to_string()),
                })
            })
            .collect();

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pages_carry_database_and_tags() {
        let c = DocumentConnector::new(DocumentConnectorConfig {
            database_id: "handbook".into(),
            page_count: 3,
            ..Default::default()
        });
        let creds = c.connect("code").await.unwrap();
        let records = c.fetch(&creds).await.unwrap();
        assert_eq!(records.len(), 3);

        let draft = records[0].normalize();
        assert_eq!(draft.channel.as_deref(), Some("handbook"));
        assert!(draft.tag_text.contains("#important"));
        assert!(!records[1].normalize().tag_text.contains("#important"));
    }
}
