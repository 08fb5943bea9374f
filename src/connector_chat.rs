//! Chat connector.
//!
//! Produces `messages_per_channel` synthetic messages for each configured
//! channel, thirty seconds apart. Every fifth message starts a thread.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use hashtag_hub_core::models::SourceKind;
use hashtag_hub_core::record::{ChatRecord, RawRecord};
use uuid::Uuid;

use crate::config::ChatConnectorConfig;
use crate::connector::{
    check_auth_code, expiry_after, Connector, ConnectorError, Credentials, Result,
};

const SCOPES: &[&str] = &["channels:read", "chat:write", "users:read"];

const MESSAGES: &[&str] = &[
    "Daily #standup: shipped the login fix, thanks all #team",
    "Can someone #help with the #api rate limits?",
    "Great #collaboration on the #design review today",
    "Reminder: #deadline for the #release is Friday #important",
    "Deploy is blocked by a failing test #bug",
];

pub struct ChatConnector {
    config: ChatConnectorConfig,
}

impl ChatConnector {
    pub fn new(config: ChatConnectorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for ChatConnector {
    fn source(&self) -> SourceKind {
        SourceKind::Chat
    }

    fn description(&self) -> &str {
        "Channel messages"
    }

    async fn connect(&self, auth_code: &str) -> Result<Credentials> {
        check_auth_code(SourceKind::Chat, auth_code)?;
        Ok(Credentials {
            access_token: format!("chat_token_{}", Uuid::new_v4().simple()),
            refresh_token: Some(format!("chat_refresh_{}", Uuid::new_v4().simple())),
            expires_at: expiry_after(self.config.token_ttl_secs),
            scope: SCOPES.iter().map(|s| s.to_string()).collect(),
        })
    }

    async fn fetch(&self, credentials: &Credentials) -> Result<Vec<RawRecord>> {
        if !credentials.access_token.starts_with("chat_token_") {
            return Err(ConnectorError::Fetch {
                kind: SourceKind::Chat,
                message: "access token was not issued for this workspace".to_string(),
            });
        }

        let now = Utc::now();
        let per_channel = self.config.messages_per_channel;
        let records = self
            .config
            .channels
            .iter()
            .flat_map(|channel| {
                (0..per_channel).map(move |i| {
                    RawRecord::Chat(ChatRecord {
                        id: format!("{}_{}", channel, i),
                        channel: Some(format!("#{}", channel)),
                        user: Some(format!("user{}", i)),
                        text: Some(format!("{} [{}]", MESSAGES[i % MESSAGES.len()], i)),
                        timestamp: now - Duration::seconds(i as i64 * 30),
                        thread_ts: (i % 5 == 0).then(|| format!("thread_{}", i)),
                    })
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
    async fn test_messages_per_channel() {
        let c = ChatConnector::new(ChatConnectorConfig {
            channels: vec!["dev".into(), "ops".into()],
            messages_per_channel: 4,
            ..Default::default()
        });
        let creds = c.connect("code").await.unwrap();
        let records = c.fetch(&creds).await.unwrap();
        assert_eq!(records.len(), 8);

        let ids: Vec<String> = records.iter().map(|r| r.normalize().id).collect();
        assert_eq!(ids[0], "chat_dev_0");
        assert_eq!(ids[7], "chat_ops_3");
    }

    #[tokio::test]
    async fn test_foreign_token_is_rejected() {
        let c = ChatConnector::new(ChatConnectorConfig::default());
        let creds = Credentials {
            access_token: "email_token_abc".into(),
            refresh_token: None,
            expires_at: Utc::now() + Duration::hours(1),
            scope: vec![],
        };
        assert!(c.fetch(&creds).await.is_err());
    }
}
