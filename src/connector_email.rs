//! Email connector.
//!
//! Produces a synthetic inbox of `max_results` messages, newest first, one
//! minute apart. Subjects and bodies rotate through a fixed set of business
//! topics so the hashtag mix resembles a real mailbox.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use hashtag_hub_core::models::SourceKind;
use hashtag_hub_core::record::{EmailRecord, RawRecord};
use uuid::Uuid;

use crate::config::EmailConnectorConfig;
use crate::connector::{
    check_auth_code, expiry_after, Connector, ConnectorError, Credentials, Result,
};

const SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

const TOPICS: &[(&str, &str)] = &[
    (
        "Q4 Budget Approval",
        "Please review the #budget and send #approval by EOD. Great progress so far.",
    ),
    (
        "Client Meeting Follow-up",
        "Notes from the #client call. #followup on the #demo next week.",
    ),
    (
        "Quarterly Planning",
        "Agenda for the #meeting on #q4 #strategy and #marketing spend.",
    ),
    (
        "Checkout Incident",
        "#urgent the checkout service is broken and the error rate keeps rising. #bug",
    ),
    (
        "Customer Feedback Summary",
        "Collected #feedback from #customers about mobile #performance.",
    ),
];

pub struct EmailConnector {
    config: EmailConnectorConfig,
}

impl EmailConnector {
    pub fn new(config: EmailConnectorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for EmailConnector {
    fn source(&self) -> SourceKind {
        SourceKind::Email
    }

    fn description(&self) -> &str {
        "Mailbox messages (subject, sender, labels)"
    }

    async fn connect(&self, auth_code: &str) -> Result<Credentials> {
        check_auth_code(SourceKind::Email, auth_code)?;
        Ok(Credentials {
            access_token: format!("email_token_{}", Uuid::new_v4().simple()),
            refresh_token: Some(format!("email_refresh_{}", Uuid::new_v4().simple())),
            expires_at: expiry_after(self.config.token_ttl_secs),
            scope: vec![SCOPE.to_string()],
        })
    }

    async fn fetch(&self, credentials: &Credentials) -> Result<Vec<RawRecord>> {
        if !credentials.access_token.starts_with("email_token_") {
            return Err(ConnectorError::Fetch {
                kind: SourceKind::Email,
                message: "access token was not issued for this mailbox".to_string(),
            });
        }

        let now = Utc::now();
        let records = (0..self.config.max_results)
            .map(|i| {
                let (subject, body) = TOPICS[i % TOPICS.len()];
                let mut labels = vec!["INBOX".to_string()];
                if i % 3 == 0 {
                    labels.push("IMPORTANT".to_string());
                }
                RawRecord::Email(EmailRecord {
                    id: i.to_string(),
                    subject: Some(subject.to_string()),
                    sender: Some(format!("sender{}@example.com", i)),
                    timestamp: now - Duration::minutes(i as i64),
                    content: Some(format!("{} (message {})", body, i)),
                    labels,
                    thread_id: Some(format!("thread_{}", i / 3)),
                })
            })
            .collect();

        Ok(records)
    }
}
