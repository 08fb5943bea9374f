//! Connector interface and registry.
//!
//! A [`Connector`] knows how to authenticate against one source system and
//! fetch its records as [`RawRecord`]s. The built-in connectors are
//! in-process stand-ins that produce synthetic data; a real implementation
//! only has to implement the same trait and be registered in its place.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              ConnectorRegistry              │
//! │  ┌─────────┐ ┌─────────┐ ┌──────────────┐   │
//! │  │  Email  │ │  Chat   │ │   Document   │   │
//! │  └─────────┘ └─────────┘ └──────────────┘   │
//! │        credentials per SourceKind           │
//! └──────────────────┬──────────────────────────┘
//!                    ▼
//!          sync_all() → Engine::ingest
//! ```

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hashtag_hub_core::models::SourceKind;
use hashtag_hub_core::record::RawRecord;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub type Result<T> = std::result::Result<T, ConnectorError>;

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("{0} is not connected")]
    NotConnected(SourceKind),

    #[error("{0} credentials expired")]
    TokenExpired(SourceKind),

    #[error("no connector registered for {0}")]
    NotRegistered(SourceKind),

    #[error("{kind} connection failed: {message}")]
    Connect { kind: SourceKind, message: String },

    #[error("{kind} fetch failed: {message}")]
    Fetch { kind: SourceKind, message: String },
}

/// Access granted by a successful [`Connector::connect`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub scope: Vec<String>,
}

impl Credentials {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    /// Credentials are present but past `expires_at`.
    Error,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Error => "error",
        }
    }
}

/// A source system that yields raw records.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use chrono::Utc;
/// use hashtag_hub::connector::{Connector, Credentials, Result};
/// use hashtag_hub_core::models::SourceKind;
/// use hashtag_hub_core::record::RawRecord;
///
/// struct EmptyInbox;
///
/// #[async_trait]
/// impl Connector for EmptyInbox {
///     fn source(&self) -> SourceKind { SourceKind::Email }
///     fn description(&self) -> &str { "An inbox with nothing in it" }
///
///     async fn connect(&self, _auth_code: &str) -> Result<Credentials> {
///         Ok(Credentials {
///             access_token: "t".into(),
///             refresh_token: None,
///             expires_at: Utc::now() + chrono::Duration::hours(1),
///             scope: vec![],
///         })
///     }
///
///     async fn fetch(&self, _credentials: &Credentials) -> Result<Vec<RawRecord>> {
///         Ok(vec![])
///     }
/// }
/// ```
#[async_trait]
pub trait Connector: Send + Sync {
    fn source(&self) -> SourceKind;

    /// One-line description shown by `hhub sources`.
    fn description(&self) -> &str;

    /// Exchange an authorization code for credentials.
    async fn connect(&self, auth_code: &str) -> Result<Credentials>;

    /// Fetch records using previously granted credentials.
    ///
    /// Source-specific parameters (result limits, channels, database ids)
    /// belong to the connector's own configuration.
    async fn fetch(&self, credentials: &Credentials) -> Result<Vec<RawRecord>>;
}

/// Registered connectors plus the credentials each one currently holds.
pub struct ConnectorRegistry {
    connectors: Vec<Box<dyn Connector>>,
    credentials: RwLock<HashMap<SourceKind, Credentials>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self {
            connectors: Vec::new(),
            credentials: RwLock::new(HashMap::new()),
        }
    }

    /// A registry holding the built-in connector for every enabled source.
    pub fn from_config(config: &Config) -> Self {
        use crate::connector_chat::ChatConnector;
        use crate::connector_document::DocumentConnector;
        use crate::connector_email::EmailConnector;

        let mut registry = Self::new();
        let c = &config.connectors;
        if c.email.enabled {
            registry.register(Box::new(EmailConnector::new(c.email.clone())));
        }
        if c.chat.enabled {
            registry.register(Box::new(ChatConnector::new(c.chat.clone())));
        }
        if c.document.enabled {
            registry.register(Box::new(DocumentConnector::new(c.document.clone())));
        }
        registry
    }

    /// Register a connector, replacing any existing one for the same source.
    pub fn register(&mut self, connector: Box<dyn Connector>) {
        let source = connector.source();
        self.connectors.retain(|c| c.source() != source);
        self.connectors.push(connector);
    }

    pub fn find(&self, source: SourceKind) -> Option<&dyn Connector> {
        self.connectors
            .iter()
            .find(|c| c.source() == source)
            .map(|c| c.as_ref())
    }

    pub fn connectors(&self) -> &[Box<dyn Connector>] {
        &self.connectors
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub async fn connect(&self, source: SourceKind, auth_code: &str) -> Result<Credentials> {
        let connector = self
            .find(source)
            .ok_or(ConnectorError::NotRegistered(source))?;
        let credentials = connector.connect(auth_code).await?;
        debug!(%source, expires_at = %credentials.expires_at, "connected");
        self.write_credentials().insert(source, credentials.clone());
        Ok(credentials)
    }

    pub fn disconnect(&self, source: SourceKind) {
        if self.write_credentials().remove(&source).is_some() {
            debug!(%source, "disconnected");
        }
    }

    pub fn credentials(&self, source: SourceKind) -> Option<Credentials> {
        self.read_credentials().get(&source).cloned()
    }

    pub fn status(&self, source: SourceKind) -> ConnectionStatus {
        self.status_at(source, Utc::now())
    }

    pub fn status_at(&self, source: SourceKind, now: DateTime<Utc>) -> ConnectionStatus {
        match self.read_credentials().get(&source) {
            None => ConnectionStatus::Disconnected,
            Some(c) if c.is_expired_at(now) => ConnectionStatus::Error,
            Some(_) => ConnectionStatus::Connected,
        }
    }

    /// Sources currently holding credentials, in [`SourceKind::ALL`] order.
    pub fn connected_sources(&self) -> Vec<SourceKind> {
        let creds = self.read_credentials();
        SourceKind::ALL
            .into_iter()
            .filter(|s| creds.contains_key(s))
            .collect()
    }

    /// Fetch from one source with its stored credentials.
    pub async fn fetch(&self, source: SourceKind) -> Result<Vec<RawRecord>> {
        let connector = self
            .find(source)
            .ok_or(ConnectorError::NotRegistered(source))?;
        let credentials = self
            .credentials(source)
            .ok_or(ConnectorError::NotConnected(source))?;
        if credentials.is_expired_at(Utc::now()) {
            return Err(ConnectorError::TokenExpired(source));
        }
        connector.fetch(&credentials).await
    }

    fn read_credentials(&self) -> RwLockReadGuard<'_, HashMap<SourceKind, Credentials>> {
        self.credentials.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_credentials(&self) -> RwLockWriteGuard<'_, HashMap<SourceKind, Credentials>> {
        self.credentials.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Expiry `ttl_secs` from now, shared by the built-in connectors.
pub(crate) fn expiry_after(ttl_secs: u64) -> DateTime<Utc> {
    let now = Utc::now();
    i64::try_from(ttl_secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Reject blank authorization codes the way a provider would.
pub(crate) fn check_auth_code(source: SourceKind, auth_code: &str) -> Result<()> {
    if auth_code.trim().is_empty() {
        return Err(ConnectorError::Connect {
            kind: source,
            message: "authorization code is empty".to_string(),
        });
    }
    Ok(())
}
