//! TOML configuration.
//!
//! Every section is optional; an empty file yields [`Config::default`].
//! See `config/hhub.example.toml` for a full example.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub connectors: ConnectorsConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CacheConfig {
    /// Entry bound; `None` keeps the cache unbounded.
    #[serde(default)]
    pub max_entries: Option<usize>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConnectorsConfig {
    #[serde(default)]
    pub email: EmailConnectorConfig,
    #[serde(default)]
    pub chat: ChatConnectorConfig,
    #[serde(default)]
    pub document: DocumentConnectorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConnectorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_auth_code")]
    pub auth_code: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_email_ttl")]
    pub token_ttl_secs: u64,
}

impl Default for EmailConnectorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            auth_code: default_auth_code(),
            max_results: default_max_results(),
            token_ttl_secs: default_email_ttl(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConnectorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_auth_code")]
    pub auth_code: String,
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,
    #[serde(default = "default_messages_per_channel")]
    pub messages_per_channel: usize,
    #[serde(default = "default_chat_ttl")]
    pub token_ttl_secs: u64,
}

impl Default for ChatConnectorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            auth_code: default_auth_code(),
            channels: default_channels(),
            messages_per_channel: default_messages_per_channel(),
            token_ttl_secs: default_chat_ttl(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentConnectorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_auth_code")]
    pub auth_code: String,
    #[serde(default = "default_database_id")]
    pub database_id: String,
    #[serde(default = "default_page_count")]
    pub page_count: usize,
    #[serde(default = "default_document_ttl")]
    pub token_ttl_secs: u64,
}

impl Default for DocumentConnectorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            auth_code: default_auth_code(),
            database_id: default_database_id(),
            page_count: default_page_count(),
            token_ttl_secs: default_document_ttl(),
        }
    }
}

fn default_enabled() -> bool {
    true
}
fn default_auth_code() -> String {
    "demo".to_string()
}
fn default_max_results() -> usize {
    100
}
fn default_email_ttl() -> u64 {
    3600
}
fn default_channels() -> Vec<String> {
    vec![
        "general".to_string(),
        "team".to_string(),
        "random".to_string(),
    ]
}
fn default_messages_per_channel() -> usize {
    50
}
fn default_chat_ttl() -> u64 {
    7200
}
fn default_database_id() -> String {
    "default".to_string()
}
fn default_page_count() -> usize {
    75
}
fn default_document_ttl() -> u64 {
    86400
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    if config.cache.max_entries == Some(0) {
        bail!("cache.max_entries must be >= 1 (omit it for an unbounded cache)");
    }

    let email = &config.connectors.email;
    if email.enabled {
        if email.max_results == 0 {
            bail!("connectors.email.max_results must be >= 1");
        }
        if email.token_ttl_secs == 0 {
            bail!("connectors.email.token_ttl_secs must be >= 1");
        }
    }

    let chat = &config.connectors.chat;
    if chat.enabled {
        if chat.channels.is_empty() {
            bail!("connectors.chat.channels must not be empty");
        }
        if chat.channels.iter().any(|c| c.trim().is_empty()) {
            bail!("connectors.chat.channels must not contain blank names");
        }
        if chat.token_ttl_secs == 0 {
            bail!("connectors.chat.token_ttl_secs must be >= 1");
        }
    }

    let document = &config.connectors.document;
    if document.enabled {
        if document.database_id.trim().is_empty() {
            bail!("connectors.document.database_id must not be empty");
        }
        if document.token_ttl_secs == 0 {
            bail!("connectors.document.token_ttl_secs must be >= 1");
        }
    }

    Ok(())
}
