//! # Hashtag Hub CLI (`hhub`)
//!
//! ## Usage
//!
//! ```bash
//! hhub --config ./config/hhub.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `hhub sync` | Connect every enabled source, fetch, and report counts |
//! | `hhub sources` | List sources and their connection status |
//! | `hhub extract "<text>"` | Extract hashtags from text |
//! | `hhub stats` | Hashtag statistics over synced items |
//! | `hhub search [query]` | Filter synced items |
//!
//! Diagnostics are written to stderr and controlled with `RUST_LOG`
//! (default `hashtag_hub=info`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use hashtag_hub::config::{self, Config};
use hashtag_hub::connector::ConnectorRegistry;
use hashtag_hub::{report, sources, sync};
use hashtag_hub_core::cache::ResultCache;
use hashtag_hub_core::engine::Engine;
use hashtag_hub_core::filter::{DateRange, FilterCriteria};
use hashtag_hub_core::models::{DataItem, Priority, Sentiment, SourceKind};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "./config/hhub.toml";

/// Hashtag Hub: hashtag extraction, statistics, and search across
/// email, chat, and document sources.
#[derive(Parser)]
#[command(name = "hhub", version)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/hhub.toml`; built-in defaults apply when that
    /// file does not exist.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print command output as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect every enabled source and fetch its records.
    Sync,

    /// List sources and their connection status.
    Sources,

    /// Extract hashtags from text.
    ///
    /// Prints one hashtag per line, priority tags for the source first.
    Extract {
        text: String,

        /// Source kind: `email`, `chat`, `document` (or `gmail`, `slack`, `notion`).
        #[arg(long)]
        source: Option<SourceKind>,
    },

    /// Hashtag statistics over all synced items.
    Stats {
        /// Restrict to one source kind.
        #[arg(long)]
        source: Option<SourceKind>,

        /// Maximum number of rows.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Filter synced items.
    Search {
        /// Free-text query matched against title, content, and hashtags.
        query: Option<String>,

        #[arg(long = "category")]
        categories: Vec<String>,

        #[arg(long = "source")]
        sources: Vec<SourceKind>,

        #[arg(long = "priority")]
        priorities: Vec<Priority>,

        /// Any-of hashtag filter; the leading `#` is optional.
        #[arg(long = "hashtag")]
        hashtags: Vec<String>,

        #[arg(long)]
        sentiment: Option<Sentiment>,

        /// Only items on or after this date (YYYY-MM-DD).
        #[arg(long)]
        since: Option<String>,

        /// Only items on or before this date (YYYY-MM-DD).
        #[arg(long)]
        until: Option<String>,

        /// Order by relevance and show scores.
        #[arg(long)]
        ranked: bool,

        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hashtag_hub=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = resolve_config(cli.config.as_deref())?;

    let cache = Arc::new(match cfg.cache.max_entries {
        Some(n) => ResultCache::bounded(n),
        None => ResultCache::new(),
    });
    let engine = Engine::new(cache);

    if let Commands::Extract { text, source } = &cli.command {
        let tags = engine.extract_hashtags(text, *source);
        if cli.json {
            return report::print_json(&tags);
        }
        for tag in tags {
            println!("{}", tag);
        }
        return Ok(());
    }

    let registry = ConnectorRegistry::from_config(&cfg);
    let mut notes = sync::connect_all(&registry, &cfg).await;
    let mut synced = sync::sync_all(&registry, &engine).await;
    notes.append(&mut synced.notifications);
    synced.notifications = notes;

    let json = cli.json;
    match cli.command {
        Commands::Sync if json => report::print_json(&synced)?,
        Commands::Sync => report::print_sync_report(&synced),
        Commands::Sources if json => report::print_json(&sources::source_statuses(&registry))?,
        Commands::Sources => sources::list_sources(&registry)?,
        Commands::Stats { source, limit } => {
            let mut stats = engine.calculate_hashtag_stats(&synced.items, source);
            if json {
                stats.truncate(limit.unwrap_or(usize::MAX));
                report::print_json(&stats)?;
            } else {
                let total = count_items(&synced.items, source);
                report::print_stats(&stats, total, limit);
            }
        }
        Commands::Search {
            query,
            categories,
            sources,
            priorities,
            hashtags,
            sentiment,
            since,
            until,
            ranked,
            limit,
        } => {
            let criteria = FilterCriteria {
                query,
                categories,
                sources,
                priorities,
                date_range: date_range(since.as_deref(), until.as_deref())?,
                hashtags: hashtags.iter().map(|h| normalize_hashtag(h)).collect(),
                sentiment,
            };
            let limit = limit.unwrap_or(usize::MAX);
            if ranked {
                let mut found = engine.rank_data(&synced.items, &criteria);
                found.truncate(limit);
                if json {
                    report::print_json(&found)?;
                } else {
                    report::print_ranked(&found);
                }
            } else {
                let mut found = engine.filter_data(&synced.items, &criteria);
                found.truncate(limit);
                if json {
                    report::print_json(&found)?;
                } else {
                    report::print_items(&found);
                }
            }
        }
        Commands::Extract { .. } => {}
    }

    Ok(())
}

fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => config::load_config(p),
        None => {
            let default = Path::new(DEFAULT_CONFIG);
            if default.exists() {
                config::load_config(default)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn count_items(items: &[DataItem], source: Option<SourceKind>) -> usize {
    match source {
        Some(s) => items.iter().filter(|i| i.source == s).count(),
        None => items.len(),
    }
}

fn normalize_hashtag(tag: &str) -> String {
    let tag = tag.trim().to_lowercase();
    if tag.starts_with('#') {
        tag
    } else {
        format!("#{}", tag)
    }
}

/// Inclusive range from the start of `since` to the end of `until` (UTC).
fn date_range(since: Option<&str>, until: Option<&str>) -> Result<Option<DateRange>> {
    if since.is_none() && until.is_none() {
        return Ok(None);
    }

    let start = match since {
        Some(s) => parse_date(s)?
            .and_hms_opt(0, 0, 0)
            .map(|t| t.and_utc())
            .context("invalid --since time")?,
        None => chrono::DateTime::<chrono::Utc>::MIN_UTC,
    };
    let end = match until {
        Some(s) => parse_date(s)?
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .map(|t| t.and_utc())
            .context("invalid --until time")?,
        None => chrono::DateTime::<chrono::Utc>::MAX_UTC,
    };
    Ok(Some(DateRange { start, end }))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_date_range_absent() {
        assert_eq!(date_range(None, None).unwrap(), None);
    }

    #[test]
    fn test_until_covers_last_instant_of_day() {
        let range = date_range(None, Some("2024-05-01")).unwrap().unwrap();
        let last = Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 59).unwrap()
            + chrono::Duration::milliseconds(500);
        assert!(range.contains(&last));
        assert!(!range.contains(&Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap()));
        assert_eq!(range.start, chrono::DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_since_starts_at_midnight() {
        let range = date_range(Some("2024-05-01"), None).unwrap().unwrap();
        assert!(range.contains(&Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()));
        let before = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
            - chrono::Duration::nanoseconds(1);
        assert!(!range.contains(&before));
        assert_eq!(range.end, chrono::DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_single_day_range() {
        let range = date_range(Some("2024-05-01"), Some("2024-05-01"))
            .unwrap()
            .unwrap();
        assert!(range.contains(&Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()));
        assert!(!range.contains(&Utc.with_ymd_and_hms(2024, 4, 30, 23, 59, 59).unwrap()));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let err = date_range(Some("05/01/2024"), None).unwrap_err();
        assert!(err.to_string().contains("expected YYYY-MM-DD"));
    }
}
