//! Console rendering for `hhub` command output.
//!
//! Everything here writes to stdout; diagnostics go through `tracing` to
//! stderr.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use hashtag_hub_core::filter::ScoredItem;
use hashtag_hub_core::models::{DataItem, HashtagStat};

use serde::Serialize;

use crate::sync::{NotificationLevel, SyncReport};

const TITLE_WIDTH: usize = 40;

pub fn print_sync_report(report: &SyncReport) {
    if report.outcomes.is_empty() {
        println!("No connected sources.");
        return;
    }

    println!("{:<10} {:>6}   RESULT", "SOURCE", "ITEMS");
    println!("{}", "-".repeat(40));
    for o in &report.outcomes {
        let result = match &o.error {
            Some(e) => format!("failed: {}", e),
            None => "ok".to_string(),
        };
        println!("{:<10} {:>6}   {}", o.source.as_str(), o.fetched, result);
    }

    if !report.notifications.is_empty() {
        println!();
        for n in &report.notifications {
            let marker = match n.level {
                NotificationLevel::Info => "info",
                NotificationLevel::Warning => "warn",
            };
            println!("[{}] {}", marker, n.message);
        }
    }
}

pub fn print_stats(stats: &[HashtagStat], total_items: usize, limit: Option<usize>) {
    if stats.is_empty() {
        println!("No hashtags found.");
        return;
    }

    println!("{} hashtags across {} items", stats.len(), total_items);
    println!();
    println!(
        "  {:<24} {:>6} {:>7}  {:<9} {:<24} PRIORITIES",
        "HASHTAG", "COUNT", "ENGAGE", "TREND", "SOURCES"
    );
    println!("  {}", "-".repeat(90));

    for s in stats.iter().take(limit.unwrap_or(usize::MAX)) {
        let sources: Vec<&str> = s.sources.iter().map(|k| k.as_str()).collect();
        let priorities: Vec<&str> = s.priorities.iter().map(|p| p.as_str()).collect();
        println!(
            "  {:<24} {:>6} {:>6}%  {:<9} {:<24} {}",
            s.hashtag,
            s.count,
            s.engagement,
            s.trend.as_str(),
            sources.join(","),
            priorities.join(",")
        );
    }
}

pub fn print_items(items: &[DataItem]) {
    if items.is_empty() {
        println!("No matching items.");
        return;
    }
    for (i, item) in items.iter().enumerate() {
        print_item(i + 1, None, item);
    }
}

pub fn print_ranked(ranked: &[ScoredItem]) {
    if ranked.is_empty() {
        println!("No matching items.");
        return;
    }
    for (i, r) in ranked.iter().enumerate() {
        print_item(i + 1, Some(r.score), &r.item);
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

fn print_item(n: usize, score: Option<u32>, item: &DataItem) {
    let score = score.map(|s| format!(" [score {}]", s)).unwrap_or_default();
    println!("{}.{} {}", n, score, truncate(&item.title, TITLE_WIDTH));
    println!(
        "    {} | {} | {} | {}",
        item.source,
        item.category,
        item.priority,
        format_relative(item.timestamp, Utc::now())
    );
    if !item.hashtags.is_empty() {
        println!("    {}", item.hashtags.join(" "));
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}

/// Relative age such as "3 hours ago"; absolute date beyond 30 days or
/// for future timestamps.
pub fn format_relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = (now - ts).num_seconds();

    if delta < 0 {
        return format_iso(ts);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if delta < 86400 * 30 {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        format_iso(ts)
    }
}

fn format_iso(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}
