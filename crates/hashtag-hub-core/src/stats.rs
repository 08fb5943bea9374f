//! Per-hashtag statistics over an item collection.
//!
//! Every call recomputes from zero. Output is sorted by `count` descending;
//! ties keep the order in which tags were first encountered.
//!
//! # Trend thresholds
//!
//! With `pct = count / total * 100` (0 when `total` is 0):
//!
//! | pct | trend |
//! |-----|-------|
//! | > 20 | trending |
//! | > 10 | popular |
//! | > 5 | moderate |
//! | otherwise | low |

use std::collections::HashMap;

use crate::models::{DataItem, HashtagStat, Priority, SourceKind, Trend};

struct Accumulator<'a> {
    hashtag: &'a str,
    count: usize,
    sources: Vec<SourceKind>,
    priorities: Vec<Priority>,
}

/// Aggregate hashtag counts, sources, priorities, trend, and engagement.
pub fn aggregate(items: &[DataItem]) -> Vec<HashtagStat> {
    let total = items.len();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut acc: Vec<Accumulator> = Vec::new();

    for item in items {
        for tag in &item.hashtags {
            let slot = *index.entry(tag.as_str()).or_insert_with(|| {
                acc.push(Accumulator {
                    hashtag: tag.as_str(),
                    count: 0,
                    sources: Vec::new(),
                    priorities: Vec::new(),
                });
                acc.len() - 1
            });
            let entry = &mut acc[slot];
            entry.count += 1;
            if !entry.sources.contains(&item.source) {
                entry.sources.push(item.source);
            }
            if !entry.priorities.contains(&item.priority) {
                entry.priorities.push(item.priority);
            }
        }
    }

    let mut stats: Vec<HashtagStat> = acc
        .into_iter()
        .map(|a| {
            let pct = share_percent(a.count, total);
            HashtagStat {
                hashtag: a.hashtag.to_string(),
                count: a.count,
                sources: a.sources,
                priorities: a.priorities,
                trend: classify_trend(pct),
                engagement: pct.round() as u32,
            }
        })
        .collect();

    // sort_by is stable, so equal counts keep first-encountered order.
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// `count / total * 100`, or 0 for an empty collection.
pub fn share_percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

pub fn classify_trend(pct: f64) -> Trend {
    if pct > 20.0 {
        Trend::Trending
    } else if pct > 10.0 {
        Trend::Popular
    } else if pct > 5.0 {
        Trend::Moderate
    } else {
        Trend::Low
    }
}
