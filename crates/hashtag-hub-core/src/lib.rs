//! # Hashtag Hub Core
//!
//! The data processing engine behind Hashtag Hub: models, hashtag
//! extraction, record normalization, classification, statistics,
//! filtering, and the result cache.
//!
//! This crate has no async runtime, filesystem, or network dependencies.
//! Everything here is synchronous and total: no operation returns an error.
//!
//! ## Data Flow
//!
//! ```text
//! RawRecord ──normalize──▶ Draft ──extract──▶ hashtags ──classify──▶ DataItem
//!                                                                      │
//!                                   ┌──────────────────────────────────┤
//!                                   ▼                                  ▼
//!                             stats::aggregate                filter::filter_items
//!                                   └────────── ResultCache ───────────┘
//! ```

pub mod cache;
pub mod classify;
pub mod engine;
pub mod extract;
pub mod filter;
pub mod models;
pub mod record;
pub mod stats;
