//! # Hashtag Hub
//!
//! Centralizes hashtag metadata across email, chat, and document sources.
//!
//! The processing engine (extraction, classification, aggregation,
//! filtering, caching) lives in the `hashtag-hub-core` crate. This crate is
//! the application shell around it: configuration, source connectors,
//! multi-source sync, and the `hhub` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌───────────────────┐
//! │  Connectors  │──▶│    sync      │──▶│  Engine (core)     │
//! │ email/chat/  │   │ join_all +   │   │ extract, classify, │
//! │ document     │   │ isolation    │   │ stats, filter      │
//! └──────────────┘   └──────────────┘   └─────────┬─────────┘
//!                                                 ▼
//!                                           ┌──────────┐
//!                                           │   CLI    │
//!                                           │  (hhub)  │
//!                                           └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! hhub sync                         # connect and fetch every source
//! hhub stats --source chat          # hashtag table for one source
//! hhub search budget --ranked       # relevance-ordered search
//! hhub extract "Ship #urgent fix" --source email
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`connector`] | Connector trait, credentials, registry |
//! | [`connector_email`] | Mailbox connector |
//! | [`connector_chat`] | Chat channel connector |
//! | [`connector_document`] | Document workspace connector |
//! | [`sync`] | Concurrent sync with per-source failure isolation |
//! | [`sources`] | Source status listing |
//! | [`report`] | Console output |

pub mod config;
pub mod connector;
pub mod connector_chat;
pub mod connector_document;
pub mod connector_email;
pub mod report;
pub mod sources;
pub mod sync;
