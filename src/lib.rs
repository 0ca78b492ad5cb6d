//! Maktaba Core Library
//!
//! Core functionality for the maktaba content aggregator, which pulls
//! books, lessons, and religious audio from public catalogs into one
//! unified, de-duplicated, searchable store.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Process settings built once from the environment
//! - [`fetch`] - Source adapters with shared retry/backoff policy
//! - [`normalize`] - Per-source mapping into the canonical content shape
//! - [`generate`] - Task generators, one per content domain
//! - [`pipeline`] - Bounded work queue, persistence workers, cycle scheduler
//! - [`db`] - Database connection and schema management
//! - [`store`] - Document-store contract and SQLite backend
//! - [`service`] - Query boundary and feedback aggregation

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod content;
pub mod db;
pub mod fetch;
pub mod generate;
pub mod normalize;
pub mod pipeline;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigError, Settings};
pub use content::{Content, ContentDraft, ContentType, Feedback, NewFeedback, RatingSummary};
pub use db::Database;
pub use fetch::{FetchClient, FetchError, RetryConfig};
pub use generate::{GeneratorError, TaskGenerator};
pub use pipeline::{QueueClosed, Scheduler, WorkQueue, WorkReceiver, persistence_worker};
pub use service::{ContentService, ServiceError};
pub use store::{ContentFilter, ContentStore, SqliteStore, StoreError};
