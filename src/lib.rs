//! Telegram Chat Stats - Conversation Ranking and Activity Analysis
//!
//! A Rust library for analysing the machine-readable JSON export produced by the
//! Telegram desktop client.
//!
//! # Features
//!
//! - Rank conversations by message volume, merging duplicate entries
//! - Resolve display names and the counterpart's real name
//! - Daily, weekly (Sunday-started) and monthly activity histograms in UTC
//! - Search, pagination and activity windows over the results
//! - Reports in TXT, CSV and JSON
//!
//! ```
//! let result = telegram_chat_stats::analyze_str(r#"{"chats": {"list": []}}"#).unwrap();
//! assert!(result.chats.is_empty());
//! ```

/// Time-bucketed message activity
pub mod activity;
/// Per-chat aggregation and ranking
pub mod chats;
/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// Report writers
pub mod file_writer;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Export parsing and the analysis pipeline
pub mod parser;
/// Search, pagination and activity windows
pub mod query;
/// Name and identifier resolution
pub mod resolve;
/// File-backed analysis with metrics
pub mod service;
/// Script detection for display names
pub mod text;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use error::{AnalyzerError, Result};
pub use models::{
    ActivityBucket, AggregatedChat, AnalysisResult, Granularity, MessageActivity, OutputFormat,
    RawExport,
};
pub use parser::{analyze, analyze_str, analyze_with_stats, load_export, parse_export_str};
pub use service::AnalysisService;
