//! # gapscout
//!
//! Workflow-gap analysis for AI coding assistant sessions.
//!
//! This library provides:
//! - Signal extraction from session transcripts (JSONL)
//! - Aggregation of per-session summaries into one evidence report
//! - Declarative gap detection over evidence and environment
//! - Recommendation matching against a YAML tool catalog
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three stages:
//! - **Extract:** transcripts are scanned against regex pattern tables,
//!   producing per-session summaries
//! - **Detect:** summaries plus the environment description are reduced
//!   to per-phase gap tags
//! - **Match:** catalog entries that fill a detected gap and are not
//!   excluded become recommendations, grouped by lifecycle phase
//!
//! Recommendations are evidence-driven: a tool is only suggested when
//! observed friction justifies it, never because something is "missing".
//!
//! ## Example
//!
//! ```rust,no_run
//! use gapscout::{run, Catalog, Config, EnvironmentContext, MatchOptions};
//!
//! let config = Config::load().expect("failed to load config");
//! let catalog_dir = config.catalog.dir.clone().unwrap_or_default();
//! let catalog = Catalog::load(&catalog_dir).expect("failed to load catalog");
//!
//! let env = EnvironmentContext::default();
//! let report = run(&env, &catalog, &MatchOptions::default());
//! println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! ```

// Re-export commonly used items at the crate root
pub use catalog::Catalog;
pub use config::Config;
pub use error::{Error, Result};
pub use gaps::detect_gaps;
pub use matcher::{match_catalog, MatchOutcome};
pub use pipeline::{run, MatchOptions};
pub use session::{aggregate::reduce, analyze, discover};
pub use signals::{PatternLibrary, PatternTable};
pub use types::*;

// Public modules
pub mod catalog;
pub mod config;
pub mod error;
pub mod gaps;
pub mod logging;
pub mod matcher;
pub mod pipeline;
pub mod session;
pub mod signals;
pub mod types;
