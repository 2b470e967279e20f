//! Session analysis: one transcript in, one [`SessionSummary`] out
//!
//! Transcripts are line-delimited JSON records with a `type` (`system`,
//! `user`, `assistant`), an optional ISO-8601 `timestamp`, and a `message`
//! payload whose `content` is either a plain string or a list of typed
//! blocks (`text`, `tool_use`, `tool_result`).
//!
//! # Error Handling
//!
//! The analyzer is designed to be resilient:
//!
//! - **Malformed JSON lines**: logged as a warning, line skipped, scan
//!   continues.
//! - **Missing fields**: handled via `#[serde(default)]` throughout.
//! - **Unparsable timestamps**: do not update the session's time range.
//! - **Unreadable file**: produces a [`SessionSummary`] carrying an error
//!   marker instead of failing, so one bad file never aborts a batch.
//!
//! `analyze` is a pure function of one transcript and the pattern library;
//! it has no dependency on call order across transcripts, which is what
//! makes the aggregation fold in [`aggregate`] commutative.

pub mod aggregate;

pub use aggregate::reduce;

use crate::signals::PatternLibrary;
use crate::types::{ApiError, SessionSummary, SignalMatch, ToolError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Max stored context snippets per signal kind, per session.
pub const SIGNAL_SAMPLE_CAP: usize = 10;
/// Max stored chars of a failed tool result.
const TOOL_ERROR_CONTENT_CAP: usize = 200;

// ============================================
// Raw JSONL record types (serde deserialization)
// ============================================

/// One line of a transcript. `#[serde(default)]` everywhere so partial
/// records still deserialize.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawEntry {
    #[serde(rename = "type")]
    entry_type: Option<String>,
    timestamp: Option<String>,
    subtype: Option<String>,
    cause: Option<serde_json::Value>,
    retry_attempt: Option<u32>,
    max_retries: Option<u32>,
    duration_ms: Option<u64>,
    message: Option<RawMessage>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawMessage {
    content: Option<RawContent>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        #[serde(default)]
        name: Option<String>,
    },
    #[serde(rename = "tool_result")]
    ToolResult {
        #[serde(default)]
        tool_use_id: Option<String>,
        #[serde(default)]
        content: serde_json::Value,
        #[serde(default)]
        is_error: bool,
    },
    #[serde(other)]
    Unknown,
}

impl RawContent {
    /// Concatenated text of the payload: the plain string form, or every
    /// `text` block plus every string-valued `tool_result` content, joined
    /// with newlines.
    fn joined_text(&self) -> String {
        match self {
            RawContent::Text(s) => s.clone(),
            RawContent::Blocks(blocks) => {
                let mut parts: Vec<&str> = Vec::new();
                for block in blocks {
                    match block {
                        ContentBlock::Text { text } => parts.push(text),
                        ContentBlock::ToolResult {
                            content: serde_json::Value::String(s),
                            ..
                        } => parts.push(s),
                        _ => {}
                    }
                }
                parts.join("\n")
            }
        }
    }
}

// ============================================
// Analyzer
// ============================================

/// Analyze one transcript file into a [`SessionSummary`].
///
/// Counts are unbounded; sample lists are capped at [`SIGNAL_SAMPLE_CAP`]
/// per kind to bound memory on long sessions.
pub fn analyze(path: &Path, patterns: &PatternLibrary) -> SessionSummary {
    let mut summary = SessionSummary {
        id: path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string(),
        project: path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string(),
        ..Default::default()
    };

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to open transcript");
            summary.error = Some(e.to_string());
            return summary;
        }
    };

    let reader = BufReader::new(file);
    let mut line_number = 0u32;

    for line_result in reader.lines() {
        line_number += 1;

        let line = match line_result {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(line = line_number, error = %e, "read error, skipping line");
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let entry: RawEntry = match serde_json::from_str(&line) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(line = line_number, error = %e, "malformed record, skipping");
                continue;
            }
        };

        summary.message_count += 1;

        if let Some(ts) = entry.timestamp.as_deref().and_then(parse_timestamp) {
            summary.start_time = Some(summary.start_time.map_or(ts, |cur| cur.min(ts)));
            summary.end_time = Some(summary.end_time.map_or(ts, |cur| cur.max(ts)));
        }

        match entry.entry_type.as_deref() {
            Some("system") => match entry.subtype.as_deref() {
                Some("api_error") => {
                    let code = entry
                        .cause
                        .as_ref()
                        .and_then(|c| c.get("code"))
                        .and_then(|v| v.as_str())
                        .unwrap_or("unknown")
                        .to_string();
                    summary.api_errors.push(ApiError {
                        code,
                        retry_attempt: entry.retry_attempt.unwrap_or(0),
                        max_retries: entry.max_retries.unwrap_or(0),
                    });
                }
                Some("turn_duration") => {
                    summary.duration_ms += entry.duration_ms.unwrap_or(0);
                }
                _ => {}
            },
            Some("user") => {
                if let Some(content) = entry.message.as_ref().and_then(|m| m.content.as_ref()) {
                    if let RawContent::Blocks(blocks) = content {
                        for block in blocks {
                            if let ContentBlock::ToolResult {
                                tool_use_id,
                                content,
                                is_error: true,
                            } = block
                            {
                                summary.tool_errors.push(ToolError {
                                    tool_use_id: tool_use_id
                                        .clone()
                                        .unwrap_or_else(|| "unknown".to_string()),
                                    content: truncate_chars(
                                        &value_to_text(content),
                                        TOOL_ERROR_CONTENT_CAP,
                                    ),
                                });
                            }
                        }
                    }

                    let text = content.joined_text();
                    record_signals(&mut summary, patterns.friction.detect(&text));
                    record_signals(&mut summary, patterns.errors.detect(&text));
                    record_signals(&mut summary, patterns.knowledge.detect(&text));
                }
            }
            Some("assistant") => {
                if let Some(content) = entry.message.as_ref().and_then(|m| m.content.as_ref()) {
                    if let RawContent::Blocks(blocks) = content {
                        for block in blocks {
                            if let ContentBlock::ToolUse { name } = block {
                                let tool = name.clone().unwrap_or_else(|| "unknown".to_string());
                                *summary.tool_usage.entry(tool).or_insert(0) += 1;
                            }
                        }
                    }

                    let text = content.joined_text();
                    record_signals(&mut summary, patterns.friction.detect(&text));
                    record_signals(&mut summary, patterns.confusion.detect(&text));
                }
            }
            _ => {}
        }
    }

    summary
}

/// Add detected signals to a summary: counts always, samples up to the cap.
fn record_signals(summary: &mut SessionSummary, matches: Vec<SignalMatch>) {
    for m in matches {
        *summary.signal_counts.entry(m.kind).or_insert(0) += 1;
        let samples = summary.signal_samples.entry(m.kind).or_default();
        if samples.len() < SIGNAL_SAMPLE_CAP {
            samples.push(m.context);
        }
    }
}

/// Parse an ISO-8601 timestamp; `Z` suffix accepted.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn value_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        v => v.to_string(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

// ============================================
// Discovery
// ============================================

/// Find transcript files under `root`, newest first.
///
/// Keeps `*.jsonl` files modified within the last `days_back` days, sorted
/// by modification time descending and truncated to `max_sessions`. A
/// missing root yields an empty list. Callers remain free to hand `analyze`
/// any list they assembled themselves.
pub fn discover(root: &Path, days_back: i64, max_sessions: usize) -> Vec<PathBuf> {
    if !root.exists() {
        tracing::warn!(root = %root.display(), "sessions directory does not exist");
        return Vec::new();
    }

    let pattern = root.join("**/*.jsonl");
    let Some(pattern) = pattern.to_str() else {
        return Vec::new();
    };

    let cutoff = Utc::now() - chrono::Duration::days(days_back);
    let mut found: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();

    let paths = match glob::glob(pattern) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::warn!(error = %e, "invalid discovery pattern");
            return Vec::new();
        }
    };

    for entry in paths.flatten() {
        let Ok(meta) = std::fs::metadata(&entry) else {
            continue;
        };
        let Ok(modified) = meta.modified() else {
            continue;
        };
        let modified: DateTime<Utc> = modified.into();
        if modified >= cutoff {
            found.push((entry, modified));
        }
    }

    found.sort_by(|a, b| b.1.cmp(&a.1));
    found.truncate(max_sessions);
    found.into_iter().map(|(p, _)| p).collect()
}
