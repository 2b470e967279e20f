//! Signal extraction: pattern-based friction detection over free text
//!
//! A [`PatternTable`] is an ordered list of case-insensitive regexes, each
//! tagged with the [`SignalKind`] it evidences. [`PatternTable::detect`] is a
//! pure function of the table and the input text: each pattern contributes at
//! most one [`SignalMatch`] per call (its first occurrence), and independent
//! patterns can each hit somewhere in the same text.
//!
//! Four standard tables exist (see [`tables`]) and are applied to different
//! text sources by the session analyzer and gap detector:
//!
//! - error patterns — tool-result and compiler/test output
//! - knowledge-gap patterns — user-authored text
//! - friction patterns — user, assistant, and tool-output text uniformly
//! - agent-confusion patterns — assistant-authored text
//!
//! Tables are immutable values built once and passed in explicitly, so tests
//! can substitute alternates. An invalid pattern is a load-time
//! [`Error::Pattern`](crate::Error::Pattern), never a runtime failure.

mod tables;

pub use tables::PatternLibrary;

use crate::error::{Error, Result};
use crate::types::{SignalKind, SignalMatch};
use regex::{Regex, RegexBuilder};

/// Characters of context kept on each side of a match.
const CONTEXT_WINDOW: usize = 30;
/// Hard cap on stored snippet length.
const MAX_SNIPPET_LEN: usize = 100;

/// An ordered, immutable list of `(regex, kind)` pairs.
#[derive(Debug, Clone)]
pub struct PatternTable {
    entries: Vec<(Regex, SignalKind)>,
}

impl PatternTable {
    /// Compile a table from `(pattern, kind)` pairs.
    ///
    /// All patterns are compiled case-insensitive. A malformed pattern fails
    /// the whole table; the standard tables are fixed, so this can only
    /// happen when a test supplies its own.
    pub fn compile(specs: &[(&str, SignalKind)]) -> Result<Self> {
        let mut entries = Vec::with_capacity(specs.len());
        for (pattern, kind) in specs {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| Error::Pattern {
                    pattern: (*pattern).to_string(),
                    message: e.to_string(),
                })?;
            entries.push((regex, *kind));
        }
        Ok(Self { entries })
    }

    /// Scan `text`, returning one match per pattern that occurs anywhere.
    ///
    /// The snippet is the text around the first occurrence, trimmed to
    /// [`CONTEXT_WINDOW`] chars each side and capped at
    /// [`MAX_SNIPPET_LEN`] chars.
    pub fn detect(&self, text: &str) -> Vec<SignalMatch> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut matches = Vec::new();
        for (regex, kind) in &self.entries {
            if let Some(m) = regex.find(text) {
                matches.push(SignalMatch {
                    kind: *kind,
                    context: snippet(text, m.start(), m.end()),
                });
            }
        }
        matches
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extract a bounded snippet around `[start, end)`: the match plus up to
/// [`CONTEXT_WINDOW`] chars on each side.
fn snippet(text: &str, start: usize, end: usize) -> String {
    let from = back_chars(text, start, CONTEXT_WINDOW);
    let to = forward_chars(text, end, CONTEXT_WINDOW);
    let mut out: String = text[from..to].trim().to_string();
    if out.chars().count() > MAX_SNIPPET_LEN {
        out = out.chars().take(MAX_SNIPPET_LEN).collect();
    }
    out
}

/// Byte index `n` chars before `idx`; `idx` must be a char boundary.
fn back_chars(text: &str, idx: usize, n: usize) -> usize {
    text[..idx]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(idx)
}

/// Byte index `n` chars after `idx`; `idx` must be a char boundary.
fn forward_chars(text: &str, idx: usize, n: usize) -> usize {
    text[idx..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| idx + i)
        .unwrap_or(text.len())
}
