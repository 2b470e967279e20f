//! Cross-session reduction into an [`AggregateReport`]
//!
//! `reduce` is a pure fold: every field is a sum, max, or union, so
//! aggregating sessions in any order or partition yields the same counts.
//! Only the contents of the bounded sample lists depend on input order
//! (first N encountered win), which is accepted looseness, not a
//! correctness bug.

use crate::types::{AggregateReport, SessionSummary};

/// Max tool-error samples kept in the aggregate.
pub const TOOL_ERROR_SAMPLE_CAP: usize = 5;
/// Max context snippets kept per signal kind in the aggregate.
pub const AGGREGATE_SAMPLE_CAP: usize = super::SIGNAL_SAMPLE_CAP;

/// Fold a batch of per-session summaries into one report.
pub fn reduce(sessions: &[SessionSummary]) -> AggregateReport {
    let mut report = AggregateReport {
        sessions_analyzed: sessions.len(),
        ..Default::default()
    };

    for session in sessions {
        report.total_messages += u64::from(session.message_count);
        report.total_duration_ms += session.duration_ms;
        report.projects.insert(session.project.clone());

        for err in &session.api_errors {
            report.api_errors.total += 1;
            *report
                .api_errors
                .by_code
                .entry(err.code.clone())
                .or_insert(0) += 1;
            report.api_errors.max_retries_seen =
                report.api_errors.max_retries_seen.max(err.retry_attempt);
        }

        for err in &session.tool_errors {
            report.tool_errors.total += 1;
            if report.tool_errors.samples.len() < TOOL_ERROR_SAMPLE_CAP {
                report.tool_errors.samples.push(err.clone());
            }
        }

        for (kind, count) in &session.signal_counts {
            *report.signal_counts.entry(*kind).or_insert(0) += count;
        }

        for (kind, samples) in &session.signal_samples {
            let kept = report.signal_samples.entry(*kind).or_default();
            for sample in samples {
                if kept.len() >= AGGREGATE_SAMPLE_CAP {
                    break;
                }
                kept.push(sample.clone());
            }
        }

        for (tool, count) in &session.tool_usage {
            *report.tool_usage.entry(tool.clone()).or_insert(0) += count;
        }
    }

    report
}
