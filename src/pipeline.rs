//! End-to-end orchestration: environment in, match report out.

use crate::catalog::Catalog;
use crate::gaps::detect_gaps;
use crate::matcher::match_catalog;
use crate::signals::PatternLibrary;
use crate::types::{
    EnvironmentContext, Explain, MatchReport, SignalCount, ToolCategory,
};
use tracing::info;

/// Caller-tunable knobs for a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct MatchOptions {
    /// Restrict recommendations to one catalog category, by its
    /// serialized name (`mcp`, `cli-tool`, ...).
    pub category: Option<String>,
    /// Attach the ranked friction-signal breakdown to the report.
    pub explain: bool,
}

/// Run gap detection and matching over a loaded catalog.
///
/// Never fails on bad input: an unknown category filter produces an
/// empty report with a diagnostic, and a disabled or absent
/// session-insights block simply means detection runs on the
/// environment alone.
pub fn run(env: &EnvironmentContext, catalog: &Catalog, options: &MatchOptions) -> MatchReport {
    let patterns = PatternLibrary::shared();
    let report = env.report();
    let gaps = detect_gaps(env, report, patterns);

    let explain = options.explain.then(|| {
        let mut ranked: Vec<SignalCount> = gaps
            .signal_totals
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(signal, count)| SignalCount {
                signal: *signal,
                count: *count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.signal.cmp(&b.signal)));
        Explain {
            top_friction_signals: ranked,
        }
    });

    let category = match options.category.as_deref() {
        Some(raw) => match raw.parse::<ToolCategory>() {
            Ok(parsed) => Some(parsed),
            Err(message) => {
                return MatchReport {
                    gaps_detected: gaps.by_phase,
                    diagnostics: vec![message],
                    explain,
                    ..Default::default()
                };
            }
        },
        None => None,
    };

    let outcome = match_catalog(catalog, &gaps, env, category);

    info!(
        total = outcome.total,
        skipped = outcome.skipped.len(),
        phases = gaps.by_phase.len(),
        "match run complete"
    );

    MatchReport {
        total: outcome.total,
        gaps_detected: gaps.by_phase,
        recommendations_by_phase: outcome.by_phase,
        skipped: outcome.skipped,
        diagnostics: Vec::new(),
        explain,
    }
}
