//! Gap detection: evidence in, per-phase unmet-need tags out
//!
//! Rules are declarative `(condition, phase, tag)` triples evaluated
//! independently and unioned — no rule ever looks at another rule's
//! output, so the detector is a one-pass, order-independent evaluation
//! that can be tested rule by rule.
//!
//! Three evidence sources feed the conditions:
//!
//! - repository capability flags and installed-tool inventory,
//! - aggregated signal counts from session analysis,
//! - optional free-text user context, run through the friction table and
//!   merged **additively** into the session counts before thresholds are
//!   evaluated (one free-text mention plus accumulated session hits can
//!   together cross a threshold).
//!
//! Structural absences (`no_linter`, `no_issue_tracking`, ...) are detected
//! and reported for diagnosis, but the matcher's tool→gap table only keys
//! on evidence-derived tags: nothing is recommended without observed
//! friction.

mod rules;

pub use rules::{gap_rules, GapCondition, GapRule};

use crate::signals::PatternLibrary;
use crate::types::{
    AggregateReport, EnvironmentContext, GapReport, InstalledInventory, SignalKind,
};
use std::collections::BTreeMap;

/// Evaluate every gap rule against the environment and optional report.
pub fn detect_gaps(
    env: &EnvironmentContext,
    report: Option<&AggregateReport>,
    patterns: &PatternLibrary,
) -> GapReport {
    let signal_totals = merged_signal_counts(env, report, patterns);
    let tool_error_total = report.map(|r| r.tool_errors.total).unwrap_or(0);
    let api_error_total = report.map(|r| r.api_errors.total).unwrap_or(0);

    let mut by_phase: BTreeMap<_, std::collections::BTreeSet<_>> = BTreeMap::new();

    for rule in gap_rules() {
        let holds = match &rule.condition {
            GapCondition::CapabilityMissing(flag) => !env.repo.has(*flag),
            GapCondition::NoneInstalled(names) => !names
                .iter()
                .any(|n| InstalledInventory::contains(&env.installed.mcps, n)),
            GapCondition::SignalAbove(kind, threshold) => {
                signal_totals.get(kind).copied().unwrap_or(0) > *threshold
            }
            GapCondition::ToolErrorsAbove(threshold) => tool_error_total > *threshold,
            GapCondition::ApiErrorsAbove(threshold) => api_error_total > *threshold,
        };

        if holds {
            by_phase.entry(rule.phase).or_default().insert(rule.tag);
        }
    }

    GapReport {
        by_phase,
        signal_totals,
    }
}

/// Session-derived counts plus one count per friction signal found in the
/// free-text context.
fn merged_signal_counts(
    env: &EnvironmentContext,
    report: Option<&AggregateReport>,
    patterns: &PatternLibrary,
) -> BTreeMap<SignalKind, u32> {
    let mut totals: BTreeMap<SignalKind, u32> = report
        .map(|r| r.signal_counts.clone())
        .unwrap_or_default();

    if let Some(text) = env.free_text() {
        for m in patterns.friction.detect(text) {
            *totals.entry(m.kind).or_insert(0) += 1;
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GapTag, LifecyclePhase, SessionInsights};

    fn env_with_mcps(mcps: &[&str]) -> EnvironmentContext {
        EnvironmentContext {
            installed: InstalledInventory {
                mcps: mcps.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn report_with_signal(kind: SignalKind, count: u32) -> AggregateReport {
        let mut report = AggregateReport::default();
        report.signal_counts.insert(kind, count);
        report
    }

    #[test]
    fn test_empty_setup_has_structural_gaps() {
        let env = EnvironmentContext::default();
        let gaps = detect_gaps(&env, None, PatternLibrary::shared());

        assert!(gaps.contains(LifecyclePhase::Requirements, GapTag::NoWebSearch));
        assert!(gaps.contains(LifecyclePhase::Requirements, GapTag::NoDesignTools));
        assert!(gaps.contains(LifecyclePhase::Planning, GapTag::NoIssueTracking));
        assert!(gaps.contains(LifecyclePhase::Planning, GapTag::NoDiagramming));
        assert!(gaps.contains(LifecyclePhase::Implementation, GapTag::NoDocLookup));
        assert!(gaps.contains(LifecyclePhase::Review, GapTag::NoGitHooks));
        assert!(gaps.contains(LifecyclePhase::Documentation, GapTag::NoAgentsMd));
        assert!(gaps.contains(LifecyclePhase::Documentation, GapTag::NoMemory));
    }

    #[test]
    fn test_installed_mcps_fill_structural_gaps() {
        let gaps = detect_gaps(&env_with_mcps(&["exa"]), None, PatternLibrary::shared());
        assert!(!gaps.contains(LifecyclePhase::Requirements, GapTag::NoWebSearch));

        // Any member of the equivalence set fills the gap
        let gaps = detect_gaps(
            &env_with_mcps(&["google-search"]),
            None,
            PatternLibrary::shared(),
        );
        assert!(!gaps.contains(LifecyclePhase::Requirements, GapTag::NoWebSearch));

        let gaps = detect_gaps(&env_with_mcps(&["github"]), None, PatternLibrary::shared());
        assert!(!gaps.contains(LifecyclePhase::Planning, GapTag::NoIssueTracking));

        let gaps = detect_gaps(
            &env_with_mcps(&["context7"]),
            None,
            PatternLibrary::shared(),
        );
        assert!(!gaps.contains(LifecyclePhase::Implementation, GapTag::NoDocLookup));

        let gaps = detect_gaps(
            &env_with_mcps(&["supermemory"]),
            None,
            PatternLibrary::shared(),
        );
        assert!(!gaps.contains(LifecyclePhase::Documentation, GapTag::NoMemory));
    }

    #[test]
    fn test_repo_capabilities_fill_structural_gaps() {
        let mut env = EnvironmentContext::default();
        env.repo.has_linter = true;
        env.repo.has_hooks = true;
        env.repo.has_tests = true;
        env.repo.has_agent_docs = true;

        let gaps = detect_gaps(&env, None, PatternLibrary::shared());
        assert!(!gaps.contains(LifecyclePhase::Implementation, GapTag::NoLinter));
        assert!(!gaps.contains(LifecyclePhase::Review, GapTag::NoGitHooks));
        assert!(!gaps.contains(LifecyclePhase::Testing, GapTag::NoTests));
        assert!(!gaps.contains(LifecyclePhase::Documentation, GapTag::NoAgentsMd));
    }

    #[test]
    fn test_signal_thresholds() {
        let env = EnvironmentContext::default();

        let report = report_with_signal(SignalKind::DontKnow, 3);
        let gaps = detect_gaps(&env, Some(&report), PatternLibrary::shared());
        assert!(gaps.contains(LifecyclePhase::Implementation, GapTag::KnowledgeGaps));

        let report = report_with_signal(SignalKind::CantFind, 2);
        let gaps = detect_gaps(&env, Some(&report), PatternLibrary::shared());
        assert!(gaps.contains(LifecyclePhase::Implementation, GapTag::SearchDifficulties));

        let report = report_with_signal(SignalKind::HowTo, 5);
        let gaps = detect_gaps(&env, Some(&report), PatternLibrary::shared());
        assert!(gaps.contains(LifecyclePhase::Documentation, GapTag::FrequentLookups));

        // Below threshold: no gap
        let report = report_with_signal(SignalKind::HowTo, 2);
        let gaps = detect_gaps(&env, Some(&report), PatternLibrary::shared());
        assert!(!gaps.contains(LifecyclePhase::Documentation, GapTag::FrequentLookups));
    }

    #[test]
    fn test_tool_error_threshold() {
        let env = EnvironmentContext::default();
        let mut report = AggregateReport::default();
        report.tool_errors.total = 5;

        let gaps = detect_gaps(&env, Some(&report), PatternLibrary::shared());
        assert!(gaps.contains(LifecyclePhase::Testing, GapTag::RecurringToolErrors));

        report.tool_errors.total = 2;
        let gaps = detect_gaps(&env, Some(&report), PatternLibrary::shared());
        assert!(!gaps.contains(LifecyclePhase::Testing, GapTag::RecurringToolErrors));
    }

    #[test]
    fn test_friction_signals_create_evidence_gaps() {
        let env = EnvironmentContext::default();

        let mut report = report_with_signal(SignalKind::ApiHallucination, 3);
        report.signal_counts.insert(SignalKind::OutdatedDocs, 2);
        let gaps = detect_gaps(&env, Some(&report), PatternLibrary::shared());
        assert!(gaps.contains(LifecyclePhase::Implementation, GapTag::OutdatedApiDocs));

        let report = report_with_signal(SignalKind::CssIssues, 2);
        let gaps = detect_gaps(&env, Some(&report), PatternLibrary::shared());
        assert!(gaps.contains(LifecyclePhase::Implementation, GapTag::FrontendStruggles));
    }

    #[test]
    fn test_free_text_merges_additively() {
        let mut env = EnvironmentContext::default();
        env.context = Some("CSS is killing me and keeps forgetting things".to_string());

        let gaps = detect_gaps(&env, None, PatternLibrary::shared());
        assert!(gaps.contains(LifecyclePhase::Implementation, GapTag::FrontendStruggles));
        assert!(gaps.contains(LifecyclePhase::Documentation, GapTag::ContextLoss));

        // Session counts plus one free-text hit together cross a threshold:
        // shallow_answers needs > 2, session has 2, free text adds 1.
        let report = report_with_signal(SignalKind::ShallowAnswers, 2);
        env.context = Some("shallow answers again".to_string());
        let gaps = detect_gaps(&env, Some(&report), PatternLibrary::shared());
        assert!(gaps.contains(LifecyclePhase::Planning, GapTag::ShallowReasoning));
        assert_eq!(gaps.signal_totals[&SignalKind::ShallowAnswers], 3);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let mut env = EnvironmentContext::default();
        env.context = Some("lint errors and flaky tests".to_string());
        env.session_insights = Some(SessionInsights {
            enabled: true,
            report: report_with_signal(SignalKind::Regressions, 4),
        });

        let report = env.report().cloned();
        let a = detect_gaps(&env, report.as_ref(), PatternLibrary::shared());
        let b = detect_gaps(&env, report.as_ref(), PatternLibrary::shared());
        assert_eq!(a.by_phase, b.by_phase);
        assert_eq!(a.signal_totals, b.signal_totals);
    }
}
