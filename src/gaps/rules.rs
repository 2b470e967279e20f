//! The declarative gap-rule table.
//!
//! Adding a rule is a one-line change here; the evaluator in the parent
//! module never needs to know about individual rules.

use crate::types::{CapabilityFlag, GapTag, LifecyclePhase, SignalKind};

/// A single testable condition over the environment and session evidence.
#[derive(Debug, Clone)]
pub enum GapCondition {
    /// The repository lacks a structural capability.
    CapabilityMissing(CapabilityFlag),
    /// None of the named MCP servers is installed.
    NoneInstalled(&'static [&'static str]),
    /// A signal's merged count strictly exceeds the threshold.
    SignalAbove(SignalKind, u32),
    /// Aggregate tool-error total strictly exceeds the threshold.
    ToolErrorsAbove(u32),
    /// Aggregate API-error total strictly exceeds the threshold.
    ApiErrorsAbove(u32),
}

/// Condition plus the phase/tag pair it asserts when it holds.
#[derive(Debug, Clone)]
pub struct GapRule {
    pub condition: GapCondition,
    pub phase: LifecyclePhase,
    pub tag: GapTag,
}

macro_rules! rule {
    ($cond:expr, $phase:ident, $tag:ident) => {
        GapRule {
            condition: $cond,
            phase: LifecyclePhase::$phase,
            tag: GapTag::$tag,
        }
    };
}

/// The full rule table, in evaluation order. Order only affects logging;
/// the result is a union and therefore order-independent.
pub fn gap_rules() -> Vec<GapRule> {
    use GapCondition::*;

    vec![
        // Structural: repository capabilities
        rule!(CapabilityMissing(CapabilityFlag::HasLinter), Implementation, NoLinter),
        rule!(CapabilityMissing(CapabilityFlag::HasFormatter), Implementation, NoFormatter),
        rule!(CapabilityMissing(CapabilityFlag::HasHooks), Review, NoGitHooks),
        rule!(CapabilityMissing(CapabilityFlag::HasTests), Testing, NoTests),
        rule!(CapabilityMissing(CapabilityFlag::HasAgentDocs), Documentation, NoAgentsMd),
        // Structural: missing tool families
        rule!(NoneInstalled(&["exa", "google-search"]), Requirements, NoWebSearch),
        rule!(NoneInstalled(&["figma", "pencil"]), Requirements, NoDesignTools),
        rule!(NoneInstalled(&["linear", "github"]), Planning, NoIssueTracking),
        rule!(NoneInstalled(&["excalidraw"]), Planning, NoDiagramming),
        rule!(NoneInstalled(&["context7"]), Implementation, NoDocLookup),
        rule!(NoneInstalled(&["supermemory"]), Documentation, NoMemory),
        // Knowledge-gap thresholds
        rule!(SignalAbove(SignalKind::DontKnow, 2), Implementation, KnowledgeGaps),
        rule!(SignalAbove(SignalKind::CantFind, 1), Implementation, SearchDifficulties),
        rule!(SignalAbove(SignalKind::CouldntFind, 1), Implementation, SearchDifficulties),
        rule!(SignalAbove(SignalKind::HowTo, 3), Documentation, FrequentLookups),
        // Error-volume thresholds
        rule!(ToolErrorsAbove(3), Testing, RecurringToolErrors),
        rule!(ApiErrorsAbove(5), Implementation, ApiInstability),
        // Friction evidence (any occurrence unless noted)
        rule!(SignalAbove(SignalKind::ApiHallucination, 0), Implementation, OutdatedApiDocs),
        rule!(SignalAbove(SignalKind::OutdatedDocs, 0), Implementation, OutdatedApiDocs),
        rule!(SignalAbove(SignalKind::SearchNeeded, 0), Requirements, SearchFriction),
        rule!(SignalAbove(SignalKind::ContextForgotten, 0), Documentation, ContextLoss),
        rule!(SignalAbove(SignalKind::ReExplaining, 0), Documentation, ContextLoss),
        rule!(
            SignalAbove(SignalKind::ProjectConventionsUnknown, 0),
            Documentation,
            ConventionsUndocumented
        ),
        rule!(SignalAbove(SignalKind::LintErrors, 0), Implementation, RecurringLintErrors),
        rule!(SignalAbove(SignalKind::CiFailures, 0), Review, UnguardedCi),
        rule!(SignalAbove(SignalKind::ForgotToLint, 0), Review, UnguardedCi),
        rule!(SignalAbove(SignalKind::Regressions, 0), Testing, RecurringRegressions),
        rule!(SignalAbove(SignalKind::FlakyTests, 0), Testing, FlakyTestSuite),
        rule!(SignalAbove(SignalKind::TaskTrackingIssues, 0), Planning, LostTaskContext),
        rule!(SignalAbove(SignalKind::NeedsDiagrams, 0), Planning, MissingDiagrams),
        rule!(SignalAbove(SignalKind::ShallowAnswers, 2), Planning, ShallowReasoning),
        rule!(SignalAbove(SignalKind::EdgeCaseMisses, 0), Planning, ShallowReasoning),
        rule!(SignalAbove(SignalKind::DesignFriction, 0), Requirements, DesignMismatch),
        rule!(SignalAbove(SignalKind::MeetingContextLost, 0), Requirements, MeetingContextLoss),
        rule!(SignalAbove(SignalKind::UiIssues, 0), Implementation, FrontendStruggles),
        rule!(SignalAbove(SignalKind::CssIssues, 0), Implementation, FrontendStruggles),
        rule!(SignalAbove(SignalKind::GithubFriction, 0), Review, GithubWorkflowFriction),
        rule!(SignalAbove(SignalKind::GitHistoryIssues, 0), Review, MessyGitHistory),
        rule!(SignalAbove(SignalKind::SlowBuilds, 0), Implementation, SlowFeedbackLoop),
    ]
}
