//! Core domain types for gapscout
//!
//! These types carry data through the pipeline in one direction only:
//!
//! ```text
//! transcripts -> SessionSummary -> AggregateReport -> gap set -> MatchReport
//! ```
//!
//! Every stage's output is an immutable value consumed by the next stage;
//! nothing here is mutated after construction. Maps and sets that cross the
//! API boundary are `BTreeMap`/`BTreeSet` so repeated runs over the same
//! inputs serialize byte-identically.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Signal** | One detected occurrence of a named friction/error/confusion pattern in text |
//! | **Gap** | An unmet need in a lifecycle phase, inferred from evidence |
//! | **Phase** | One of six fixed software-lifecycle stages |
//! | **Catalog entry** | A normalized description of one candidate tool |
//! | **Equivalence** | Owning tool B satisfies the same need as candidate A |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================
// Signals
// ============================================

/// Named kinds of friction, knowledge-gap, and error signals.
///
/// The variants are the union of the four pattern tables in
/// [`crate::signals`]; a kind does not encode which table produced it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    // Friction: documentation and APIs
    ApiHallucination,
    OutdatedDocs,
    // Friction: search and research
    SearchNeeded,
    // Friction: memory and context
    ContextForgotten,
    ReExplaining,
    ProjectConventionsUnknown,
    // Friction: frontend
    CssIssues,
    UiIssues,
    // Friction: reasoning depth
    ShallowAnswers,
    EdgeCaseMisses,
    // Friction: code quality and CI
    LintErrors,
    CiFailures,
    ForgotToLint,
    SlowBuilds,
    // Friction: testing
    Regressions,
    FlakyTests,
    // Friction: planning and tracking
    TaskTrackingIssues,
    NeedsDiagrams,
    // Friction: design and requirements
    DesignFriction,
    MeetingContextLost,
    // Friction: git and collaboration
    GithubFriction,
    GitHistoryIssues,
    // Knowledge gaps (user-authored phrasing)
    DontKnow,
    NotSure,
    CantFind,
    CouldntFind,
    Searching,
    HowTo,
    // Generic tool/compiler errors
    ExitCode,
    FileNotFound,
    CommandNotFound,
    PermissionDenied,
    Timeout,
    UnknownSkill,
    GenericError,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::ApiHallucination => "api_hallucination",
            SignalKind::OutdatedDocs => "outdated_docs",
            SignalKind::SearchNeeded => "search_needed",
            SignalKind::ContextForgotten => "context_forgotten",
            SignalKind::ReExplaining => "re_explaining",
            SignalKind::ProjectConventionsUnknown => "project_conventions_unknown",
            SignalKind::CssIssues => "css_issues",
            SignalKind::UiIssues => "ui_issues",
            SignalKind::ShallowAnswers => "shallow_answers",
            SignalKind::EdgeCaseMisses => "edge_case_misses",
            SignalKind::LintErrors => "lint_errors",
            SignalKind::CiFailures => "ci_failures",
            SignalKind::ForgotToLint => "forgot_to_lint",
            SignalKind::SlowBuilds => "slow_builds",
            SignalKind::Regressions => "regressions",
            SignalKind::FlakyTests => "flaky_tests",
            SignalKind::TaskTrackingIssues => "task_tracking_issues",
            SignalKind::NeedsDiagrams => "needs_diagrams",
            SignalKind::DesignFriction => "design_friction",
            SignalKind::MeetingContextLost => "meeting_context_lost",
            SignalKind::GithubFriction => "github_friction",
            SignalKind::GitHistoryIssues => "git_history_issues",
            SignalKind::DontKnow => "dont_know",
            SignalKind::NotSure => "not_sure",
            SignalKind::CantFind => "cant_find",
            SignalKind::CouldntFind => "couldnt_find",
            SignalKind::Searching => "searching",
            SignalKind::HowTo => "how_to",
            SignalKind::ExitCode => "exit_code",
            SignalKind::FileNotFound => "file_not_found",
            SignalKind::CommandNotFound => "command_not_found",
            SignalKind::PermissionDenied => "permission_denied",
            SignalKind::Timeout => "timeout",
            SignalKind::UnknownSkill => "unknown_skill",
            SignalKind::GenericError => "generic_error",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pattern hit: the kind plus a bounded context snippet.
///
/// Produced transiently by the extractor; never persisted standalone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalMatch {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub context: String,
}

// ============================================
// Per-session analysis
// ============================================

/// An API-level error recorded by the assistant runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub retry_attempt: u32,
    pub max_retries: u32,
}

/// A tool invocation that came back flagged as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub tool_use_id: String,
    /// Truncated result content (200 chars)
    pub content: String,
}

/// Everything extracted from one transcript. Immutable after `analyze`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionSummary {
    /// Transcript file stem
    pub id: String,
    /// Encoded project directory name the transcript lives under
    pub project: String,
    pub message_count: u32,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Cumulative turn duration reported by the runtime
    pub duration_ms: u64,
    pub api_errors: Vec<ApiError>,
    pub tool_errors: Vec<ToolError>,
    /// Unbounded counts per signal kind
    pub signal_counts: BTreeMap<SignalKind, u32>,
    /// Capped context snippets per signal kind
    pub signal_samples: BTreeMap<SignalKind, Vec<String>>,
    /// Tool-use counts by tool name
    pub tool_usage: BTreeMap<String, u32>,
    /// Set when the transcript could not be opened; the summary is still
    /// returned so one bad file never aborts a batch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================
// Cross-session aggregate
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiErrorStats {
    pub total: u32,
    pub by_code: BTreeMap<String, u32>,
    pub max_retries_seen: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolErrorStats {
    pub total: u32,
    pub samples: Vec<ToolError>,
}

/// Commutative reduction over a batch of [`SessionSummary`] values.
///
/// Counts are independent of session order and partitioning; only the
/// contents of the bounded sample lists vary with order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateReport {
    pub sessions_analyzed: usize,
    pub total_messages: u64,
    pub total_duration_ms: u64,
    pub api_errors: ApiErrorStats,
    pub tool_errors: ToolErrorStats,
    pub signal_counts: BTreeMap<SignalKind, u32>,
    pub signal_samples: BTreeMap<SignalKind, Vec<String>>,
    pub tool_usage: BTreeMap<String, u32>,
    pub projects: BTreeSet<String>,
}

// ============================================
// Environment context (invocation input)
// ============================================

/// Flags a repository scan can report about the working tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityFlag {
    HasLinter,
    HasFormatter,
    HasHooks,
    HasTests,
    HasAgentDocs,
    HasCi,
}

/// Repository capability flags; absent means false.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RepoCapabilities {
    pub has_linter: bool,
    pub has_formatter: bool,
    pub has_hooks: bool,
    pub has_tests: bool,
    pub has_agent_docs: bool,
    pub has_ci: bool,
}

impl RepoCapabilities {
    pub fn has(&self, flag: CapabilityFlag) -> bool {
        match flag {
            CapabilityFlag::HasLinter => self.has_linter,
            CapabilityFlag::HasFormatter => self.has_formatter,
            CapabilityFlag::HasHooks => self.has_hooks,
            CapabilityFlag::HasTests => self.has_tests,
            CapabilityFlag::HasAgentDocs => self.has_agent_docs,
            CapabilityFlag::HasCi => self.has_ci,
        }
    }
}

/// What the user already has, by inventory kind.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct InstalledInventory {
    pub mcps: Vec<String>,
    pub plugins: Vec<String>,
    pub cli_tools: Vec<String>,
    pub applications: Vec<String>,
}

impl InstalledInventory {
    /// Case-insensitive membership test over one inventory list.
    pub fn contains(list: &[String], name: &str) -> bool {
        list.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive lookup across all four inventories; returns the
    /// installed name as the user spelled it.
    pub fn find_anywhere(&self, name: &str) -> Option<&str> {
        self.mcps
            .iter()
            .chain(&self.plugins)
            .chain(&self.cli_tools)
            .chain(&self.applications)
            .find(|n| n.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}

/// Per-user preferences affecting exclusion.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Preferences {
    pub dismissed: Vec<String>,
    /// Candidate name -> tool the user chose instead
    pub alternatives: BTreeMap<String, String>,
}

/// Session-insights block carried in the invocation input.
///
/// When `enabled` is false the embedded report is ignored entirely.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionInsights {
    pub enabled: bool,
    #[serde(flatten)]
    pub report: AggregateReport,
}

/// Caller-supplied, read-only description of the user's environment.
///
/// Every field defaults so a partial or empty object deserializes
/// cleanly.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EnvironmentContext {
    pub installed: InstalledInventory,
    pub repo: RepoCapabilities,
    pub preferences: Preferences,
    pub session_insights: Option<SessionInsights>,
    /// Free-text description of what has been painful lately
    pub context: Option<String>,
}

impl EnvironmentContext {
    /// The aggregate report to use for gap detection, honoring `enabled`.
    pub fn report(&self) -> Option<&AggregateReport> {
        match &self.session_insights {
            Some(insights) if insights.enabled => Some(&insights.report),
            _ => None,
        }
    }

    /// Non-empty free-text context, if any.
    pub fn free_text(&self) -> Option<&str> {
        self.context.as_deref().filter(|s| !s.trim().is_empty())
    }
}

// ============================================
// Gaps
// ============================================

/// The six fixed lifecycle phases recommendations are grouped under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    Requirements,
    Planning,
    Implementation,
    Review,
    Testing,
    Documentation,
}

impl LifecyclePhase {
    pub const ALL: [LifecyclePhase; 6] = [
        LifecyclePhase::Requirements,
        LifecyclePhase::Planning,
        LifecyclePhase::Implementation,
        LifecyclePhase::Review,
        LifecyclePhase::Testing,
        LifecyclePhase::Documentation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecyclePhase::Requirements => "requirements",
            LifecyclePhase::Planning => "planning",
            LifecyclePhase::Implementation => "implementation",
            LifecyclePhase::Review => "review",
            LifecyclePhase::Testing => "testing",
            LifecyclePhase::Documentation => "documentation",
        }
    }
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unmet need supported by evidence (missing capability, absent tool,
/// or a signal count over its threshold).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GapTag {
    // Structural absences (diagnostic; never recommend on their own)
    NoWebSearch,
    NoDesignTools,
    NoIssueTracking,
    NoDiagramming,
    NoDocLookup,
    NoLinter,
    NoFormatter,
    NoGitHooks,
    NoTests,
    NoAgentsMd,
    NoMemory,
    // Evidence from knowledge-gap phrasing
    KnowledgeGaps,
    SearchDifficulties,
    FrequentLookups,
    // Evidence from error counters
    RecurringToolErrors,
    ApiInstability,
    // Evidence from friction signals
    OutdatedApiDocs,
    SearchFriction,
    ContextLoss,
    ConventionsUndocumented,
    RecurringLintErrors,
    UnguardedCi,
    RecurringRegressions,
    FlakyTestSuite,
    LostTaskContext,
    MissingDiagrams,
    ShallowReasoning,
    DesignMismatch,
    MeetingContextLoss,
    FrontendStruggles,
    GithubWorkflowFriction,
    MessyGitHistory,
    SlowFeedbackLoop,
}

/// Detected gaps per phase plus the merged signal totals behind them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GapReport {
    pub by_phase: BTreeMap<LifecyclePhase, BTreeSet<GapTag>>,
    /// Session counts merged additively with free-text signals; retained so
    /// explain mode can rank them without recomputing anything
    pub signal_totals: BTreeMap<SignalKind, u32>,
}

impl GapReport {
    pub fn contains(&self, phase: LifecyclePhase, tag: GapTag) -> bool {
        self.by_phase
            .get(&phase)
            .map(|tags| tags.contains(&tag))
            .unwrap_or(false)
    }
}

// ============================================
// Catalog
// ============================================

/// Inventory kind a catalog entry belongs to.
///
/// Only the first four correspond to installed-inventory lists; the rest
/// can never be "already installed".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ToolCategory {
    Mcp,
    Plugin,
    CliTool,
    Application,
    Practice,
    Model,
    #[serde(other)]
    #[default]
    Other,
}

impl ToolCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::Mcp => "mcp",
            ToolCategory::Plugin => "plugin",
            ToolCategory::CliTool => "cli-tool",
            ToolCategory::Application => "application",
            ToolCategory::Practice => "practice",
            ToolCategory::Model => "model",
            ToolCategory::Other => "other",
        }
    }
}

impl std::str::FromStr for ToolCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "mcp" => Ok(ToolCategory::Mcp),
            "plugin" => Ok(ToolCategory::Plugin),
            "cli-tool" => Ok(ToolCategory::CliTool),
            "application" => Ok(ToolCategory::Application),
            "practice" => Ok(ToolCategory::Practice),
            "model" => Ok(ToolCategory::Model),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pricing {
    pub model: String,
    pub details: String,
}

/// 1-5 scale ratings from the catalog author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ratings {
    pub setup_difficulty: Option<u8>,
    pub usefulness: Option<u8>,
}

/// One normalized catalog entry. Immutable once loaded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecommendationRecord {
    pub name: String,
    pub category: ToolCategory,
    pub tags: BTreeSet<String>,
    pub tagline: String,
    pub phase: Option<LifecyclePhase>,
    pub solves: String,
    pub pricing: Pricing,
    pub ratings: Ratings,
    /// Originating group/subgroup, for diagnostics only; never matched on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
}

// ============================================
// Match output
// ============================================

/// A catalog entry that fills a detected gap.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub name: String,
    pub category: ToolCategory,
    pub tagline: String,
    pub phase: LifecyclePhase,
    pub solves: String,
    pub reason: String,
    pub pricing: Pricing,
    /// The gap tag that justified this result
    pub source: GapTag,
}

/// A catalog entry excluded before scoring, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkipRecord {
    pub name: String,
    pub category: ToolCategory,
    pub reason: String,
}

/// One entry of the explain-mode signal ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalCount {
    pub signal: SignalKind,
    pub count: u32,
}

/// Explain-mode payload: signals ranked descending by count.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Explain {
    pub top_friction_signals: Vec<SignalCount>,
}

/// Final pipeline output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    pub total: usize,
    pub gaps_detected: BTreeMap<LifecyclePhase, BTreeSet<GapTag>>,
    pub recommendations_by_phase: BTreeMap<LifecyclePhase, Vec<MatchResult>>,
    pub skipped: Vec<SkipRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<Explain>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_kind_roundtrip() {
        let json = serde_json::to_string(&SignalKind::ApiHallucination).unwrap();
        assert_eq!(json, "\"api_hallucination\"");
        let back: SignalKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SignalKind::ApiHallucination);
        assert_eq!(SignalKind::ReExplaining.as_str(), "re_explaining");
    }

    #[test]
    fn test_environment_context_defaults() {
        let env: EnvironmentContext = serde_json::from_str("{}").unwrap();
        assert!(env.installed.mcps.is_empty());
        assert!(!env.repo.has_linter);
        assert!(env.report().is_none());
        assert!(env.free_text().is_none());
    }

    #[test]
    fn test_disabled_insights_are_ignored() {
        let env: EnvironmentContext = serde_json::from_str(
            r#"{"session_insights": {"enabled": false, "tool_errors": {"total": 9}}}"#,
        )
        .unwrap();
        assert!(env.report().is_none());

        let env: EnvironmentContext = serde_json::from_str(
            r#"{"session_insights": {"enabled": true, "tool_errors": {"total": 9}}}"#,
        )
        .unwrap();
        assert_eq!(env.report().unwrap().tool_errors.total, 9);
    }

    #[test]
    fn test_signal_counts_deserialize_as_map_keys() {
        let report: AggregateReport = serde_json::from_str(
            r#"{"signal_counts": {"api_hallucination": 3, "outdated_docs": 2}}"#,
        )
        .unwrap();
        assert_eq!(
            report.signal_counts.get(&SignalKind::ApiHallucination),
            Some(&3)
        );
    }

    #[test]
    fn test_inventory_lookup_is_case_insensitive() {
        let inv = InstalledInventory {
            mcps: vec!["EXA".to_string()],
            applications: vec!["Otter".to_string()],
            ..Default::default()
        };
        assert!(InstalledInventory::contains(&inv.mcps, "exa"));
        assert_eq!(inv.find_anywhere("otter"), Some("Otter"));
        assert!(inv.find_anywhere("figma").is_none());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("cli-tool".parse::<ToolCategory>(), Ok(ToolCategory::CliTool));
        assert!("gadget".parse::<ToolCategory>().is_err());
    }
}
