//! Static matching tables: which detected gaps each known tool fills,
//! and which installed tools count as equivalent to a candidate.
//!
//! Every entry here keys on evidence-derived gap tags only. Structural
//! absences (no linter configured, no issue tracker installed) are
//! reported in the gap summary but never justify a recommendation on
//! their own, so a user with zero observed friction gets zero
//! recommendations.

use crate::types::{GapTag, LifecyclePhase};

/// One gap a tool can fill, with the evidence sentence shown to the user.
pub struct GapFill {
    pub phase: LifecyclePhase,
    pub tag: GapTag,
    pub reason: &'static str,
}

/// Tool name -> the gaps it fills, in priority order. The first entry
/// whose (phase, tag) is present in the gap report wins and supplies
/// the reported phase, tag, and reason.
pub static TOOL_GAP_MAP: &[(&str, &[GapFill])] = &[
    (
        "context7",
        &[
            GapFill {
                phase: LifecyclePhase::Implementation,
                tag: GapTag::OutdatedApiDocs,
                reason: "Sessions show the model citing APIs that do not exist or are out of date",
            },
            GapFill {
                phase: LifecyclePhase::Implementation,
                tag: GapTag::KnowledgeGaps,
                reason: "Repeated \"I don't know\" moments suggest missing library documentation",
            },
            GapFill {
                phase: LifecyclePhase::Documentation,
                tag: GapTag::FrequentLookups,
                reason: "Frequent how-to questions indicate documentation is being looked up by hand",
            },
        ],
    ),
    (
        "supermemory",
        &[
            GapFill {
                phase: LifecyclePhase::Documentation,
                tag: GapTag::ContextLoss,
                reason: "Sessions show context being forgotten and re-explained across conversations",
            },
            GapFill {
                phase: LifecyclePhase::Documentation,
                tag: GapTag::FrequentLookups,
                reason: "The same information is being looked up again and again",
            },
        ],
    ),
    (
        "exa",
        &[GapFill {
            phase: LifecyclePhase::Requirements,
            tag: GapTag::SearchFriction,
            reason: "Sessions show repeated requests to search the web for current information",
        }],
    ),
    (
        "agents-md-structure",
        &[GapFill {
            phase: LifecyclePhase::Documentation,
            tag: GapTag::ConventionsUndocumented,
            reason: "The assistant keeps asking about project conventions that are not written down",
        }],
    ),
    (
        "oxlint",
        &[GapFill {
            phase: LifecyclePhase::Implementation,
            tag: GapTag::RecurringLintErrors,
            reason: "Lint errors keep surfacing during sessions",
        }],
    ),
    (
        "biome",
        &[GapFill {
            phase: LifecyclePhase::Implementation,
            tag: GapTag::RecurringLintErrors,
            reason: "Lint errors keep surfacing during sessions",
        }],
    ),
    (
        "lefthook",
        &[GapFill {
            phase: LifecyclePhase::Review,
            tag: GapTag::UnguardedCi,
            reason: "CI failures and forgotten lint runs suggest nothing guards commits locally",
        }],
    ),
    (
        "pre-commit-hooks",
        &[GapFill {
            phase: LifecyclePhase::Review,
            tag: GapTag::UnguardedCi,
            reason: "CI failures and forgotten lint runs suggest nothing guards commits locally",
        }],
    ),
    (
        "stagehand-e2e",
        &[
            GapFill {
                phase: LifecyclePhase::Testing,
                tag: GapTag::RecurringRegressions,
                reason: "Regressions keep slipping through without end-to-end coverage",
            },
            GapFill {
                phase: LifecyclePhase::Testing,
                tag: GapTag::RecurringToolErrors,
                reason: "A high tool-error rate suggests changes are not being exercised before landing",
            },
            GapFill {
                phase: LifecyclePhase::Testing,
                tag: GapTag::FlakyTestSuite,
                reason: "Flaky tests are eroding trust in the suite",
            },
        ],
    ),
    (
        "test-first-debugging",
        &[GapFill {
            phase: LifecyclePhase::Testing,
            tag: GapTag::RecurringRegressions,
            reason: "Fixes keep breaking previously working behavior",
        }],
    ),
    (
        "linear",
        &[GapFill {
            phase: LifecyclePhase::Planning,
            tag: GapTag::LostTaskContext,
            reason: "Sessions show tasks being forgotten or tracked ad hoc",
        }],
    ),
    (
        "beads",
        &[GapFill {
            phase: LifecyclePhase::Planning,
            tag: GapTag::LostTaskContext,
            reason: "Sessions show tasks being forgotten or tracked ad hoc",
        }],
    ),
    (
        "excalidraw",
        &[GapFill {
            phase: LifecyclePhase::Planning,
            tag: GapTag::MissingDiagrams,
            reason: "Sessions call for diagrams that never get drawn",
        }],
    ),
    (
        "reasoning-models",
        &[GapFill {
            phase: LifecyclePhase::Planning,
            tag: GapTag::ShallowReasoning,
            reason: "Answers are repeatedly too shallow or miss edge cases",
        }],
    ),
    (
        "figma",
        &[GapFill {
            phase: LifecyclePhase::Requirements,
            tag: GapTag::DesignMismatch,
            reason: "Implementations keep diverging from the intended design",
        }],
    ),
    (
        "pencil",
        &[GapFill {
            phase: LifecyclePhase::Requirements,
            tag: GapTag::DesignMismatch,
            reason: "Implementations keep diverging from the intended design",
        }],
    ),
    (
        "granola",
        &[GapFill {
            phase: LifecyclePhase::Requirements,
            tag: GapTag::MeetingContextLoss,
            reason: "Decisions made in meetings are getting lost before they reach the code",
        }],
    ),
    (
        "frontend-models",
        &[GapFill {
            phase: LifecyclePhase::Implementation,
            tag: GapTag::FrontendStruggles,
            reason: "CSS and UI work is a recurring source of friction",
        }],
    ),
    (
        "github",
        &[GapFill {
            phase: LifecyclePhase::Review,
            tag: GapTag::GithubWorkflowFriction,
            reason: "PR and review workflow keeps causing friction in sessions",
        }],
    ),
    (
        "atomic-commits",
        &[GapFill {
            phase: LifecyclePhase::Review,
            tag: GapTag::MessyGitHistory,
            reason: "Git history issues keep coming up during review",
        }],
    ),
    (
        "fzf",
        &[GapFill {
            phase: LifecyclePhase::Implementation,
            tag: GapTag::SearchDifficulties,
            reason: "Sessions show repeated failures to find code or files",
        }],
    ),
    (
        "nia",
        &[GapFill {
            phase: LifecyclePhase::Implementation,
            tag: GapTag::SearchDifficulties,
            reason: "Sessions show repeated failures to find code or files",
        }],
    ),
];

/// Candidate -> installed tools that make it redundant. Checked across
/// every inventory list, case-insensitively.
pub static EQUIVALENT_TOOLS: &[(&str, &[&str])] = &[
    ("granola", &["otter", "fathom", "fireflies"]),
    ("raycast", &["alfred"]),
    ("oxlint", &["eslint", "biome"]),
    ("biome", &["eslint", "prettier"]),
    ("lefthook", &["husky", "pre-commit"]),
    ("pre-commit-hooks", &["lefthook", "husky"]),
];

/// The gap-fill entries for a tool name, if it is a known tool.
pub fn gap_fills(name: &str) -> Option<&'static [GapFill]> {
    TOOL_GAP_MAP
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, fills)| *fills)
}

/// Installed tools equivalent to the named candidate.
pub fn equivalents(name: &str) -> &'static [&'static str] {
    EQUIVALENT_TOOLS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, alts)| *alts)
        .unwrap_or(&[])
}
