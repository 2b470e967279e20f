//! Matching: turn a catalog plus a gap report into recommendations.
//!
//! The flow per catalog entry is a strict precedence chain:
//!
//! 1. category filter (filtered entries vanish silently),
//! 2. dismissed by the user (recorded in `skipped`),
//! 3. already installed under the entry's category (recorded),
//! 4. an equivalent tool is installed anywhere (recorded),
//! 5. gap fill: the first table entry whose (phase, tag) appears in the
//!    gap report produces a recommendation; no hit means the entry is
//!    dropped silently.
//!
//! A recommendation therefore always carries the specific evidence tag
//! that justified it.

pub mod tables;

use crate::catalog::Catalog;
use crate::types::{
    EnvironmentContext, GapReport, LifecyclePhase, MatchResult, RecommendationRecord,
    SkipRecord, ToolCategory,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Matched recommendations grouped by phase, plus the exclusion log.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub by_phase: BTreeMap<LifecyclePhase, Vec<MatchResult>>,
    pub skipped: Vec<SkipRecord>,
    pub total: usize,
}

/// Why an entry was excluded before gap matching.
enum Exclusion {
    Dismissed(Option<String>),
    Installed,
    Equivalent(String),
}

/// Match every catalog entry against the gap report.
///
/// Results within a phase are sorted by tool name rather than catalog
/// traversal order, so output is stable across directory layouts and
/// filesystems.
pub fn match_catalog(
    catalog: &Catalog,
    gaps: &GapReport,
    env: &EnvironmentContext,
    category: Option<ToolCategory>,
) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();

    for record in catalog.entries() {
        if let Some(filter) = category {
            if record.category != filter {
                continue;
            }
        }

        if let Some(exclusion) = excluded(record, env) {
            outcome.skipped.push(SkipRecord {
                name: record.name.clone(),
                category: record.category,
                reason: match exclusion {
                    Exclusion::Dismissed(Some(alt)) => {
                        format!("dismissed in favor of {alt}")
                    }
                    Exclusion::Dismissed(None) => "dismissed by user".to_string(),
                    Exclusion::Installed => "already installed".to_string(),
                    Exclusion::Equivalent(installed) => {
                        format!("equivalent tool {installed} already installed")
                    }
                },
            });
            continue;
        }

        if let Some(result) = fill_gap(record, gaps) {
            outcome.total += 1;
            outcome.by_phase.entry(result.phase).or_default().push(result);
        }
    }

    for results in outcome.by_phase.values_mut() {
        results.sort_by(|a, b| a.name.cmp(&b.name));
    }

    debug!(
        matched = outcome.total,
        skipped = outcome.skipped.len(),
        "catalog matched against gap report"
    );
    outcome
}

/// First exclusion rule that applies, in precedence order.
fn excluded(record: &RecommendationRecord, env: &EnvironmentContext) -> Option<Exclusion> {
    let name = &record.name;

    if env
        .preferences
        .dismissed
        .iter()
        .any(|d| d.eq_ignore_ascii_case(name))
    {
        let alternative = env
            .preferences
            .alternatives
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone());
        return Some(Exclusion::Dismissed(alternative));
    }

    let inventory = match record.category {
        ToolCategory::Mcp => Some(&env.installed.mcps),
        ToolCategory::Plugin => Some(&env.installed.plugins),
        ToolCategory::CliTool => Some(&env.installed.cli_tools),
        ToolCategory::Application => Some(&env.installed.applications),
        _ => None,
    };
    if let Some(list) = inventory {
        if crate::types::InstalledInventory::contains(list, name) {
            return Some(Exclusion::Installed);
        }
    }

    for alt in tables::equivalents(name) {
        if let Some(installed) = env.installed.find_anywhere(alt) {
            return Some(Exclusion::Equivalent(installed.to_string()));
        }
    }

    None
}

/// First table entry for this tool whose gap is present in the report.
fn fill_gap(record: &RecommendationRecord, gaps: &GapReport) -> Option<MatchResult> {
    let fills = tables::gap_fills(&record.name)?;
    let fill = fills.iter().find(|f| gaps.contains(f.phase, f.tag))?;

    Some(MatchResult {
        name: record.name.clone(),
        category: record.category,
        tagline: record.tagline.clone(),
        phase: fill.phase,
        solves: record.solves.clone(),
        reason: fill.reason.to_string(),
        pricing: record.pricing.clone(),
        source: fill.tag,
    })
}
