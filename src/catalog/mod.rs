//! Catalog loading: one YAML file per recommendation, discovered
//! recursively under a directory tree.
//!
//! The directory layout carries meaning only as provenance (an entry's
//! parent directory name is recorded for diagnostics); matching never
//! looks at file paths. `schema.yaml`, `accounts.yaml`, and anything
//! under a `pending` path segment are skipped.

use crate::error::Result;
use crate::types::{LifecyclePhase, Pricing, Ratings, RecommendationRecord, ToolCategory};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// An immutable, loaded set of recommendation records.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<RecommendationRecord>,
}

impl Catalog {
    pub fn new(entries: Vec<RecommendationRecord>) -> Self {
        Catalog { entries }
    }

    pub fn entries(&self) -> &[RecommendationRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load every `*.yaml` under `dir`, recursively.
    ///
    /// A missing directory yields an empty catalog rather than an error;
    /// individual files that fail to parse or lack a `name` are dropped
    /// with a warning so one bad file never poisons the run.
    pub fn load(dir: &Path) -> Result<Catalog> {
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "catalog directory not found, using empty catalog");
            return Ok(Catalog::default());
        }

        let pattern = dir.join("**").join("*.yaml");
        let pattern = pattern.to_string_lossy().into_owned();
        let paths = glob::glob(&pattern).map_err(|e| {
            crate::error::Error::Config(format!("bad catalog glob {pattern}: {e}"))
        })?;

        let mut entries = Vec::new();
        for path in paths.flatten() {
            if is_skipped(&path) {
                continue;
            }
            match load_entry(&path) {
                Ok(Some(record)) => entries.push(record),
                Ok(None) => warn!(file = %path.display(), "catalog entry has no name, dropped"),
                Err(e) => warn!(file = %path.display(), error = %e, "failed to parse catalog entry"),
            }
        }

        debug!(count = entries.len(), dir = %dir.display(), "catalog loaded");
        Ok(Catalog { entries })
    }
}

fn is_skipped(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some("schema.yaml") | Some("accounts.yaml") => return true,
        _ => {}
    }
    path.components()
        .any(|c| c.as_os_str().to_str().is_some_and(|s| s.contains("pending")))
}

/// Raw on-disk shape. Older files use `sdlc_phase`, newer ones `phase`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEntry {
    name: Option<String>,
    category: ToolCategory,
    tags: BTreeSet<String>,
    tagline: String,
    #[serde(alias = "sdlc_phase")]
    phase: Option<LifecyclePhase>,
    solves: String,
    pricing: Pricing,
    ratings: Ratings,
}

fn load_entry(path: &Path) -> Result<Option<RecommendationRecord>> {
    let text = std::fs::read_to_string(path)?;
    let raw: RawEntry = serde_yaml_ng::from_str(&text)?;

    let Some(name) = raw.name.filter(|n| !n.trim().is_empty()) else {
        return Ok(None);
    };

    let provenance = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned());

    Ok(Some(RecommendationRecord {
        name,
        category: raw.category,
        tags: raw.tags,
        tagline: raw.tagline,
        phase: raw.phase,
        solves: raw.solves,
        pricing: raw.pricing,
        ratings: raw.ratings,
        provenance,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_yaml(dir: &Path, rel: &str, body: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_load_missing_dir_is_empty() {
        let catalog = Catalog::load(Path::new("/nonexistent/recs")).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_recursive_with_provenance() {
        let dir = TempDir::new().unwrap();
        write_yaml(
            dir.path(),
            "mcps/context7.yaml",
            "name: context7\ncategory: mcp\ntagline: Live docs lookup\nphase: implementation\nsolves: Stale API knowledge\n",
        );
        write_yaml(
            dir.path(),
            "practices/deep/atomic-commits.yaml",
            "name: atomic-commits\ncategory: practice\nsdlc_phase: review\n",
        );

        let catalog = Catalog::load(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);

        let ctx7 = catalog
            .entries()
            .iter()
            .find(|r| r.name == "context7")
            .unwrap();
        assert_eq!(ctx7.category, ToolCategory::Mcp);
        assert_eq!(ctx7.phase, Some(LifecyclePhase::Implementation));
        assert_eq!(ctx7.provenance.as_deref(), Some("mcps"));

        // sdlc_phase alias accepted
        let commits = catalog
            .entries()
            .iter()
            .find(|r| r.name == "atomic-commits")
            .unwrap();
        assert_eq!(commits.phase, Some(LifecyclePhase::Review));
        assert_eq!(commits.provenance.as_deref(), Some("deep"));
    }

    #[test]
    fn test_skips_schema_accounts_and_pending() {
        let dir = TempDir::new().unwrap();
        write_yaml(dir.path(), "schema.yaml", "name: schema\n");
        write_yaml(dir.path(), "accounts.yaml", "name: accounts\n");
        write_yaml(dir.path(), "pending/new-tool.yaml", "name: new-tool\n");
        write_yaml(dir.path(), "mcps/exa.yaml", "name: exa\ncategory: mcp\n");

        let catalog = Catalog::load(dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].name, "exa");
    }

    #[test]
    fn test_bad_files_are_dropped_not_fatal() {
        let dir = TempDir::new().unwrap();
        write_yaml(dir.path(), "broken.yaml", "name: [unclosed\n");
        write_yaml(dir.path(), "nameless.yaml", "tagline: no name here\n");
        write_yaml(dir.path(), "good.yaml", "name: linear\ncategory: mcp\n");

        let catalog = Catalog::load(dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].name, "linear");
    }

    #[test]
    fn test_unknown_category_maps_to_other() {
        let dir = TempDir::new().unwrap();
        write_yaml(
            dir.path(),
            "misc/thing.yaml",
            "name: thing\ncategory: browser-extension\n",
        );

        let catalog = Catalog::load(dir.path()).unwrap();
        assert_eq!(catalog.entries()[0].category, ToolCategory::Other);
    }
}
