use std::path::PathBuf;

use serde::Serialize;

use crate::report::diagnostic::BuildSummary;

/// Totals for one architecture of a build
#[derive(Debug, Clone, Serialize)]
pub struct ArchSummary {
    /// Directory relative to the build root
    pub arch: PathBuf,

    /// Whether a parent result was found for this architecture
    pub has_parent: bool,

    #[serde(flatten)]
    pub counts: BuildSummary,
}

/// Totals for every architecture of a build directory
#[derive(Debug, Clone, Serialize)]
pub struct BuildDirReport {
    pub version: String,
    pub timestamp: String,
    pub build_dir: PathBuf,
    pub parent_dir: Option<PathBuf>,
    pub duration_ms: u64,
    pub arches: Vec<ArchSummary>,
}

impl BuildDirReport {
    pub fn total(&self) -> BuildSummary {
        let mut total = BuildSummary::default();
        for a in &self.arches {
            total.warnings += a.counts.warnings;
            total.errors += a.counts.errors;
            total.new_warnings += a.counts.new_warnings;
            total.new_errors += a.counts.new_errors;
        }
        total
    }
}
