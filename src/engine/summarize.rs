use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::cli::SummaryArgs;
use crate::engine::build_walker::{self, RESULT_FILE};
use crate::engine::loader;
use crate::report::diagnostic::BuildSummary;
use crate::report::summary::{ArchSummary, BuildDirReport};

/// Classifies every architecture of a build directory against the parent
/// build directory.
pub struct BuildDirSummarizer {
    build_dir: PathBuf,
    parent_dir: Option<PathBuf>,
    max_depth: usize,
}

impl BuildDirSummarizer {
    pub fn new(args: &SummaryArgs) -> Result<Self> {
        let build_dir = std::fs::canonicalize(&args.build_dir)
            .with_context(|| format!("cannot open {}", args.build_dir.display()))?;
        let parent_dir = args
            .parent_dir
            .as_ref()
            .map(|p| {
                std::fs::canonicalize(p).with_context(|| format!("cannot open {}", p.display()))
            })
            .transpose()?;

        Ok(BuildDirSummarizer {
            build_dir,
            parent_dir,
            max_depth: args.max_depth,
        })
    }

    pub fn run(&self) -> Result<BuildDirReport> {
        let start = Instant::now();

        info!("Looking for {} in {}", RESULT_FILE, self.build_dir.display());
        let results = build_walker::walk_results(&self.build_dir, Some(self.max_depth))?;
        info!("Found {} architectures", results.len());

        let arches = results
            .par_iter()
            .map(|r| -> Result<ArchSummary> {
                let parent = self
                    .parent_dir
                    .as_ref()
                    .map(|dir| dir.join(&r.arch).join(RESULT_FILE))
                    .filter(|p| p.is_file());
                if parent.is_none() {
                    debug!("No parent result for '{}'", r.arch.display());
                }

                let (own, parent_result) = loader::read_pair(&r.path, parent.as_deref())?;
                let diagnostics = loader::decode(&own, &parent_result)
                    .with_context(|| format!("cannot decode {}", r.path.display()))?;

                Ok(ArchSummary {
                    arch: r.arch.clone(),
                    has_parent: parent.is_some(),
                    counts: BuildSummary::from_diagnostics(&diagnostics),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BuildDirReport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            build_dir: self.build_dir.clone(),
            parent_dir: self.parent_dir.clone(),
            duration_ms: start.elapsed().as_millis() as u64,
            arches,
        })
    }
}
