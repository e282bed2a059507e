use std::path::{Path, PathBuf};

use anyhow::Result;
use ignore::WalkBuilder;
use tracing::debug;

pub const RESULT_FILE: &str = "build-result.json";

/// One architecture's result inside a build directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchResult {
    /// Directory relative to the build root, e.g. `x86_64`
    pub arch: PathBuf,
    /// Absolute path of the result document
    pub path: PathBuf,
}

/// Walk a build directory and collect every `build-result.json`.
///
/// - Does not apply .gitignore rules (build trees are usually ignored)
/// - Skips hidden directories
/// - Results are sorted by architecture path
pub fn walk_results(root: &Path, max_depth: Option<usize>) -> Result<Vec<ArchResult>> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .follow_links(false)
        .max_depth(max_depth);

    let mut results = Vec::new();

    for entry in builder.build() {
        match entry {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    continue;
                }
                if entry.file_name() != RESULT_FILE {
                    continue;
                }

                let path = entry.path().to_path_buf();
                let arch = path
                    .parent()
                    .and_then(|dir| dir.strip_prefix(root).ok())
                    .map(Path::to_path_buf)
                    .unwrap_or_default();

                debug!("Found {} for '{}'", path.display(), arch.display());
                results.push(ArchResult { arch, path });
            }
            Err(e) => {
                debug!("Walk error: {}", e);
            }
        }
    }

    results.sort_by(|a, b| a.arch.cmp(&b.arch));
    Ok(results)
}
