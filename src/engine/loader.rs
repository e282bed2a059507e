use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::engine::matcher;
use crate::report::diagnostic::{Diagnostic, Severity};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid build result {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{file}: log index {index} out of range ({len} logs)")]
    LogIndex { file: String, index: usize, len: usize },

    #[error("{file}: message index {index} out of range ({len} messages)")]
    MessageIndex { file: String, index: usize, len: usize },

    #[error("parent build {file}: message index {index} out of range ({len} messages)")]
    ParentMessageIndex { file: String, index: usize, len: usize },
}

impl LoadError {
    /// Whether the parent document, not the current one, is malformed
    pub fn in_parent(&self) -> bool {
        matches!(self, LoadError::ParentMessageIndex { .. })
    }
}

/// `[logIndex, logLine, sourceLine, messageIndex]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RawDiagnostic(pub usize, pub u32, pub u32, pub usize);

/// A `build-result.json` document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildResult {
    /// Log file names
    #[serde(default)]
    pub files: Vec<String>,

    /// Message text table
    #[serde(default)]
    pub messages: Vec<String>,

    #[serde(default)]
    pub warnings: BTreeMap<String, Vec<RawDiagnostic>>,

    #[serde(default)]
    pub errors: BTreeMap<String, Vec<RawDiagnostic>>,
}

impl BuildResult {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let result = Self::from_json(&text).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            "Read {}: {} files with warnings, {} with errors, {} messages",
            path.display(),
            result.warnings.len(),
            result.errors.len(),
            result.messages.len()
        );
        Ok(result)
    }

    fn group(&self, severity: Severity) -> &BTreeMap<String, Vec<RawDiagnostic>> {
        match severity {
            Severity::Warning => &self.warnings,
            Severity::Error => &self.errors,
        }
    }
}

/// Read the current build and, if given, its parent concurrently
pub fn read_pair(
    current: &Path,
    parent: Option<&Path>,
) -> Result<(BuildResult, BuildResult), LoadError> {
    let (own, parent) = rayon::join(
        || BuildResult::read(current),
        || parent.map(BuildResult::read).transpose(),
    );
    Ok((own?, parent?.unwrap_or_default()))
}

/// Expand the compact tables into diagnostics, classify each against the
/// parent build and sort by `(file, line)`.
pub fn decode(own: &BuildResult, parent: &BuildResult) -> Result<Vec<Diagnostic>, LoadError> {
    let logs: Vec<Arc<str>> = own.files.iter().map(|f| Arc::from(f.as_str())).collect();
    let messages: Vec<Arc<str>> = own.messages.iter().map(|m| Arc::from(m.as_str())).collect();

    let mut diagnostics = Vec::new();
    for severity in [Severity::Warning, Severity::Error] {
        for (file, raw) in own.group(severity) {
            let file: Arc<str> = Arc::from(file.as_str());
            let start = diagnostics.len();

            let mut current: BTreeMap<Arc<str>, Vec<usize>> = BTreeMap::new();
            for &RawDiagnostic(log_index, log_line, line, message_index) in raw {
                let log = logs.get(log_index).ok_or_else(|| LoadError::LogIndex {
                    file: file.to_string(),
                    index: log_index,
                    len: logs.len(),
                })?;
                let message =
                    messages
                        .get(message_index)
                        .ok_or_else(|| LoadError::MessageIndex {
                            file: file.to_string(),
                            index: message_index,
                            len: messages.len(),
                        })?;
                current
                    .entry(message.clone())
                    .or_default()
                    .push(diagnostics.len());
                diagnostics.push(Diagnostic {
                    file: file.clone(),
                    line,
                    message: message.clone(),
                    severity,
                    log: log.clone(),
                    log_line,
                    is_new: false,
                });
            }

            let mut old: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
            for &RawDiagnostic(_, _, line, message_index) in
                parent.group(severity).get(&*file).into_iter().flatten()
            {
                let message = parent.messages.get(message_index).ok_or_else(|| {
                    LoadError::ParentMessageIndex {
                        file: file.to_string(),
                        index: message_index,
                        len: parent.messages.len(),
                    }
                })?;
                old.entry(message.as_str()).or_default().push(line);
            }

            for (message, members) in &current {
                let reference = old.get(&**message).map(Vec::as_slice);
                matcher::mark_new(reference, members, &mut diagnostics);
            }
            debug!(
                "{} {}: {} diagnostics, {} new",
                severity,
                file,
                diagnostics.len() - start,
                diagnostics[start..].iter().filter(|d| d.is_new).count()
            );
        }
    }

    diagnostics.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
    info!(
        "Decoded {} diagnostics ({} new)",
        diagnostics.len(),
        diagnostics.iter().filter(|d| d.is_new).count()
    );
    Ok(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT: &str = r#"{
        "files": ["jam.log"],
        "messages": ["X", "Y", "Z", "unused"],
        "warnings": {
            "a/c.cpp": [[0, 20, 12, 0]],
            "a/b.cpp": [[0, 10, 10, 0], [0, 11, 50, 1], [0, 12, 10, 2], [0, 13, 200, 2]]
        },
        "errors": {
            "a/b.cpp": [[0, 30, 5, 1]]
        }
    }"#;

    const PARENT: &str = r#"{
        "files": ["old.log"],
        "messages": ["Z", "Y"],
        "warnings": {
            "a/b.cpp": [[0, 1, 52, 1], [0, 2, 11, 0]]
        }
    }"#;

    fn find<'a>(diagnostics: &'a [Diagnostic], file: &str, line: u32) -> &'a Diagnostic {
        diagnostics
            .iter()
            .find(|d| &*d.file == file && d.line == line)
            .unwrap()
    }

    #[test]
    fn test_decode_classifies_against_parent() {
        let own = BuildResult::from_json(CURRENT).unwrap();
        let parent = BuildResult::from_json(PARENT).unwrap();
        let diagnostics = decode(&own, &parent).unwrap();

        assert_eq!(diagnostics.len(), 6);
        // X never appears in the parent
        let xs: Vec<_> = diagnostics.iter().filter(|d| &*d.message == "X").collect();
        assert_eq!(xs.len(), 2);
        assert!(xs.iter().all(|d| d.is_new));
        // Y at 50 matches Y at 52
        assert!(!find(&diagnostics, "a/b.cpp", 50).is_new);
        // Z at 10 pairs with 11, Z at 200 is new
        assert!(find(&diagnostics, "a/b.cpp", 200).is_new);
        // errors are only matched against errors
        assert!(find(&diagnostics, "a/b.cpp", 5).is_new);
        assert!(find(&diagnostics, "a/b.cpp", 5).is_error());

        let z_at_10: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.line == 10 && &*d.message == "Z")
            .collect();
        assert_eq!(z_at_10.len(), 1);
        assert!(!z_at_10[0].is_new);
    }

    #[test]
    fn test_decode_sorts_by_file_and_line() {
        let own = BuildResult::from_json(CURRENT).unwrap();
        let diagnostics = decode(&own, &BuildResult::default()).unwrap();
        let order: Vec<(&str, u32)> = diagnostics.iter().map(|d| (&*d.file, d.line)).collect();
        assert_eq!(
            order,
            vec![
                ("a/b.cpp", 5),
                ("a/b.cpp", 10),
                ("a/b.cpp", 10),
                ("a/b.cpp", 50),
                ("a/b.cpp", 200),
                ("a/c.cpp", 12),
            ]
        );
        assert!(diagnostics.iter().all(|d| d.is_new));
        assert_eq!(&*diagnostics[0].log, "jam.log");
        assert_eq!(diagnostics[0].log_line, 30);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let own = BuildResult::from_json("{}").unwrap();
        assert!(decode(&own, &BuildResult::default()).unwrap().is_empty());
    }

    #[test]
    fn test_bad_message_index() {
        let own = BuildResult::from_json(
            r#"{"files": ["jam.log"], "messages": [], "warnings": {"a.cpp": [[0, 1, 1, 3]]}}"#,
        )
        .unwrap();
        let err = decode(&own, &BuildResult::default()).unwrap_err();
        assert!(matches!(err, LoadError::MessageIndex { index: 3, len: 0, .. }));
    }

    #[test]
    fn test_bad_parent_message_index() {
        let own = BuildResult::from_json(
            r#"{"files": ["jam.log"], "messages": ["X"], "warnings": {"a.cpp": [[0, 1, 1, 0]]}}"#,
        )
        .unwrap();
        let parent = BuildResult::from_json(
            r#"{"files": ["jam.log"], "messages": ["X"], "warnings": {"a.cpp": [[0, 1, 1, 7]]}}"#,
        )
        .unwrap();
        let err = decode(&own, &parent).unwrap_err();
        assert!(matches!(err, LoadError::ParentMessageIndex { index: 7, len: 1, .. }));
        assert!(err.in_parent());
        assert!(err.to_string().starts_with("parent build a.cpp"));
    }

    #[test]
    fn test_bad_log_index() {
        let own = BuildResult::from_json(
            r#"{"messages": ["X"], "errors": {"a.cpp": [[2, 1, 1, 0]]}}"#,
        )
        .unwrap();
        let err = decode(&own, &BuildResult::default()).unwrap_err();
        assert!(matches!(err, LoadError::LogIndex { index: 2, .. }));
    }
}
