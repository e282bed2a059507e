use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Severity of a compiler diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" | "errors" => Severity::Error,
            _ => Severity::Warning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single compiler warning or error from a build log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Source file, relative to the build's source root
    pub file: Arc<str>,

    /// Source line; 0 when the compiler did not report one
    pub line: u32,

    /// Message text, shared with the build's message table
    pub message: Arc<str>,

    pub severity: Severity,

    /// Log file the diagnostic was extracted from
    pub log: Arc<str>,

    /// Line inside `log`
    pub log_line: u32,

    /// Not attributable to an occurrence in the parent build
    pub is_new: bool,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// One row of the grouped view.
///
/// A joined path ending in `/` is a directory rollup whose members may span
/// several files; otherwise every member shares the same file. A leaf whose
/// file is the root itself has the single empty segment `[""]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayGroup<'a> {
    pub path: Vec<&'a str>,
    pub diagnostics: Vec<&'a Diagnostic>,
}

impl DisplayGroup<'_> {
    pub fn is_dir(&self) -> bool {
        self.path.len() > 1 && self.path.last().is_some_and(|s| s.is_empty())
    }

    /// Path joined with `/`; directory rollups end in `/`
    pub fn display_path(&self) -> String {
        self.path.join("/")
    }
}

/// Visibility toggle and live count for one message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MessageTypeFilter {
    pub active: bool,
    pub count: usize,
}

impl Default for MessageTypeFilter {
    fn default() -> Self {
        MessageTypeFilter {
            active: true,
            count: 0,
        }
    }
}

/// Message type table, keyed and iterated by message text
pub type MessageTypes = BTreeMap<Arc<str>, MessageTypeFilter>;

/// Summary statistics over a decoded build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub warnings: usize,
    pub errors: usize,
    pub new_warnings: usize,
    pub new_errors: usize,
}

impl BuildSummary {
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let mut summary = BuildSummary::default();
        for d in diagnostics {
            match (d.severity, d.is_new) {
                (Severity::Error, true) => {
                    summary.errors += 1;
                    summary.new_errors += 1;
                }
                (Severity::Error, false) => summary.errors += 1,
                (Severity::Warning, true) => {
                    summary.warnings += 1;
                    summary.new_warnings += 1;
                }
                (Severity::Warning, false) => summary.warnings += 1,
            }
        }
        summary
    }
}
