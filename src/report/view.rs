use serde::Serialize;

use crate::engine::ViewFilter;
use crate::report::diagnostic::{BuildSummary, Diagnostic, DisplayGroup, MessageTypes, Severity};

/// One rendering of a message view
#[derive(Debug, Clone, Serialize)]
pub struct ViewReport<'a> {
    /// buildmsg version
    pub version: String,

    /// When the view was computed
    pub timestamp: String,

    /// Directory prefix the groups are relative to
    pub root: &'a str,

    pub filter: ViewFilter,

    /// Totals over the whole build, regardless of filters
    pub summary: BuildSummary,

    /// Visible diagnostics, folded by directory
    pub groups: Vec<DisplayGroup<'a>>,

    /// Message type toggles with counts for this view
    pub message_types: &'a MessageTypes,
}

impl<'a> ViewReport<'a> {
    /// Every diagnostic shown, in display order
    pub fn visible(&self) -> impl Iterator<Item = &'a Diagnostic> + '_ {
        self.groups.iter().flat_map(|g| g.diagnostics.iter().copied())
    }

    /// Check if any shown diagnostic is new and at or above a severity
    pub fn has_new_at_or_above(&self, threshold: Severity) -> bool {
        self.visible().any(|d| d.is_new && d.severity >= threshold)
    }
}
