pub mod aggregate;
pub mod build_walker;
pub mod loader;
pub mod matcher;
pub mod navigation;
pub mod options;
pub mod summarize;

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, info};

use crate::report::diagnostic::{BuildSummary, Diagnostic, MessageTypeFilter, MessageTypes};
use crate::report::view::ViewReport;

pub use aggregate::ViewFilter;
use loader::{BuildResult, LoadError};
use navigation::RootPath;

/// State behind one grouped diagnostic view: the decoded build, its message
/// type toggles, the navigation root and the error/new toggles.
#[derive(Debug, Clone, Default)]
pub struct MessageView {
    diagnostics: Vec<Diagnostic>,
    types: MessageTypes,
    root: RootPath,
    filter: ViewFilter,
}

impl MessageView {
    /// Decode a build against its parent and reset all toggles
    pub fn load(own: &BuildResult, parent: &BuildResult) -> Result<Self, LoadError> {
        let diagnostics = loader::decode(own, parent)?;
        let types: MessageTypes = own
            .messages
            .iter()
            .map(|m| (Arc::from(m.as_str()), MessageTypeFilter::default()))
            .collect();

        info!(
            "Loaded {} diagnostics, {} message types",
            diagnostics.len(),
            types.len()
        );

        Ok(MessageView {
            diagnostics,
            types,
            root: RootPath::default(),
            filter: ViewFilter::default(),
        })
    }

    pub fn types(&self) -> &MessageTypes {
        &self.types
    }

    pub fn root(&self) -> &RootPath {
        &self.root
    }

    pub fn filter(&self) -> ViewFilter {
        self.filter
    }

    pub fn summary(&self) -> BuildSummary {
        BuildSummary::from_diagnostics(&self.diagnostics)
    }

    pub fn set_root(&mut self, root: impl Into<String>) {
        self.root = RootPath::new(root);
    }

    pub fn set_only_error(&mut self, only_error: bool) {
        self.filter.only_error = only_error;
    }

    pub fn set_only_new(&mut self, only_new: bool) {
        self.filter.only_new = only_new;
    }

    /// `..` moves up, anything else is appended to the root
    pub fn navigate(&mut self, target: &str) {
        self.root.navigate(target);
        debug!("Root is now '{}'", self.root);
    }

    /// Flip a message type's visibility; returns the new state
    pub fn toggle_type(&mut self, message: &str) -> Option<bool> {
        let filter = self.types.get_mut(message)?;
        filter.active = !filter.active;
        Some(filter.active)
    }

    /// Deactivate every message type matching `pattern`; returns how many
    pub fn hide_matching(&mut self, pattern: &Regex) -> usize {
        let mut hidden = 0;
        for (message, filter) in self.types.iter_mut() {
            if filter.active && pattern.is_match(message) {
                filter.active = false;
                hidden += 1;
            }
        }
        debug!("Pattern '{}' hid {} message types", pattern, hidden);
        hidden
    }

    /// Recount message types and regroup the visible diagnostics
    pub fn update(&mut self) -> ViewReport<'_> {
        let groups = aggregate::aggregate(
            &self.diagnostics,
            &self.root,
            self.filter,
            &mut self.types,
        );
        debug!("{} groups under '{}'", groups.len(), self.root);

        ViewReport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            root: self.root.as_str(),
            filter: self.filter,
            summary: self.summary(),
            groups,
            message_types: &self.types,
        }
    }
}
