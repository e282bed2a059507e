use serde::Serialize;

use crate::engine::navigation::RootPath;
use crate::report::diagnostic::{Diagnostic, DisplayGroup, MessageTypes};

/// Error/new toggles applied before grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewFilter {
    pub only_error: bool,
    pub only_new: bool,
}

impl Default for ViewFilter {
    fn default() -> Self {
        ViewFilter {
            only_error: false,
            only_new: true,
        }
    }
}

/// Group under construction
#[derive(Default)]
struct Pending<'a> {
    path: Vec<&'a str>,
    diagnostics: Vec<&'a Diagnostic>,
    widened: bool,
}

impl<'a> Pending<'a> {
    fn flush(self, groups: &mut Vec<DisplayGroup<'a>>) {
        if self.diagnostics.is_empty() {
            return;
        }
        let mut path = self.path;
        if self.widened {
            path.push("");
        }
        groups.push(DisplayGroup {
            path,
            diagnostics: self.diagnostics,
        });
    }
}

/// Fold `(file, line)`-sorted diagnostics under `root` into display groups.
///
/// Consecutive diagnostics sharing a leading path segment stay in one group,
/// whose path shrinks to the shared prefix; a group that shrank is a
/// directory rollup. Message type counts are zeroed and recounted after the
/// error/new/root filters but before the active check.
pub fn aggregate<'a>(
    diagnostics: &'a [Diagnostic],
    root: &RootPath,
    filter: ViewFilter,
    types: &mut MessageTypes,
) -> Vec<DisplayGroup<'a>> {
    for t in types.values_mut() {
        t.count = 0;
    }

    let mut groups = Vec::new();
    let mut current = Pending::default();

    for d in diagnostics {
        if filter.only_error && !d.is_error() {
            continue;
        }
        if filter.only_new && !d.is_new {
            continue;
        }
        let Some(rel) = root.relative(&d.file) else {
            continue;
        };
        if let Some(t) = types.get_mut(&d.message) {
            t.count += 1;
            if !t.active {
                continue;
            }
        }

        let path: Vec<&'a str> = rel.split('/').collect();
        let step = current
            .path
            .iter()
            .zip(&path)
            .take_while(|(a, b)| a == b)
            .count();

        if step > 0 {
            current.diagnostics.push(d);
            if step < current.path.len() {
                current.path.truncate(step);
                current.widened = true;
            }
        } else {
            std::mem::take(&mut current).flush(&mut groups);
            current = Pending {
                path,
                diagnostics: vec![d],
                widened: false,
            };
        }
    }
    current.flush(&mut groups);

    groups
}
