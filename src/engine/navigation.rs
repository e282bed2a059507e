use std::fmt;

/// Directory prefix narrowing the grouped view.
///
/// Directory roots end in `/`; the empty root shows everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootPath(String);

impl RootPath {
    pub fn new(path: impl Into<String>) -> Self {
        RootPath(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of `file` below the root, `None` when it is not under it.
    ///
    /// "Under" is a plain string prefix test, so `src/kit` covers
    /// `src/kits/app/Looper.cpp`.
    pub fn relative<'a>(&self, file: &'a str) -> Option<&'a str> {
        file.strip_prefix(self.0.as_str())
    }

    /// Append a row path as shown in the view, e.g. `kits/app/`
    pub fn enter(&mut self, path: &str) {
        self.0.push_str(path);
    }

    /// Move to the parent directory.
    ///
    /// `a/b/` becomes `a/`; an unterminated `a/b` loses its last segment and
    /// becomes `a/` as well.
    pub fn up(&mut self) {
        let mut segments: Vec<&str> = self.0.split('/').collect();
        if segments.last() == Some(&"") {
            segments.pop();
        }
        match segments.last_mut() {
            Some(last) => *last = "",
            None => segments.push(""),
        }
        self.0 = segments.join("/");
    }

    /// Apply a navigation request: `..` moves up, anything else is entered
    pub fn navigate(&mut self, target: &str) {
        if target == ".." {
            self.up();
        } else {
            self.enter(target);
        }
    }
}

impl fmt::Display for RootPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
