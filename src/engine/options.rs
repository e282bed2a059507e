use std::path::PathBuf;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::info;

use crate::cli::FilterArgs;
use crate::config::BuildMsgConfig;
use crate::engine::loader;
use crate::engine::{MessageView, ViewFilter};

/// View settings after merging .buildmsg.toml with the command line
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub result: PathBuf,
    pub parent: Option<PathBuf>,
    pub root: String,
    pub filter: ViewFilter,
    pub hide: Vec<Regex>,
    pub format: String,
}

impl ViewOptions {
    /// `format` is the command's `--format`, if it has one
    pub fn resolve(args: &FilterArgs, format: Option<&str>) -> Result<Self> {
        let config = if args.no_config {
            None
        } else {
            let dir = args
                .result
                .parent()
                .map(|p| p.to_path_buf())
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| PathBuf::from("."));
            BuildMsgConfig::load(&dir)
        };
        let config = config.unwrap_or_default();

        let mut hide = Vec::new();
        for pattern in config.types.hide.iter().chain(&args.hide) {
            let regex = Regex::new(pattern)
                .with_context(|| format!("invalid message type pattern '{}'", pattern))?;
            hide.push(regex);
        }

        Ok(ViewOptions {
            result: args.result.clone(),
            parent: args.parent.clone(),
            root: args.root.clone().unwrap_or(config.view.root),
            filter: ViewFilter {
                only_error: args.only_error().unwrap_or(config.view.only_error),
                only_new: args.only_new().unwrap_or(config.view.only_new),
            },
            hide,
            format: format.map(str::to_string).unwrap_or(config.output.format),
        })
    }

    /// Read both documents and build the view with these settings applied
    pub fn open(&self) -> Result<MessageView> {
        if self.parent.is_none() {
            info!("No parent build given; every diagnostic is new");
        }
        let (own, parent) = loader::read_pair(&self.result, self.parent.as_deref())?;
        let mut view = MessageView::load(&own, &parent).map_err(|e| {
            let path = match &self.parent {
                Some(parent) if e.in_parent() => parent,
                _ => &self.result,
            };
            anyhow::Error::new(e).context(format!("cannot decode {}", path.display()))
        })?;

        view.set_root(self.root.clone());
        view.set_only_error(self.filter.only_error);
        view.set_only_new(self.filter.only_new);
        for pattern in &self.hide {
            view.hide_matching(pattern);
        }
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(result: PathBuf) -> FilterArgs {
        FilterArgs {
            result,
            ..FilterArgs::default()
        }
    }

    #[test]
    fn test_cli_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(crate::config::CONFIG_FILE),
            "[view]\nroot = \"src/\"\n[types]\nhide = [\"^unused\"]\n[output]\nformat = \"json\"\n",
        )
        .unwrap();

        let mut a = args(dir.path().join("build-result.json"));
        let opts = ViewOptions::resolve(&a, None).unwrap();
        assert_eq!(opts.root, "src/");
        assert_eq!(opts.format, "json");
        assert_eq!(opts.hide.len(), 1);
        assert!(opts.filter.only_new);

        a.root = Some("headers/".to_string());
        a.all = true;
        a.hide = vec!["sign".to_string()];
        let opts = ViewOptions::resolve(&a, Some("terminal")).unwrap();
        assert_eq!(opts.root, "headers/");
        assert_eq!(opts.format, "terminal");
        assert_eq!(opts.hide.len(), 2);
        assert!(!opts.filter.only_new);

        a.no_config = true;
        let opts = ViewOptions::resolve(&a, None).unwrap();
        assert_eq!(opts.hide.len(), 1);
    }

    #[test]
    fn test_flags_undo_config_toggles() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(crate::config::CONFIG_FILE),
            "[view]\nonly_error = true\nonly_new = false\n",
        )
        .unwrap();

        let mut a = args(dir.path().join("build-result.json"));
        let opts = ViewOptions::resolve(&a, None).unwrap();
        assert!(opts.filter.only_error);
        assert!(!opts.filter.only_new);

        a.no_only_error = true;
        a.only_new = true;
        let opts = ViewOptions::resolve(&a, None).unwrap();
        assert!(!opts.filter.only_error);
        assert!(opts.filter.only_new);
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(dir.path().join("build-result.json"));
        a.no_config = true;
        a.hide = vec!["(".to_string()];
        assert!(ViewOptions::resolve(&a, None).is_err());
    }

    #[test]
    fn test_open_applies_settings() {
        let dir = tempfile::tempdir().unwrap();
        let result = dir.path().join("build-result.json");
        std::fs::write(
            &result,
            r#"{"files": ["jam.log"], "messages": ["unused", "shadow"],
                "warnings": {"a/b.cpp": [[0, 1, 3, 0], [0, 2, 4, 1]]}}"#,
        )
        .unwrap();

        let mut a = args(result);
        a.no_config = true;
        a.hide = vec!["^unused$".to_string()];
        a.root = Some("a/".to_string());
        let mut view = ViewOptions::resolve(&a, None).unwrap().open().unwrap();

        assert_eq!(view.root().as_str(), "a/");
        assert!(!view.types()["unused"].active);
        let groups = view.update().groups;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].display_path(), "b.cpp");
        assert_eq!(groups[0].diagnostics.len(), 1);
    }

    #[test]
    fn test_open_names_malformed_parent() {
        let dir = tempfile::tempdir().unwrap();
        let result = dir.path().join("current.json");
        let parent = dir.path().join("parent.json");
        std::fs::write(
            &result,
            r#"{"files": ["jam.log"], "messages": ["X"], "warnings": {"a.cpp": [[0, 1, 1, 0]]}}"#,
        )
        .unwrap();
        std::fs::write(
            &parent,
            r#"{"files": ["jam.log"], "messages": ["X"], "warnings": {"a.cpp": [[0, 1, 1, 7]]}}"#,
        )
        .unwrap();

        let mut a = args(result);
        a.no_config = true;
        a.parent = Some(parent);
        let err = ViewOptions::resolve(&a, None).unwrap().open().unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("parent.json"));
        assert!(!message.contains("current.json"));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(dir.path().join("nope.json"));
        a.no_config = true;
        assert!(ViewOptions::resolve(&a, None).unwrap().open().is_err());
    }
}
