use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const CONFIG_FILE: &str = ".buildmsg.toml";

/// buildmsg configuration (loaded from .buildmsg.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildMsgConfig {
    #[serde(default)]
    pub view: ViewConfig,

    #[serde(default)]
    pub types: TypesConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Show errors only
    #[serde(default)]
    pub only_error: bool,

    /// Show only diagnostics the parent build did not have
    #[serde(default = "default_only_new")]
    pub only_new: bool,

    /// Initial directory prefix
    #[serde(default)]
    pub root: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            only_error: false,
            only_new: default_only_new(),
            root: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypesConfig {
    /// Regexes; matching message types start hidden
    #[serde(default)]
    pub hide: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: default_format(),
        }
    }
}

fn default_only_new() -> bool {
    true
}

fn default_format() -> String {
    "terminal".to_string()
}

impl BuildMsgConfig {
    /// Try to load .buildmsg.toml from the given directory or its parents
    pub fn load(start: &Path) -> Option<Self> {
        let config_path = find_config_file(start)?;
        debug!("Found config: {}", config_path.display());

        match std::fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str::<BuildMsgConfig>(&content) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", config_path.display(), e);
                    None
                }
            },
            Err(e) => {
                debug!("Could not read {}: {}", config_path.display(), e);
                None
            }
        }
    }
}

/// Walk up from `start` to find .buildmsg.toml
fn find_config_file(start: &Path) -> Option<std::path::PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let config = current.join(CONFIG_FILE);
        if config.exists() {
            return Some(config);
        }
        if !current.pop() {
            return None;
        }
    }
}

const DEFAULT_CONFIG: &str = r#"# buildmsg configuration

[view]
# Show errors only
only_error = false

# Hide diagnostics that the parent build already had
only_new = true

# Start the view inside this directory (must end in "/")
# root = "src/kits/"

[types]
# Regexes; message types matching any of them start hidden
hide = [
    # "^deprecated",
]

[output]
# Default output format: "terminal" or "json"
format = "terminal"
"#;

/// Create a default .buildmsg.toml in `dir`
pub fn init_config(dir: &Path) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() {
        println!("⚠️  {} already exists in this directory", CONFIG_FILE);
        return Ok(());
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("✅ Created {}", CONFIG_FILE);
    println!("   Edit it to customize the default view.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let config: BuildMsgConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, BuildMsgConfig::default());
        assert!(config.view.only_new);
    }

    #[test]
    fn test_partial_config() {
        let config: BuildMsgConfig =
            toml::from_str("[view]\nroot = \"src/\"\n\n[types]\nhide = [\"^unused\"]\n").unwrap();
        assert_eq!(config.view.root, "src/");
        assert!(config.view.only_new);
        assert_eq!(config.types.hide, vec!["^unused".to_string()]);
        assert_eq!(config.output.format, "terminal");
    }

    #[test]
    fn test_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("x86_64");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[view]\nonly_error = true\n").unwrap();

        let config = BuildMsgConfig::load(&nested).unwrap();
        assert!(config.view.only_error);
    }

    #[test]
    fn test_malformed_config_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[view\n").unwrap();
        assert!(BuildMsgConfig::load(dir.path()).is_none());
    }
}
