use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a build's diagnostics grouped by directory
    View(ViewArgs),

    /// Navigate a build's diagnostics interactively
    Browse(FilterArgs),

    /// List message types with their counts
    Types(TypesArgs),

    /// Per-architecture totals for a build directory
    Summary(SummaryArgs),

    /// Initialize a .buildmsg.toml config file in the current directory
    Init,
}

/// Which build to load and which of its diagnostics to show
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// build-result.json of the build to inspect
    pub result: PathBuf,

    /// build-result.json of the parent build (omit: everything is new)
    #[arg(short, long)]
    pub parent: Option<PathBuf>,

    /// Only show files under this prefix, e.g. "src/kits/"
    #[arg(long)]
    pub root: Option<String>,

    /// Only show errors
    #[arg(long, overrides_with = "no_only_error")]
    pub only_error: bool,

    /// Show warnings too, even if the config says only errors
    #[arg(long, overrides_with = "only_error")]
    pub no_only_error: bool,

    /// Also show diagnostics inherited from the parent build
    #[arg(long, overrides_with = "only_new")]
    pub all: bool,

    /// Only show new diagnostics, even if the config says otherwise
    #[arg(long, overrides_with = "all")]
    pub only_new: bool,

    /// Hide message types matching this regex (can be repeated)
    #[arg(long)]
    pub hide: Vec<String>,

    /// Ignore .buildmsg.toml config files
    #[arg(long)]
    pub no_config: bool,
}

impl FilterArgs {
    /// `--only-error` / `--no-only-error`, if either was given
    pub fn only_error(&self) -> Option<bool> {
        match (self.only_error, self.no_only_error) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// `--only-new` / `--all`, if either was given
    pub fn only_new(&self) -> Option<bool> {
        match (self.only_new, self.all) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ViewArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output format: "terminal" or "json"
    #[arg(short, long)]
    pub format: Option<String>,

    /// Write the JSON report to file
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Fail (exit code 1) if new diagnostics at or above this severity are
    /// shown. Values: warning, error
    #[arg(long)]
    pub fail_on: Option<String>,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct TypesArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output format: "terminal" or "json"
    #[arg(short, long)]
    pub format: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SummaryArgs {
    /// Build directory containing one build-result.json per architecture
    #[arg(default_value = ".")]
    pub build_dir: PathBuf,

    /// Parent build directory with the same layout
    #[arg(short, long)]
    pub parent_dir: Option<PathBuf>,

    /// Maximum directory depth to search
    #[arg(long, default_value = "4")]
    pub max_depth: usize,

    /// Output format: "terminal" or "json"
    #[arg(short, long, default_value = "terminal")]
    pub format: String,
}
