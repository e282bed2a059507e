pub mod browse;
pub mod commands;

use clap::Parser;

pub use commands::{Commands, FilterArgs, SummaryArgs, TypesArgs, ViewArgs};

/// buildmsg — compiler diagnostics browser for CI builds
///
/// Compares a build's warnings and errors with its parent build and groups
/// the new ones by directory.
#[derive(Parser, Debug)]
#[command(
    name = "buildmsg",
    version,
    about = "buildmsg — tell new compiler warnings from inherited ones",
    long_about = "buildmsg reads build-result.json documents, classifies each diagnostic\nas new or inherited from the parent build, and shows them folded by directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}
