use std::fmt;
use std::path::Path;

use anyhow::Result;
use inquire::{InquireError, MultiSelect, Select};
use owo_colors::OwoColorize;

use crate::cli::FilterArgs;
use crate::engine::options::ViewOptions;
use crate::engine::MessageView;
use crate::report;

// ── Helpers ──────────────────────────────────────────────────────────

/// Print a horizontal separator.
fn separator() {
    println!("{}", "━".repeat(60));
}

/// What the user can do from the current view
#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseAction {
    Enter { path: String, count: usize },
    Up,
    ToggleOnlyError(bool),
    ToggleOnlyNew(bool),
    ChooseTypes,
    Quit,
}

impl fmt::Display for BrowseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowseAction::Enter { path, count } => write!(f, "📁 {}  ({})", path, count),
            BrowseAction::Up => write!(f, "⬆  Up"),
            BrowseAction::ToggleOnlyError(on) => {
                write!(f, "[{}] Only errors", if *on { "x" } else { " " })
            }
            BrowseAction::ToggleOnlyNew(on) => {
                write!(f, "[{}] Only new", if *on { "x" } else { " " })
            }
            BrowseAction::ChooseTypes => write!(f, "Message types…"),
            BrowseAction::Quit => write!(f, "Quit"),
        }
    }
}

/// Actions for one rendering: directory rows first, then the toggles
fn actions(view: &mut MessageView) -> Vec<BrowseAction> {
    let filter = view.filter();
    let can_go_up = !view.root().is_empty();
    let report = view.update();
    report::terminal::render(&report);

    let mut actions: Vec<BrowseAction> = report
        .groups
        .iter()
        .filter(|g| g.is_dir())
        .map(|g| BrowseAction::Enter {
            path: g.display_path(),
            count: g.diagnostics.len(),
        })
        .collect();
    if can_go_up {
        actions.push(BrowseAction::Up);
    }
    actions.push(BrowseAction::ToggleOnlyError(filter.only_error));
    actions.push(BrowseAction::ToggleOnlyNew(filter.only_new));
    actions.push(BrowseAction::ChooseTypes);
    actions.push(BrowseAction::Quit);
    actions
}

/// Apply one action; returns `false` when browsing should stop
fn apply(view: &mut MessageView, action: BrowseAction) -> Result<bool> {
    match action {
        BrowseAction::Enter { path, .. } => view.navigate(&path),
        BrowseAction::Up => view.navigate(".."),
        BrowseAction::ToggleOnlyError(on) => view.set_only_error(!on),
        BrowseAction::ToggleOnlyNew(on) => view.set_only_new(!on),
        BrowseAction::ChooseTypes => choose_types(view)?,
        BrowseAction::Quit => return Ok(false),
    }
    Ok(true)
}

/// Multi-select over message types; unselected ones are hidden
fn choose_types(view: &mut MessageView) -> Result<()> {
    let names: Vec<String> = view.types().keys().map(|k| k.to_string()).collect();
    let selected: Vec<usize> = view
        .types()
        .values()
        .enumerate()
        .filter(|(_, t)| t.active)
        .map(|(i, _)| i)
        .collect();

    let chosen = match MultiSelect::new("Message types to show:", names.clone())
        .with_default(&selected)
        .prompt()
    {
        Ok(chosen) => chosen,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    for name in &names {
        let active = view.types().get(name.as_str()).map(|t| t.active);
        if active != Some(chosen.contains(name)) {
            view.toggle_type(name);
        }
    }
    Ok(())
}

// ── Public entry-points ─────────────────────────────────────────────

/// Interactive navigation over a build's diagnostics.
pub fn run_browse(args: &FilterArgs) -> Result<()> {
    let options = ViewOptions::resolve(args, None)?;
    let mut view = options.open()?;

    loop {
        let choices = actions(&mut view);
        separator();
        let choice = match Select::new("Where to?", choices).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };
        if !apply(&mut view, choice)? {
            break;
        }
    }

    println!("  {}", "Goodbye!".dimmed());
    Ok(())
}

/// A single build-result.json passed without a subcommand.
pub fn run_drag_drop(path: &Path) -> Result<()> {
    init_quiet_logging();

    println!();
    separator();
    println!(
        "  {} {}",
        "📂".bold(),
        format!("buildmsg v{}", env!("CARGO_PKG_VERSION")).bold()
    );
    separator();
    println!("  {}", path.display().to_string().cyan());

    let args = FilterArgs {
        result: path.to_path_buf(),
        ..FilterArgs::default()
    };
    run_browse(&args)
}

/// Set up minimal tracing for the drag-and-drop entry point, which skips
/// the clap flow that normally initialises logging.
fn init_quiet_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("buildmsg=warn"))
        .with_target(false)
        .without_time()
        .try_init();
}
