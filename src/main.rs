mod cli;
mod config;
mod engine;
mod report;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use engine::options::ViewOptions;
use engine::summarize::BuildDirSummarizer;

fn main() -> Result<()> {
    let raw_args: Vec<String> = std::env::args().collect();

    // ── Drag-drop detection (before clap parsing) ───────────────────
    if raw_args.len() == 2 {
        let candidate = std::path::Path::new(&raw_args[1]);
        // A lone existing .json file that is not a subcommand name is
        // browsed directly.
        let is_json = candidate.extension().is_some_and(|e| e == "json");
        if is_json && candidate.is_file() {
            return cli::browse::run_drag_drop(candidate);
        }
    }

    // ── Normal clap flow ────────────────────────────────────────────
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("buildmsg=debug")
    } else if cli.quiet {
        EnvFilter::new("buildmsg=error")
    } else {
        EnvFilter::new("buildmsg=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    info!("buildmsg v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        cli::Commands::View(args) => {
            let options = ViewOptions::resolve(&args.filter, args.format.as_deref())?;
            let mut view = options.open()?;
            let report = view.update();

            // Output the report
            match options.format.as_str() {
                "json" => {
                    let output = report::json::render(&report)?;
                    if let Some(ref path) = args.out {
                        std::fs::write(path, &output)?;
                        info!("Report written to {}", path.display());
                    } else {
                        println!("{}", output);
                    }
                }
                _ => {
                    report::terminal::render(&report);
                    if let Some(ref path) = args.out {
                        let json_output = report::json::render(&report)?;
                        std::fs::write(path, &json_output)?;
                        info!("JSON report also written to {}", path.display());
                    }
                }
            }

            // Exit code based on new diagnostics
            if let Some(ref fail_on) = args.fail_on {
                let threshold = report::diagnostic::Severity::from_str(fail_on);
                if report.has_new_at_or_above(threshold) {
                    std::process::exit(1);
                }
            }
        }
        cli::Commands::Browse(args) => {
            cli::browse::run_browse(args)?;
        }
        cli::Commands::Types(args) => {
            let options = ViewOptions::resolve(&args.filter, args.format.as_deref())?;
            let mut view = options.open()?;
            let report = view.update();
            match options.format.as_str() {
                "json" => println!("{}", report::json::render(report.message_types)?),
                _ => report::terminal::render_types(&report),
            }
        }
        cli::Commands::Summary(args) => {
            let summarizer = BuildDirSummarizer::new(args)?;
            let report = summarizer.run()?;
            match args.format.as_str() {
                "json" => println!("{}", report::json::render(&report)?),
                _ => report::terminal::render_summary(&report),
            }
        }
        cli::Commands::Init => {
            config::init_config(&std::env::current_dir()?)?;
        }
    }

    Ok(())
}
