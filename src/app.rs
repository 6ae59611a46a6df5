//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves configuration and installs logging
//! - loads the dataset once
//! - dispatches to the dashboard, the text report, or the JSON export

use clap::Parser;
use tracing::info;

use crate::cli::{Command, DashArgs, ExportArgs, ReportArgs, SelectionArgs};
use crate::config::Config;
use crate::domain::Selection;
use crate::error::AppError;
use crate::logging::LogTarget;
use crate::report::{format_report, FormatOptions};

pub mod pipeline;

/// Entry point for the `autosales` binary.
pub fn run() -> Result<(), AppError> {
    // `autosales` and `autosales --source x.csv` behave like `autosales tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Report(args) => handle_report(args),
        Command::Export(args) => handle_export(args),
    }
}

fn handle_tui(args: DashArgs) -> Result<(), AppError> {
    let config = Config::from_env(args.source.source.as_deref());
    let _guard = crate::logging::init(&config, LogTarget::File)?;

    info!(source = %config.source, "starting dashboard");
    let table = pipeline::load_table(&config.source)?;

    crate::tui::run(table, Selection::new(args.statistics, args.year))
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = Config::from_env(args.source.source.as_deref());
    crate::logging::init(&config, LogTarget::Stderr)?;

    let run = pipeline::run_selection(&config.source, selection_from_args(&args.selection))?;
    let options = FormatOptions {
        plot: !args.no_plot,
        width: args.width,
        height: args.height,
    };
    print!("{}", format_report(&run.report, &options));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = Config::from_env(args.source.source.as_deref());
    crate::logging::init(&config, LogTarget::Stderr)?;

    let run = pipeline::run_selection(&config.source, selection_from_args(&args.selection))?;
    crate::io::export::write_report_json(&args.out, &run.report)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}

pub fn selection_from_args(args: &SelectionArgs) -> Selection {
    Selection::new(Some(args.statistics), args.year)
}

/// Rewrite argv so `autosales` defaults to `autosales tui`.
///
/// Rules:
/// - `autosales`                     -> `autosales tui`
/// - `autosales --source x.csv ...`  -> `autosales tui --source x.csv ...`
/// - `autosales --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report" | "export");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReportType;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_launches_dashboard() {
        assert_eq!(rewrite_args(args(&["autosales"])), args(&["autosales", "tui"]));
        assert_eq!(
            rewrite_args(args(&["autosales", "-s", "x.csv"])),
            args(&["autosales", "tui", "-s", "x.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for argv in [
            args(&["autosales", "--help"]),
            args(&["autosales", "report", "--statistics", "recession"]),
            args(&["autosales", "export", "-o", "a.json"]),
        ] {
            assert_eq!(rewrite_args(argv.clone()), argv);
        }
    }

    #[test]
    fn selection_args_always_set_a_report_type() {
        let sel = selection_from_args(&SelectionArgs {
            statistics: ReportType::Recession,
            year: Some(1990),
        });
        assert_eq!(sel.report_type, Some(ReportType::Recession));
        assert_eq!(sel.year, Some(1990));
    }
}
