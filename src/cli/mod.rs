//! Command-line parsing for the automobile sales dashboard.
//!
//! Argument parsing and command dispatch stay separate from the aggregation
//! code; `app` turns these structs into a `Config` and runs the command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ReportType, YEAR_MAX, YEAR_MIN};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "autosales", version, about = "Automobile Sales Statistics Dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (the default).
    Tui(DashArgs),
    /// Print the charts for one selection as text.
    Report(ReportArgs),
    /// Write the chart payloads for one selection to a JSON file.
    Export(ExportArgs),
}

/// Where to load the dataset from.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// CSV URL or file path (defaults to $AUTOSALES_DATA_URL, then the public dataset).
    #[arg(short = 's', long, value_name = "URL|PATH")]
    pub source: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct DashArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Initial report type.
    #[arg(long, value_enum)]
    pub statistics: Option<ReportType>,

    /// Initial year for the yearly report (1980-2023).
    #[arg(short = 'y', long, value_parser = year_parser())]
    pub year: Option<i32>,
}

/// The selection shared by `report` and `export`.
#[derive(Debug, Args, Clone)]
pub struct SelectionArgs {
    /// Report type.
    #[arg(long, value_enum)]
    pub statistics: ReportType,

    /// Year for the yearly report, 1980-2023 (ignored for the recession report).
    #[arg(short = 'y', long, value_parser = year_parser())]
    pub year: Option<i32>,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Tables only, no ASCII plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output JSON path.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub out: PathBuf,
}

/// Years outside the selector's range are rejected at parse time.
fn year_parser() -> clap::builder::RangedI64ValueParser<i32> {
    clap::value_parser!(i32).range(i64::from(YEAR_MIN)..=i64::from(YEAR_MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_command() {
        let cli = Cli::try_parse_from([
            "autosales",
            "report",
            "--statistics",
            "yearly",
            "--year",
            "1981",
            "--no-plot",
        ])
        .unwrap();
        let Command::Report(args) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(args.selection.statistics, ReportType::Yearly);
        assert_eq!(args.selection.year, Some(1981));
        assert!(args.no_plot);
        assert_eq!(args.width, 72);
        assert!(args.source.source.is_none());
    }

    #[test]
    fn export_requires_out() {
        assert!(Cli::try_parse_from(["autosales", "export", "--statistics", "recession"]).is_err());
        let cli = Cli::try_parse_from([
            "autosales", "export", "--statistics", "recession", "-o", "r.json", "-s", "data.csv",
        ])
        .unwrap();
        let Command::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.out, PathBuf::from("r.json"));
        assert_eq!(args.source.source.as_deref(), Some("data.csv"));
    }

    #[test]
    fn years_outside_the_selector_range_are_rejected() {
        for cmd in [
            vec!["autosales", "tui", "--year", "1970"],
            vec!["autosales", "report", "--statistics", "yearly", "--year", "2024"],
            vec!["autosales", "export", "--statistics", "yearly", "-y", "1979", "-o", "r.json"],
        ] {
            assert!(Cli::try_parse_from(cmd.clone()).is_err(), "{cmd:?}");
        }

        let cli = Cli::try_parse_from(["autosales", "tui", "--statistics", "yearly", "-y", "2023"]).unwrap();
        let Command::Tui(args) = cli.command else {
            panic!("expected tui command");
        };
        assert_eq!(args.year, Some(2023));
    }
}
