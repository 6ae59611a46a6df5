//! Shared "load → report" workflow used by both the CLI and the dashboard.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch CSV -> parse/validate -> in-memory table -> report for a selection
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::{info, warn};

use crate::data::DataSource;
use crate::domain::{ReportType, SalesTable, Selection};
use crate::error::AppError;
use crate::io::ingest::parse_sales_bytes;
use crate::report::{build_report, Report};

/// Everything computed for one non-interactive run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: SalesTable,
    pub report: Report,
}

/// Fetch and parse the dataset. Called once per process.
pub fn load_table(source: &DataSource) -> Result<SalesTable, AppError> {
    let bytes = source.fetch_bytes()?;
    let table = parse_sales_bytes(&bytes)?;

    let years = table.years();
    info!(
        rows = table.len(),
        first_year = ?years.first(),
        last_year = ?years.last(),
        recession_rows = table.recession_rows().len(),
        "dataset loaded"
    );
    Ok(table)
}

/// Load the dataset and compute the report for `selection`.
pub fn run_selection(source: &DataSource, selection: Selection) -> Result<RunOutput, AppError> {
    let table = load_table(source)?;
    let report = report_for(&table, selection);
    Ok(RunOutput { table, report })
}

/// Compute the report, warning about selections that yield no charts.
pub fn report_for(table: &SalesTable, selection: Selection) -> Report {
    if selection.report_type == Some(ReportType::Yearly) && selection.year.is_none() {
        warn!("yearly statistics need a year; no charts produced");
    }
    build_report(table, selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_selection_from_local_file() {
        let path = std::env::temp_dir().join(format!("autosales_pipeline_test_{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "Year,Month,Recession,Advertising_Expenditure,unemployment_rate,Automobile_Sales,Vehicle_Type\n\
             1980,Jan,1,100,6.0,10,Sports\n\
             1981,Jan,0,200,4.0,20,Trucks\n",
        )
        .unwrap();

        let out = run_selection(
            &DataSource::File(path.clone()),
            Selection::new(Some(ReportType::Recession), None),
        )
        .unwrap();
        assert_eq!(out.table.len(), 2);
        assert_eq!(out.report.charts().count(), 4);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn malformed_file_fails_the_load() {
        let path = std::env::temp_dir().join(format!("autosales_pipeline_bad_{}.csv", std::process::id()));
        std::fs::write(&path, "Year,Month\n1980,Jan\n").unwrap();
        let err = load_table(&DataSource::File(path.clone())).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        let _ = std::fs::remove_file(path);
    }
}
