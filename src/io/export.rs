//! Export a computed report to JSON.
//!
//! The file carries the selection and every chart payload, so it can be fed to
//! any external plotting tool without recomputing the aggregates.

use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use crate::domain::Selection;
use crate::error::AppError;
use crate::report::Report;

/// Directory used for exports triggered from the dashboard.
pub const EXPORT_DIR: &str = "exports";

#[derive(Serialize)]
struct ReportFile<'a> {
    tool: &'static str,
    generated_at: DateTime<Local>,
    #[serde(flatten)]
    report: &'a Report,
}

/// Write `report` as pretty JSON to `path`, creating parent directories.
pub fn write_report_json(path: &Path, report: &Report) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| {
            AppError::source(format!("Failed to create export dir '{}': {e}", parent.display()))
        })?;
    }

    let file = File::create(path)
        .map_err(|e| AppError::source(format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let doc = ReportFile {
        tool: env!("CARGO_PKG_NAME"),
        generated_at: Local::now(),
        report,
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::source(format!("Failed to write export JSON: {e}")))?;

    info!(path = %path.display(), charts = report.charts().count(), "report exported");
    Ok(())
}

/// Timestamped export path for a selection, e.g. `exports/autosales_yearly_1981_20250101_120000.json`.
pub fn default_export_path(dir: &Path, selection: &Selection, now: DateTime<Local>) -> PathBuf {
    let report = selection.report_type.map(|r| r.slug()).unwrap_or("none");
    let year = match (selection.report_type, selection.year) {
        (Some(crate::domain::ReportType::Yearly), Some(y)) => format!("_{y}"),
        _ => String::new(),
    };
    let ts = now.format("%Y%m%d_%H%M%S");
    dir.join(format!("autosales_{report}{year}_{ts}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::domain::{ReportType, SalesRecord, SalesTable};
    use crate::report::build_report;

    #[test]
    fn export_path_includes_report_and_year() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        let dir = Path::new(EXPORT_DIR);

        let yearly = Selection::new(Some(ReportType::Yearly), Some(1981));
        assert_eq!(
            default_export_path(dir, &yearly, now),
            dir.join("autosales_yearly_1981_20240305_070809.json")
        );

        let recession = Selection::new(Some(ReportType::Recession), Some(1981));
        assert_eq!(
            default_export_path(dir, &recession, now),
            dir.join("autosales_recession_20240305_070809.json")
        );
    }

    #[test]
    fn writes_json_with_selection_and_charts() {
        let table = SalesTable::new(vec![SalesRecord {
            year: 1980,
            month: "Jan".to_string(),
            automobile_sales: 10.0,
            vehicle_type: "Sports".to_string(),
            advertising_expenditure: 5.0,
            unemployment_rate: 6.0,
            recession: true,
        }]);
        let report = build_report(&table, Selection::new(Some(ReportType::Recession), None));

        let path = std::env::temp_dir()
            .join(format!("autosales_export_test_{}", std::process::id()))
            .join("report.json");
        write_report_json(&path, &report).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["tool"], "autosales");
        assert_eq!(value["selection"]["report_type"], "recession");
        assert_eq!(value["rows"].as_array().unwrap().len(), 2);
        assert_eq!(value["rows"][0]["charts"][0]["kind"], "line");
        assert_eq!(value["rows"][0]["charts"][0]["data"]["rows"][0]["keys"][0], 1980);
        assert_eq!(value["rows"][1]["charts"][1]["labels"]["unemployment_rate"], "Unemployment Rate");

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
