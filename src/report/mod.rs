//! Report callbacks: the two pure functions the UI calls on every selection change.
//!
//! - [`year_selector_enabled`] decides whether the year dropdown is interactive
//! - [`build_report`] turns the selection into a layout of chart specifications
//!
//! Both only read the loaded table, so the dashboard, the `report` command and
//! the `export` command all share them.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::aggregate::{group_by, AggregateTable, Dimension, Measure, Reducer};
use crate::domain::{ReportType, SalesRecord, SalesTable, Selection};

pub mod format;

pub use format::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

/// A render-ready chart: kind, fixed titles/labels, and its aggregate payload.
///
/// For line and bar charts `x`/`y` name the category and value columns. For pie
/// charts `x` names the slice labels and `y` the slice values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x: &'static str,
    pub y: &'static str,
    /// Column used to split bars into colored series.
    pub color: Option<&'static str>,
    /// Display labels overriding raw column names.
    pub labels: BTreeMap<&'static str, &'static str>,
    pub data: AggregateTable,
}

impl ChartSpec {
    fn new(kind: ChartKind, title: impl Into<String>, data: AggregateTable) -> Self {
        let x = data.key_columns.first().copied().unwrap_or_default();
        let y = data.value_column;
        Self {
            kind,
            title: title.into(),
            x,
            y,
            color: None,
            labels: BTreeMap::new(),
            data,
        }
    }

    fn colored_by(mut self, column: &'static str) -> Self {
        self.color = Some(column);
        self
    }

    fn label(mut self, column: &'static str, text: &'static str) -> Self {
        self.labels.insert(column, text);
        self
    }

    /// Display label for a column (override if set, else the column name).
    pub fn axis_label(&self, column: &'static str) -> &'static str {
        self.labels.get(column).copied().unwrap_or(column)
    }
}

/// Two charts rendered side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub charts: [ChartSpec; 2],
}

/// Output of [`build_report`]: zero or two rows of chart pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub selection: Selection,
    pub rows: Vec<ChartRow>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.rows.iter().flat_map(|row| row.charts.iter())
    }
}

/// The year selector is interactive only for the yearly report.
pub fn year_selector_enabled(report_type: Option<ReportType>) -> bool {
    report_type == Some(ReportType::Yearly)
}

/// Compute the chart layout for a selection.
///
/// - recession: four charts over recession rows; the year is ignored
/// - yearly with a year: two whole-period trends plus two charts for that year
/// - anything else: an empty layout
pub fn build_report(table: &SalesTable, selection: Selection) -> Report {
    let rows = match (selection.report_type, selection.year) {
        (Some(ReportType::Recession), _) => recession_rows(table),
        (Some(ReportType::Yearly), Some(year)) => yearly_rows(table, year),
        _ => Vec::new(),
    };

    debug!(
        report = selection.report_label(),
        year = ?selection.year,
        charts = rows.len() * 2,
        "report built"
    );

    Report { selection, rows }
}

fn recession_rows(table: &SalesTable) -> Vec<ChartRow> {
    let rows: Vec<&SalesRecord> = table.recession_rows();

    let by_year = ChartSpec::new(
        ChartKind::Line,
        "Average Automobile Sales During Recession (Year-wise)",
        group_by(&rows, &[Dimension::Year], Measure::AutomobileSales, Reducer::Mean),
    );

    let by_type = ChartSpec::new(
        ChartKind::Bar,
        "Average Vehicles Sold by Vehicle Type (Recession)",
        group_by(&rows, &[Dimension::VehicleType], Measure::AutomobileSales, Reducer::Mean),
    );

    let ad_share = ChartSpec::new(
        ChartKind::Pie,
        "Advertising Expenditure Share by Vehicle Type (Recession)",
        group_by(
            &rows,
            &[Dimension::VehicleType],
            Measure::AdvertisingExpenditure,
            Reducer::Sum,
        ),
    );

    let unemployment = ChartSpec::new(
        ChartKind::Bar,
        "Effect of Unemployment Rate on Vehicle Type and Sales",
        group_by(
            &rows,
            &[Dimension::UnemploymentRate, Dimension::VehicleType],
            Measure::AutomobileSales,
            Reducer::Mean,
        ),
    )
    .colored_by(Dimension::VehicleType.column_name())
    .label(Dimension::UnemploymentRate.column_name(), "Unemployment Rate")
    .label(Measure::AutomobileSales.column_name(), "Average Automobile Sales");

    vec![
        ChartRow {
            charts: [by_year, by_type],
        },
        ChartRow {
            charts: [ad_share, unemployment],
        },
    ]
}

fn yearly_rows(table: &SalesTable, year: i32) -> Vec<ChartRow> {
    let all = table.all_rows();
    let in_year = table.rows_for_year(year);

    let yearly_trend = ChartSpec::new(
        ChartKind::Line,
        "Average Yearly Automobile Sales",
        group_by(&all, &[Dimension::Year], Measure::AutomobileSales, Reducer::Mean),
    );

    let monthly_total = ChartSpec::new(
        ChartKind::Line,
        "Total Monthly Automobile Sales",
        group_by(&all, &[Dimension::Month], Measure::AutomobileSales, Reducer::Sum),
    );

    let by_type = ChartSpec::new(
        ChartKind::Bar,
        format!("Average Vehicles Sold by Vehicle Type in the year {year}"),
        group_by(&in_year, &[Dimension::VehicleType], Measure::AutomobileSales, Reducer::Mean),
    );

    let ad_spend = ChartSpec::new(
        ChartKind::Pie,
        format!("Total Advertisement Expenditure by Vehicle Type in {year}"),
        group_by(
            &in_year,
            &[Dimension::VehicleType],
            Measure::AdvertisingExpenditure,
            Reducer::Sum,
        ),
    );

    vec![
        ChartRow {
            charts: [yearly_trend, monthly_total],
        },
        ChartRow {
            charts: [by_type, ad_spend],
        },
    ]
}
