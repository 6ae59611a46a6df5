//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - held in memory for the whole session (the loaded table)
//! - driven from both the CLI and the dashboard (the selection)
//! - exported to JSON alongside the computed charts

use std::cmp::Ordering;

use clap::ValueEnum;
use serde::Serialize;

/// Dropdown label for the "nothing selected yet" entry.
pub const PLACEHOLDER_LABEL: &str = "Select Statistics";

/// First and last year offered by the year selector.
pub const YEAR_MIN: i32 = 1980;
pub const YEAR_MAX: i32 = 2023;

/// One observation from the historical sales dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub year: i32,
    pub month: String,
    pub automobile_sales: f64,
    pub vehicle_type: String,
    pub advertising_expenditure: f64,
    pub unemployment_rate: f64,
    pub recession: bool,
}

/// The immutable in-memory dataset.
///
/// Built once at startup and only ever borrowed afterwards.
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows flagged as belonging to a recession period.
    pub fn recession_rows(&self) -> Vec<&SalesRecord> {
        self.records.iter().filter(|r| r.recession).collect()
    }

    pub fn rows_for_year(&self, year: i32) -> Vec<&SalesRecord> {
        self.records.iter().filter(|r| r.year == year).collect()
    }

    pub fn all_rows(&self) -> Vec<&SalesRecord> {
        self.records.iter().collect()
    }

    /// Distinct years present in the data, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

/// Which statistics report to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Whole-period trends plus a breakdown for one selected year.
    Yearly,
    /// Statistics restricted to recession periods.
    Recession,
}

impl ReportType {
    pub const ALL: [ReportType; 2] = [ReportType::Yearly, ReportType::Recession];

    /// The dropdown label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            ReportType::Yearly => "Yearly Statistics",
            ReportType::Recession => "Recession Period Statistics",
        }
    }

    /// Map a dropdown value back to a report type.
    ///
    /// The placeholder entry and anything unrecognised map to `None`.
    pub fn from_label(label: &str) -> Option<ReportType> {
        let label = label.trim();
        ReportType::ALL.into_iter().find(|r| r.label() == label)
    }

    pub fn slug(self) -> &'static str {
        match self {
            ReportType::Yearly => "yearly",
            ReportType::Recession => "recession",
        }
    }
}

/// UI-held selection state: report type plus an optional year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub report_type: Option<ReportType>,
    pub year: Option<i32>,
}

impl Selection {
    pub fn new(report_type: Option<ReportType>, year: Option<i32>) -> Self {
        Self { report_type, year }
    }

    /// Label of the report dropdown for this selection.
    pub fn report_label(&self) -> &'static str {
        self.report_type.map(ReportType::label).unwrap_or(PLACEHOLDER_LABEL)
    }
}

/// Options of the report dropdown, in display order.
pub fn report_options() -> [&'static str; 3] {
    [
        PLACEHOLDER_LABEL,
        ReportType::Yearly.label(),
        ReportType::Recession.label(),
    ]
}

/// Options of the year dropdown, ascending.
pub fn year_options() -> Vec<i32> {
    (YEAR_MIN..=YEAR_MAX).collect()
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// A month label that orders by calendar position.
///
/// `Jan`, `jan`, and `January` all resolve to month 1. Labels that are not
/// month names sort after every recognised month, lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MonthKey {
    label: String,
}

impl MonthKey {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// 1-based calendar month, if the label is a month name or 3+ letter prefix.
    pub fn ordinal(&self) -> Option<u8> {
        let lower = self.label.trim().to_ascii_lowercase();
        if lower.len() < 3 {
            return None;
        }
        MONTHS
            .iter()
            .position(|m| m.starts_with(&lower))
            .map(|idx| idx as u8 + 1)
    }
}

impl Ord for MonthKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.ordinal().unwrap_or(u8::MAX);
        let b = other.ordinal().unwrap_or(u8::MAX);
        a.cmp(&b).then_with(|| self.label.cmp(&other.label))
    }
}

impl PartialOrd for MonthKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
