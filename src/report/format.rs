//! Formatted terminal output for a computed report.
//!
//! Formatting lives here so the callbacks stay pure and output changes are
//! localized (the `report` command and tests both go through these functions).

use crate::aggregate::AggregateTable;
use crate::domain::ReportType;
use crate::plot::{render_bars, render_line_plot, render_shares};
use crate::report::{ChartKind, ChartSpec, Report};

/// Title shown above every report, matching the dashboard header.
pub const DASHBOARD_TITLE: &str = "Automobile Sales Statistics Dashboard";

/// Knobs for text output.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    pub plot: bool,
    pub width: usize,
    pub height: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            plot: true,
            width: 72,
            height: 16,
        }
    }
}

impl ChartSpec {
    /// `(x, y)` points for a line chart.
    ///
    /// Numeric keys (years) are used as-is; categorical keys (months) are
    /// placed at their index so the axis keeps the table order.
    pub fn line_points(&self) -> Vec<(f64, f64)> {
        self.data
            .rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                let x = row
                    .keys
                    .first()
                    .and_then(|k| k.as_f64())
                    .unwrap_or(idx as f64);
                (x, row.value)
            })
            .collect()
    }

    /// `(label, value)` pairs for bar and pie charts; multi-key rows join their keys with ` / `.
    pub fn labelled_values(&self) -> Vec<(String, f64)> {
        self.data
            .rows
            .iter()
            .map(|row| {
                let label = row
                    .keys
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" / ");
                (label, row.value)
            })
            .collect()
    }
}

/// Format the whole report: header, then one section per chart.
pub fn format_report(report: &Report, options: &FormatOptions) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {DASHBOARD_TITLE} ===\n"));
    out.push_str(&format!("Report: {}", report.selection.report_label()));
    if report.selection.report_type == Some(ReportType::Yearly) {
        match report.selection.year {
            Some(year) => out.push_str(&format!(" | Year: {year}")),
            None => out.push_str(" | Year: -"),
        }
    }
    out.push('\n');

    if report.is_empty() {
        out.push_str("\nNo charts for this selection. Choose a report type (and a year for yearly statistics).\n");
        return out;
    }

    for (idx, chart) in report.charts().enumerate() {
        out.push('\n');
        out.push_str(&format_chart(idx + 1, chart, options));
    }

    out
}

/// Format one chart: title line, payload table, optional plot.
pub fn format_chart(number: usize, chart: &ChartSpec, options: &FormatOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!("[{number}] {} ({})\n", chart.title, kind_name(chart.kind)));
    out.push_str(&format_table(&chart.data));

    if options.plot && !chart.data.is_empty() {
        out.push('\n');
        let rendered = match chart.kind {
            ChartKind::Line => render_line_plot(&chart.line_points(), options.width, options.height),
            ChartKind::Bar => render_bars(&chart.labelled_values(), options.width / 2),
            ChartKind::Pie => render_shares(&chart.labelled_values(), options.width / 2),
        };
        out.push_str(&rendered);
    }

    out
}

/// Format an aggregate table as aligned columns.
pub fn format_table(table: &AggregateTable) -> String {
    let value_header = format!(
        "{}({})",
        match table.reducer {
            crate::aggregate::Reducer::Mean => "mean",
            crate::aggregate::Reducer::Sum => "sum",
        },
        table.value_column
    );

    let mut widths: Vec<usize> = table.key_columns.iter().map(|c| c.len()).collect();
    for row in &table.rows {
        for (w, key) in widths.iter_mut().zip(&row.keys) {
            *w = (*w).max(key.to_string().chars().count());
        }
    }
    let value_width = value_header.len().max(12);

    let mut out = String::new();
    let mut header = String::new();
    for (col, w) in table.key_columns.iter().zip(&widths) {
        header.push_str(&format!("{col:<w$} "));
    }
    header.push_str(&format!("{value_header:>value_width$}"));
    out.push_str(header.trim_end());
    out.push('\n');

    let mut rule = String::new();
    for w in &widths {
        rule.push_str(&format!("{:-<w$} ", ""));
    }
    rule.push_str(&format!("{:->value_width$}", ""));
    out.push_str(&rule);
    out.push('\n');

    if table.rows.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }

    for row in &table.rows {
        let mut line = String::new();
        for (key, w) in row.keys.iter().zip(&widths) {
            line.push_str(&format!("{:<w$} ", key.to_string()));
        }
        line.push_str(&format!("{:>value_width$.2}", row.value));
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn kind_name(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Line => "line",
        ChartKind::Bar => "bar",
        ChartKind::Pie => "pie",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{group_by, Dimension, Measure, Reducer};
    use crate::domain::{SalesRecord, SalesTable, Selection};
    use crate::report::build_report;

    fn rec(year: i32, vt: &str, sales: f64) -> SalesRecord {
        SalesRecord {
            year,
            month: "Jan".to_string(),
            automobile_sales: sales,
            vehicle_type: vt.to_string(),
            advertising_expenditure: 10.0,
            unemployment_rate: 5.5,
            recession: true,
        }
    }

    #[test]
    fn table_is_aligned() {
        let data = vec![rec(1980, "Sports", 10.0), rec(1980, "Trucks", 20.0)];
        let refs: Vec<&SalesRecord> = data.iter().collect();
        let table = group_by(&refs, &[Dimension::VehicleType], Measure::AutomobileSales, Reducer::Mean);
        let expected = concat!(
            "Vehicle_Type mean(Automobile_Sales)\n",
            "------------ ----------------------\n",
            "Sports                        10.00\n",
            "Trucks                        20.00\n",
        );
        assert_eq!(format_table(&table), expected);
    }

    #[test]
    fn empty_selection_prints_hint() {
        let table = SalesTable::new(vec![rec(1980, "Sports", 10.0)]);
        let report = build_report(&table, Selection::default());
        let txt = format_report(&report, &FormatOptions::default());
        assert!(txt.starts_with("=== Automobile Sales Statistics Dashboard ===\nReport: Select Statistics\n"));
        assert!(txt.contains("No charts for this selection."));
    }

    #[test]
    fn recession_report_lists_four_charts() {
        let table = SalesTable::new(vec![rec(1980, "Sports", 10.0), rec(1981, "Trucks", 30.0)]);
        let report = build_report(&table, Selection::new(Some(ReportType::Recession), None));
        let txt = format_report(&report, &FormatOptions { plot: false, ..FormatOptions::default() });
        for n in 1..=4 {
            assert!(txt.contains(&format!("[{n}] ")), "missing chart {n}");
        }
        assert!(txt.contains("Effect of Unemployment Rate on Vehicle Type and Sales (bar)"));
        assert!(txt.lines().any(|l| l.starts_with("5.5 ") && l.contains("Sports")));
        assert!(!txt.contains("Plot:"));
    }

    #[test]
    fn line_points_use_index_for_months() {
        let data = vec![rec(1980, "Sports", 10.0)];
        let refs: Vec<&SalesRecord> = data.iter().collect();
        let spec_table = group_by(&refs, &[Dimension::Year], Measure::AutomobileSales, Reducer::Mean);
        assert_eq!(spec_table.rows[0].keys[0].as_f64(), Some(1980.0));
        let table = SalesTable::new(data.clone());
        let report = build_report(&table, Selection::new(Some(ReportType::Yearly), Some(1980)));
        let monthly = &report.rows[0].charts[1];
        assert_eq!(monthly.line_points(), vec![(0.0, 10.0)]);
        let yearly = &report.rows[0].charts[0];
        assert_eq!(yearly.line_points(), vec![(1980.0, 10.0)]);
    }
}
