//! Chart rendering for the dashboard grid.
//!
//! Each `ChartSpec` is drawn into its own bordered cell:
//! - line charts through the Plotters widget
//! - bar charts with Ratatui's `BarChart`, or stacked columns on a `Canvas`
//!   when the chart has a color column
//! - pie charts on a Braille `Canvas`, with a share legend beside the disc

use std::f64::consts::TAU;

use plotters::style::RGBColor;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Bar, BarChart, BarGroup, Block, Borders, Paragraph,
    },
    Frame,
};

use crate::aggregate::{AggregateTable, KeyValue};
use crate::report::{ChartKind, ChartSpec};

use super::plotters_chart::{line_bounds, LineChartWidget};

/// Series colors, cycled by category index.
const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Red,
    Color::Blue,
];

fn palette(idx: usize) -> Color {
    PALETTE[idx % PALETTE.len()]
}

/// Draw one chart (title block included) into `area`.
pub fn draw_chart(frame: &mut Frame<'_>, area: Rect, spec: &ChartSpec) {
    let block = Block::default()
        .title(Span::styled(spec.title.clone(), Style::default().fg(Color::White)))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if spec.data.is_empty() {
        let msg = Paragraph::new("No data for this selection.").style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, inner);
        return;
    }

    match spec.kind {
        ChartKind::Line => draw_line(frame, inner, spec),
        ChartKind::Bar if spec.color.is_some() => draw_stacked_bars(frame, inner, spec),
        ChartKind::Bar => draw_bars(frame, inner, spec),
        ChartKind::Pie => draw_pie(frame, inner, spec),
    }
}

fn draw_line(frame: &mut Frame<'_>, area: Rect, spec: &ChartSpec) {
    let points = spec.line_points();
    let (x_bounds, y_bounds) = line_bounds(&points);

    // Month labels are categorical: points sit at their index, ticks show the names.
    let categories: Option<Vec<String>> = spec
        .data
        .rows
        .first()
        .and_then(|r| r.keys.first())
        .filter(|k| k.as_f64().is_none())
        .map(|_| spec.data.rows.iter().map(|r| first_key_label(&r.keys)).collect());

    let widget = LineChartWidget {
        points: &points,
        x_bounds,
        y_bounds,
        x_label: spec.axis_label(spec.x),
        y_label: spec.axis_label(spec.y),
        x_categories: categories.as_deref(),
        color: RGBColor(0, 255, 255),
    };
    frame.render_widget(widget, area);
}

fn draw_bars(frame: &mut Frame<'_>, area: Rect, spec: &ChartSpec) {
    let values = spec.labelled_values();
    let bars: Vec<Bar> = values
        .iter()
        .enumerate()
        .map(|(idx, (label, value))| {
            Bar::default()
                .label(Line::from(label.clone()))
                .value(bar_height(*value))
                .text_value(format!("{value:.1}"))
                .style(Style::default().fg(palette(idx)))
        })
        .collect();

    let bar_width = fit_bar_width(area.width, bars.len(), 1, 0, 0);
    let chart = BarChart::default()
        .bar_width(bar_width)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn draw_stacked_bars(frame: &mut Frame<'_>, area: Rect, spec: &ChartSpec) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let columns = stacked_columns(&spec.data);
    let series = spec.data.distinct_keys(1);
    let n = columns.len().max(1) as f64;
    let peak = columns
        .iter()
        .filter_map(|c| c.segments.last().map(|&(_, _, top)| top))
        .fold(0.0, f64::max);
    let y_max = if peak > 0.0 { peak * 1.05 } else { 1.0 };

    // One vertical line per terminal column keeps each segment solid.
    let step = n / f64::from(chunks[0].width.max(1));
    let canvas = Canvas::default()
        .marker(Marker::HalfBlock)
        .x_bounds([0.0, n])
        .y_bounds([0.0, y_max])
        .paint(|ctx| {
            for (i, column) in columns.iter().enumerate() {
                let left = i as f64 + 0.15;
                let right = i as f64 + 0.85;
                for &(series_idx, bottom, top) in &column.segments {
                    if top <= bottom {
                        continue;
                    }
                    let mut x = left;
                    while x <= right {
                        ctx.draw(&CanvasLine {
                            x1: x,
                            y1: bottom,
                            x2: x,
                            y2: top,
                            color: palette(series_idx),
                        });
                        x += step;
                    }
                }
            }
        });
    frame.render_widget(canvas, chunks[0]);

    let label_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            (0..columns.len())
                .map(|_| Constraint::Ratio(1, columns.len() as u32))
                .collect::<Vec<_>>(),
        )
        .split(chunks[1]);
    for (column, cell) in columns.iter().zip(label_areas.iter()) {
        let label = Paragraph::new(column.label.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(label, *cell);
    }

    let legend_title = spec.color.map(|c| spec.axis_label(c)).unwrap_or_default();
    let mut legend = vec![Span::styled(
        format!("{legend_title}: "),
        Style::default().fg(Color::Gray),
    )];
    for (idx, key) in series.iter().enumerate() {
        legend.push(Span::styled("■ ", Style::default().fg(palette(idx))));
        legend.push(Span::raw(format!("{key}  ")));
    }
    frame.render_widget(Paragraph::new(Line::from(legend)), chunks[2]);
}

/// One column of a stacked bar chart.
#[derive(Debug, Clone, PartialEq)]
struct StackedColumn {
    label: String,
    /// `(series index, bottom, top)`, stacked upwards from zero.
    segments: Vec<(usize, f64, f64)>,
}

/// Stack each group's values on top of each other; negative values add nothing.
fn stacked_columns(table: &AggregateTable) -> Vec<StackedColumn> {
    grouped_series(table)
        .into_iter()
        .map(|(label, bars)| {
            let mut top = 0.0;
            let segments = bars
                .into_iter()
                .map(|(series_idx, value)| {
                    let bottom = top;
                    if value.is_finite() && value > 0.0 {
                        top += value;
                    }
                    (series_idx, bottom, top)
                })
                .collect();
            StackedColumn { label, segments }
        })
        .collect()
}

/// Rows of a two-key table grouped by the first key.
///
/// Each group holds `(series index, value)` pairs, where the series index is
/// the position of the second key among all distinct second keys, so the same
/// vehicle type keeps the same color in every group.
fn grouped_series(table: &AggregateTable) -> Vec<(String, Vec<(usize, f64)>)> {
    let series = table.distinct_keys(1);
    let mut groups: Vec<(String, Vec<(usize, f64)>)> = Vec::new();
    for row in &table.rows {
        let group_label = first_key_label(&row.keys);
        let series_idx = row
            .keys
            .get(1)
            .and_then(|k| series.iter().position(|s| s == k))
            .unwrap_or(0);
        let same_group = groups.last().is_some_and(|(label, _)| *label == group_label);
        if same_group {
            if let Some((_, bars)) = groups.last_mut() {
                bars.push((series_idx, row.value));
            }
        } else {
            groups.push((group_label, vec![(series_idx, row.value)]));
        }
    }
    groups
}

fn draw_pie(frame: &mut Frame<'_>, area: Rect, spec: &ChartSpec) {
    let slices = pie_slices(&spec.data);

    // Terminal cells are about twice as tall as wide; keep the disc round.
    let disc_width = (area.height.saturating_mul(2)).min(area.width / 2).max(4);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(disc_width), Constraint::Min(0)])
        .split(area);

    let wedges: Vec<Vec<(f64, f64)>> = slices
        .iter()
        .map(|s| wedge_points(s.start, s.end))
        .collect();

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            for (idx, coords) in wedges.iter().enumerate() {
                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: palette(idx),
                });
            }
        });
    frame.render_widget(canvas, chunks[0]);

    let legend: Vec<Line> = slices
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(palette(idx))),
                Span::raw(format!("{} {:.1}% ({:.0})", s.label, s.share * 100.0, s.value)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(legend), chunks[1]);
}

#[derive(Debug, Clone, PartialEq)]
struct PieSlice {
    label: String,
    value: f64,
    share: f64,
    /// Start/end angle in radians, counter-clockwise from 12 o'clock.
    start: f64,
    end: f64,
}

fn pie_slices(table: &AggregateTable) -> Vec<PieSlice> {
    let total: f64 = table.rows.iter().map(|r| r.value.max(0.0)).sum();
    if !(total.is_finite() && total > 0.0) {
        return Vec::new();
    }

    let mut start = 0.0;
    table
        .rows
        .iter()
        .map(|row| {
            let share = row.value.max(0.0) / total;
            let end = start + share * TAU;
            let slice = PieSlice {
                label: first_key_label(&row.keys),
                value: row.value,
                share,
                start,
                end,
            };
            start = end;
            slice
        })
        .collect()
}

/// Sample points filling the wedge between two angles of the unit disc.
fn wedge_points(start: f64, end: f64) -> Vec<(f64, f64)> {
    const RADIAL_STEPS: usize = 24;
    const ANGLE_STEP: f64 = 0.02;

    let mut out = Vec::new();
    let mut angle = start;
    while angle < end {
        // 12 o'clock origin: x = sin, y = cos.
        let (sin, cos) = angle.sin_cos();
        for i in 1..=RADIAL_STEPS {
            let r = i as f64 / RADIAL_STEPS as f64;
            out.push((r * sin, r * cos));
        }
        angle += ANGLE_STEP;
    }
    out
}

fn first_key_label(keys: &[KeyValue]) -> String {
    keys.first().map(ToString::to_string).unwrap_or_default()
}

/// Bar heights are integers; negative or non-finite values draw as empty bars.
fn bar_height(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Widest bar that fits `bars` bars (plus gaps) into `width` columns, between 1 and 12.
fn fit_bar_width(width: u16, bars: usize, bar_gap: u16, groups: usize, group_gap: u16) -> u16 {
    if bars == 0 {
        return 1;
    }
    let gaps = bars as u64 * u64::from(bar_gap) + groups as u64 * u64::from(group_gap);
    let free = u64::from(width).saturating_sub(gaps);
    (free / bars as u64).clamp(1, 12) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{group_by, Dimension, Measure, Reducer};
    use crate::domain::{ReportType, SalesRecord, SalesTable, Selection};
    use crate::report::build_report;
    use ratatui::{backend::TestBackend, Terminal};

    fn rec(vt: &str, unemp: f64, sales: f64, adv: f64) -> SalesRecord {
        SalesRecord {
            year: 1980,
            month: "Jan".to_string(),
            automobile_sales: sales,
            vehicle_type: vt.to_string(),
            advertising_expenditure: adv,
            unemployment_rate: unemp,
            recession: true,
        }
    }

    #[test]
    fn pie_slices_cover_the_full_circle() {
        let data = vec![rec("A", 1.0, 0.0, 300.0), rec("B", 1.0, 0.0, 100.0)];
        let refs: Vec<&SalesRecord> = data.iter().collect();
        let table = group_by(&refs, &[Dimension::VehicleType], Measure::AdvertisingExpenditure, Reducer::Sum);
        let slices = pie_slices(&table);
        assert_eq!(slices.len(), 2);
        assert!((slices[0].share - 0.75).abs() < 1e-12);
        assert_eq!(slices[0].start, 0.0);
        assert!((slices[1].end - TAU).abs() < 1e-9);
        assert_eq!(slices[1].label, "B");
    }

    #[test]
    fn wedge_points_stay_inside_unit_disc() {
        let pts = wedge_points(0.0, TAU / 4.0);
        assert!(!pts.is_empty());
        assert!(pts.iter().all(|&(x, y)| x >= -1e-9 && y >= -1e-9 && x * x + y * y <= 1.0 + 1e-9));
    }

    #[test]
    fn grouped_series_keeps_colors_stable_across_groups() {
        let data = vec![
            rec("Sports", 2.0, 10.0, 0.0),
            rec("Trucks", 2.0, 20.0, 0.0),
            rec("Trucks", 5.0, 30.0, 0.0),
        ];
        let refs: Vec<&SalesRecord> = data.iter().collect();
        let table = group_by(
            &refs,
            &[Dimension::UnemploymentRate, Dimension::VehicleType],
            Measure::AutomobileSales,
            Reducer::Mean,
        );
        let groups = grouped_series(&table);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], ("2".to_string(), vec![(0, 10.0), (1, 20.0)]));
        assert_eq!(groups[1], ("5".to_string(), vec![(1, 30.0)]));
    }

    #[test]
    fn stacked_columns_accumulate_per_rate() {
        let data = vec![
            rec("Sports", 2.0, 10.0, 0.0),
            rec("Trucks", 2.0, 20.0, 0.0),
            rec("Trucks", 5.0, 30.0, 0.0),
        ];
        let refs: Vec<&SalesRecord> = data.iter().collect();
        let table = group_by(
            &refs,
            &[Dimension::UnemploymentRate, Dimension::VehicleType],
            Measure::AutomobileSales,
            Reducer::Mean,
        );
        let columns = stacked_columns(&table);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].label, "2");
        assert_eq!(columns[0].segments, vec![(0, 0.0, 10.0), (1, 10.0, 30.0)]);
        assert_eq!(columns[1].segments, vec![(1, 0.0, 30.0)]);
    }

    #[test]
    fn unemployment_chart_draws_stacked_columns_with_legend() {
        let table = SalesTable::new(vec![
            rec("Sports", 2.0, 10.0, 0.0),
            rec("Trucks", 2.0, 20.0, 0.0),
            rec("Trucks", 5.0, 30.0, 0.0),
        ]);
        let report = build_report(&table, Selection::new(Some(ReportType::Recession), None));
        let chart = &report.rows[1].charts[1];
        assert_eq!(chart.kind, ChartKind::Bar);

        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal.draw(|f| draw_chart(f, f.area(), chart)).unwrap();
        let text: String = terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();

        assert!(text.contains("Vehicle_Type: "));
        assert!(text.contains("Sports"));
        assert!(text.contains("Trucks"));
        // Both rate groups get a column, each filled with half-block cells.
        assert!(text.contains('█') || text.contains('▀') || text.contains('▄'));
    }

    #[test]
    fn bar_sizing() {
        assert_eq!(bar_height(12.6), 13);
        assert_eq!(bar_height(-3.0), 0);
        assert_eq!(fit_bar_width(40, 4, 1, 0, 0), 9);
        assert_eq!(fit_bar_width(200, 2, 1, 0, 0), 12);
        assert_eq!(fit_bar_width(10, 50, 0, 10, 1), 1);
        assert_eq!(fit_bar_width(10, 0, 0, 0, 0), 1);
    }
}
