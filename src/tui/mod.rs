//! Ratatui-based dashboard.
//!
//! The screen mirrors the report layout: a title, the two dropdowns (report
//! type and year), and a grid of charts with two charts per row. Every change
//! to a dropdown re-runs both callbacks: the year-selector enablement rule and
//! the report builder.

use std::io;
use std::time::Duration;

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use tracing::{info, warn};

use crate::app::pipeline::report_for;
use crate::domain::{report_options, ReportType, SalesTable, Selection, YEAR_MAX, YEAR_MIN};
use crate::error::AppError;
use crate::io::export::{default_export_path, write_report_json, EXPORT_DIR};
use crate::report::{year_selector_enabled, Report, DASHBOARD_TITLE};

mod charts;
mod plotters_chart;

/// Title text color (a muted brown).
const TITLE_COLOR: Color = Color::Rgb(0x50, 0x3D, 0x36);

/// Start the dashboard over an already-loaded table.
pub fn run(table: SalesTable, initial: Selection) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(table, initial);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Which dropdown has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Report,
    Year,
}

struct App {
    table: SalesTable,
    /// Index into `report_options()`; 0 is the placeholder.
    report_idx: usize,
    year: Option<i32>,
    focus: Focus,
    year_enabled: bool,
    report: Report,
    status: String,
}

impl App {
    fn new(table: SalesTable, initial: Selection) -> Self {
        let report_idx = initial
            .report_type
            .and_then(|r| report_options().iter().position(|label| *label == r.label()))
            .unwrap_or(0);
        let mut app = Self {
            table,
            report_idx,
            year: initial.year,
            focus: Focus::Report,
            year_enabled: false,
            report: Report {
                selection: Selection::default(),
                rows: Vec::new(),
            },
            status: String::new(),
        };
        app.on_selection_change();
        app.status = format!("Loaded {} rows.", app.table.len());
        app
    }

    fn report_label(&self) -> &'static str {
        report_options()[self.report_idx]
    }

    fn selection(&self) -> Selection {
        Selection::new(ReportType::from_label(self.report_label()), self.year)
    }

    /// Re-run both callbacks for the current dropdown values.
    fn on_selection_change(&mut self) {
        let selection = self.selection();
        self.year_enabled = year_selector_enabled(selection.report_type);
        if !self.year_enabled && self.focus == Focus::Year {
            self.focus = Focus::Report;
        }
        self.report = report_for(&self.table, selection);
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        info!("dashboard closed");
        Ok(())
    }

    /// Apply a key press. Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.toggle_focus(),
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::PageUp => self.adjust_year(10),
            KeyCode::PageDown => self.adjust_year(-10),
            KeyCode::Backspace | KeyCode::Delete => {
                if self.focus == Focus::Year && self.year.is_some() {
                    self.year = None;
                    self.on_selection_change();
                    self.status = "Year cleared.".to_string();
                }
            }
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
        false
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Report if self.year_enabled => Focus::Year,
            _ => Focus::Report,
        };
    }

    fn adjust(&mut self, delta: i32) {
        match self.focus {
            Focus::Report => {
                let n = report_options().len();
                self.report_idx = if delta >= 0 {
                    (self.report_idx + 1) % n
                } else {
                    (self.report_idx + n - 1) % n
                };
                self.on_selection_change();
                self.status = format!("Report: {}", self.report_label());
            }
            Focus::Year => self.adjust_year(delta),
        }
    }

    fn adjust_year(&mut self, delta: i32) {
        if !self.year_enabled || self.focus != Focus::Year {
            return;
        }
        let next = match self.year {
            None if delta >= 0 => YEAR_MIN,
            None => YEAR_MAX,
            Some(y) => (y + delta).clamp(YEAR_MIN, YEAR_MAX),
        };
        self.year = Some(next);
        self.on_selection_change();
        self.status = format!("Year: {next}");
    }

    fn export(&mut self) {
        if self.report.is_empty() {
            self.status = "Nothing to export for this selection.".to_string();
            return;
        }
        let path = default_export_path(std::path::Path::new(EXPORT_DIR), &self.report.selection, Local::now());
        match write_report_json(&path, &self.report) {
            Ok(()) => self.status = format!("Exported {}", path.display()),
            Err(err) => {
                warn!(error = %err, "export failed");
                self.status = format!("Export failed: {err}");
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.draw_title(frame, chunks[0]);
        self.draw_controls(frame, chunks[1]);
        self.draw_output(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_title(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = Paragraph::new(Line::from(Span::styled(
            DASHBOARD_TITLE,
            Style::default().fg(TITLE_COLOR).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, area);
    }

    fn draw_controls(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let focused = Style::default().fg(Color::Black).bg(Color::White);
        let normal = Style::default().fg(Color::White);
        let disabled = Style::default().fg(Color::DarkGray);

        let report_style = if self.focus == Focus::Report { focused } else { normal };
        let report = Paragraph::new(Line::from(Span::styled(
            format!("◀ {} ▶", self.report_label()),
            report_style,
        )))
        .alignment(Alignment::Center)
        .block(Block::default().title("Select Statistics:").borders(Borders::ALL));
        frame.render_widget(report, chunks[0]);

        let year_text = match self.year {
            Some(y) => format!("◀ {y} ▶"),
            None => "Select Year".to_string(),
        };
        let (year_style, year_title) = if !self.year_enabled {
            (disabled, "Year (disabled)")
        } else if self.focus == Focus::Year {
            (focused, "Year")
        } else {
            (normal, "Year")
        };
        let year = Paragraph::new(Line::from(Span::styled(year_text, year_style)))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(year_title)
                    .borders(Borders::ALL)
                    .border_style(if self.year_enabled { normal } else { disabled }),
            );
        frame.render_widget(year, chunks[1]);
    }

    fn draw_output(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        if self.report.is_empty() {
            let hint = match self.selection().report_type {
                Some(ReportType::Yearly) => "Select a year to see the yearly statistics.",
                _ => "Select a report type to see the charts.",
            };
            let msg = Paragraph::new(hint)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(msg, area);
            return;
        }

        let n = self.report.rows.len() as u32;
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints((0..n).map(|_| Constraint::Ratio(1, n)).collect::<Vec<_>>())
            .split(area);

        for (row, row_area) in self.report.rows.iter().zip(row_areas.iter()) {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(*row_area);
            for (chart, cell) in row.charts.iter().zip(cells.iter()) {
                charts::draw_chart(frame, *cell, chart);
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab/↑/↓ focus  ←/→ change  PgUp/PgDn ±10y  Bksp clear year  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
