//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks in a terminal or a CI log
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - line charts: `o` at each data point, joined by `-`
//! - bar charts: one `#` bar per category
//! - pie charts: one `%` bar per slice, scaled to its share of the total

/// Render a line plot for `(x, y)` points, in the given order.
pub fn render_line_plot(points: &[(f64, f64)], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = range(points.iter().map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = range(points.iter().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    let mapped: Vec<(usize, usize)> = points
        .iter()
        .map(|&(x, y)| (map_x(x, x_min, x_max, width), map_y(y, y_min, y_max, height)))
        .collect();

    // Segments first so points can overlay.
    for pair in mapped.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        draw_line(&mut grid, x0, y0, x1, y1, '-');
    }
    for &(x, y) in &mapped {
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.2}, {x_max:.2}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

/// Render labelled horizontal bars, scaled so the largest value fills `width`.
pub fn render_bars(bars: &[(String, f64)], width: usize) -> String {
    render_horizontal(bars, width, '#', |v| format!("{v:.2}"))
}

/// Render pie slices as horizontal bars of their percentage share.
pub fn render_shares(slices: &[(String, f64)], width: usize) -> String {
    let total: f64 = slices.iter().map(|s| s.1).sum();
    if !(total.is_finite() && total > 0.0) {
        return "(no data)\n".to_string();
    }
    let shares: Vec<(String, f64)> = slices
        .iter()
        .map(|(label, v)| (label.clone(), v / total * 100.0))
        .collect();
    render_horizontal(&shares, width, '%', |v| format!("{v:.1}%"))
}

fn render_horizontal(
    bars: &[(String, f64)],
    width: usize,
    fill: char,
    fmt_value: impl Fn(f64) -> String,
) -> String {
    if bars.is_empty() {
        return "(no data)\n".to_string();
    }
    let width = width.max(10);
    let label_width = bars.iter().map(|b| b.0.chars().count()).max().unwrap_or(0);
    let max = bars.iter().map(|b| b.1).fold(0.0_f64, f64::max);

    let mut out = String::new();
    for (label, value) in bars {
        let len = if max > 0.0 && value.is_finite() && *value > 0.0 {
            ((value / max) * width as f64).round() as usize
        } else {
            0
        };
        let bar: String = std::iter::repeat_n(fill, len).collect();
        out.push_str(&format!(
            "{label:<label_width$} | {bar} {}\n",
            fmt_value(*value)
        ));
    }
    out
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max > min {
        Some((min, max))
    } else {
        Some((min - 0.5, max + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
