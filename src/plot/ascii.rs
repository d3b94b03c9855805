//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - bar charts: `#` columns over a `-` baseline, one column per category
//! - line charts: `o` at each group, joined by `-`

use crate::domain::{AggregateRow, ChartKind};

/// Render a chart for ordered aggregate rows.
pub fn render_ascii_chart(
    title: &str,
    kind: ChartKind,
    rows: &[AggregateRow],
    width: usize,
    height: usize,
) -> String {
    let points: Vec<(String, f64)> = rows
        .iter()
        .map(|r| (r.group_key.tick_label(), r.mean_count))
        .collect();
    render_points(title, kind, &points, width, height)
}

/// Render a chart from `(tick label, value)` pairs (e.g. a saved rows JSON).
pub fn render_points(
    title: &str,
    kind: ChartKind,
    points: &[(String, f64)],
    width: usize,
    height: usize,
) -> String {
    if points.is_empty() {
        return format!("Plot: {title} | (no data)\n");
    }
    match kind {
        ChartKind::Bar => render_bars(title, points, height),
        ChartKind::Line => render_line(title, points, width, height),
    }
}

fn render_bars(title: &str, points: &[(String, f64)], height: usize) -> String {
    let height = height.max(2);
    let col_width = points
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(1)
        .max(1);

    let y_max = points.iter().map(|&(_, v)| v).fold(0.0_f64, f64::max);
    let filled: Vec<usize> = points
        .iter()
        .map(|&(_, v)| bar_height(v, y_max, height))
        .collect();

    let mut out = String::new();
    out.push_str(&format!("Plot: {title} | y=[0.00, {y_max:.2}]\n"));

    for level in (1..=height).rev() {
        let line = filled
            .iter()
            .map(|&f| if f >= level { "#".repeat(col_width) } else { " ".repeat(col_width) })
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let total = points.len() * col_width + points.len().saturating_sub(1);
    out.push_str(&"-".repeat(total));
    out.push('\n');

    let labels = points
        .iter()
        .map(|(label, _)| format!("{label:<col_width$}"))
        .collect::<Vec<_>>()
        .join(" ");
    out.push_str(labels.trim_end());
    out.push('\n');

    out
}

/// Rows filled for `v` on a 0-based axis; any positive value shows at least one.
fn bar_height(v: f64, y_max: f64, height: usize) -> usize {
    if !(v.is_finite() && y_max > 0.0) || v <= 0.0 {
        return 0;
    }
    let rows = (v / y_max * height as f64).round() as usize;
    rows.clamp(1, height)
}

fn render_line(title: &str, points: &[(String, f64)], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(points).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let n = points.len();
    let coords: Vec<(usize, usize)> = points
        .iter()
        .enumerate()
        .map(|(i, &(_, v))| (map_x(i, n, width), map_y(v, y_min, y_max, height)))
        .collect();

    // Segments first so markers overlay them.
    for pair in coords.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        draw_line(&mut grid, x0, y0, x1, y1, '-');
    }
    for &(x, y) in &coords {
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!("Plot: {title} | y=[{y_min:.2}, {y_max:.2}]\n"));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    // Tick labels under their markers, skipping any that would collide.
    let mut ticks = String::new();
    let mut used = 0usize;
    for ((label, _), &(x, _)) in points.iter().zip(&coords) {
        if used > 0 && x <= used {
            continue;
        }
        ticks.push_str(&" ".repeat(x - used));
        ticks.push_str(label);
        used = x + label.chars().count();
    }
    out.push_str(&ticks);
    out.push('\n');

    out
}

fn y_range(points: &[(String, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() && max_y.is_finite() {
        // Flat series: center it.
        Some((min_y - 1.0, max_y + 1.0))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
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
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
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
