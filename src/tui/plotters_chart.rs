//! Plotters-powered panel chart widget for Ratatui.
//!
//! Plotters draws the axes and mesh; `plotters-ratatui-backend` renders its
//! primitives into the Ratatui buffer.

use plotters::prelude::*;
// `ratatui::style::Color` below shadows the plotters trait `filled()` lives on.
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::ChartKind;

/// A render-only chart of one panel: categories along x, means along y.
///
/// Everything is prepared outside `render()`; the widget only draws.
pub struct PanelChart<'a> {
    pub kind: ChartKind,
    /// Tick label per category, in canonical order.
    pub ticks: &'a [String],
    /// Mean per category, aligned with `ticks`.
    pub values: &'a [f64],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl PanelChart<'_> {
    /// Y bounds from zero to the largest mean plus a little headroom.
    fn y_max(&self) -> f64 {
        let max = self.values.iter().copied().fold(0.0_f64, f64::max);
        if max.is_finite() && max > 0.0 { max * 1.05 } else { 1.0 }
    }
}

impl Widget for PanelChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }
        if self.values.is_empty() {
            buf.set_string(area.x, area.y, "(no data)", Style::default().fg(Color::Yellow));
            return;
        }

        let n = self.values.len();
        let y_max = self.y_max();
        let (x0, x1) = match self.kind {
            // One unit-wide slot per bar.
            ChartKind::Bar => (0.0, n as f64),
            ChartKind::Line => (-0.5, n as f64 - 0.5),
        };
        let x_labels = n.min(12);

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, 0.0..y_max)?;

            let tick_for = |v: &f64| {
                let idx = match self.kind {
                    ChartKind::Bar => v.floor(),
                    ChartKind::Line => v.round(),
                };
                if idx < 0.0 {
                    return String::new();
                }
                self.ticks.get(idx as usize).cloned().unwrap_or_default()
            };

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(x_labels)
                .y_labels(5)
                .x_label_formatter(&tick_for)
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let color = RGBColor(0, 255, 255);
            match self.kind {
                ChartKind::Bar => {
                    chart.draw_series(self.values.iter().enumerate().map(|(i, &v)| {
                        let left = i as f64 + 0.1;
                        let right = i as f64 + 0.9;
                        Rectangle::new([(left, 0.0), (right, v)], color.filled())
                    }))?;
                }
                ChartKind::Line => {
                    let points: Vec<(f64, f64)> = self
                        .values
                        .iter()
                        .enumerate()
                        .map(|(i, &v)| (i as f64, v))
                        .collect();
                    chart.draw_series(LineSeries::new(points.iter().copied(), &color))?;
                    // `Circle` radii are mis-scaled by the ratatui backend; pixels read fine.
                    chart.draw_series(points.iter().map(|&p| Pixel::new(p, WHITE)))?;
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_area_renders_hint_instead_of_panicking() {
        let ticks = vec!["Clear".to_string()];
        let values = [3.0];
        let chart = PanelChart {
            kind: ChartKind::Bar,
            ticks: &ticks,
            values: &values,
            x_label: "weather",
            y_label: "avg rentals",
        };
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "C");
    }

    #[test]
    fn bar_chart_draws_into_a_roomy_area() {
        let ticks = vec!["Clear".to_string(), "Mist".to_string(), "Rain".to_string()];
        let values = [120.0, 80.0, 15.0];
        let chart = PanelChart {
            kind: ChartKind::Bar,
            ticks: &ticks,
            values: &values,
            x_label: "weather",
            y_label: "avg rentals",
        };
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        chart.render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(!text.contains("too small"));
        assert!(text.chars().any(|c| !c.is_whitespace()));
    }

    #[test]
    fn y_axis_gets_headroom() {
        let values = [10.0, 20.0];
        let chart = PanelChart {
            kind: ChartKind::Line,
            ticks: &[],
            values: &values,
            x_label: "",
            y_label: "",
        };
        assert!((chart.y_max() - 21.0).abs() < 1e-9);
    }
}
