//! Ratatui-based terminal UI.
//!
//! A sidebar lists the dashboard analyses; the body stacks one Plotters chart
//! per panel of the selected analysis. The records are loaded once and the
//! panels are recomputed whenever the analysis or metric changes.

use std::fs::create_dir_all;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::pipeline::{AnalysisOutput, Panel, run_analysis};
use crate::domain::{Analysis, DashboardConfig, Record};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::PanelChart;

/// Directory the `e` key writes panel CSVs into.
const EXPORT_DIR: &str = "exports";

/// Start the TUI.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    // Load before touching the terminal so load errors print normally.
    let records = crate::io::ingest::load_records(&config.data_path)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, records);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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

struct App {
    config: DashboardConfig,
    records: Vec<Record>,
    selected: usize,
    status: String,
    output: Option<AnalysisOutput>,
}

impl App {
    fn new(config: DashboardConfig, records: Vec<Record>) -> Self {
        let mut app = Self {
            config,
            records,
            selected: 0,
            status: String::new(),
            output: None,
        };
        app.recompute();
        app
    }

    fn analysis(&self) -> Analysis {
        Analysis::ALL[self.selected]
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
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
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                    self.recompute();
                }
            }
            KeyCode::Down => {
                if self.selected + 1 < Analysis::ALL.len() {
                    self.selected += 1;
                    self.recompute();
                }
            }
            KeyCode::Char('m') => {
                self.config.metric = self.config.metric.next();
                self.recompute();
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
        false
    }

    /// Recompute the selected analysis. Failures land in the status line and
    /// return `false`.
    fn recompute(&mut self) -> bool {
        let analysis = self.analysis();
        match run_analysis(&self.records, analysis, self.config.metric) {
            Ok(output) => {
                self.status = format!("{} | metric: {}", analysis.title(), self.config.metric.name());
                self.output = Some(output);
                true
            }
            Err(err) => {
                let err = AppError::from(err);
                tracing::warn!(analysis = analysis.slug(), error = %err, "analysis failed");
                self.status = format!("{}: {err}", analysis.title());
                self.output = None;
                false
            }
        }
    }

    fn reload(&mut self) {
        match crate::io::ingest::load_records(&self.config.data_path) {
            Ok(records) => {
                self.records = records;
                if self.recompute() {
                    self.status = format!("Reloaded {} records.", self.records.len());
                }
            }
            Err(err) => {
                let err = AppError::from(err);
                tracing::warn!(error = %err, "reload failed");
                self.status = format!("Reload failed: {err}");
            }
        }
    }

    fn export(&mut self) {
        let Some(output) = &self.output else {
            self.status = "Nothing to export.".to_string();
            return;
        };
        match export_panels(output) {
            Ok(paths) => {
                let names: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                self.status = format!("Exported: {}", names.join(", "));
            }
            Err(err) => {
                self.status = format!("Export failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled("bikes", Style::default().fg(Color::Cyan)),
                Span::raw(" | Bike Sharing Data Analysis"),
            ]),
            Line::from(Span::styled(
                format!(
                    "data: {} | records: {} | metric: {}",
                    self.config.data_path.display(),
                    self.records.len(),
                    self.config.metric.name(),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(0)])
            .split(area);

        self.draw_sidebar(frame, chunks[0]);
        self.draw_panels(frame, chunks[1]);
    }

    fn draw_sidebar(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = Analysis::ALL
            .iter()
            .map(|a| ListItem::new(a.title()))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Analysis").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_panels(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(output) = &self.output else {
            let block = Block::default().title(self.analysis().title()).borders(Borders::ALL);
            let msg = Paragraph::new("No chart: see the status line.")
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let n = output.panels.len().max(1) as u32;
        let constraints: Vec<Constraint> = output.panels.iter().map(|_| Constraint::Ratio(1, n)).collect();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (panel, &rect) in output.panels.iter().zip(chunks.iter()) {
            draw_panel(frame, rect, panel, output.metric.axis_label());
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ analysis  m metric  e export  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_panel(frame: &mut ratatui::Frame<'_>, area: Rect, panel: &Panel, y_label: &str) {
    let block = Block::default().title(panel.title.as_str()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let ticks: Vec<String> = panel.rows.iter().map(|r| r.group_key.tick_label()).collect();
    let values: Vec<f64> = panel.rows.iter().map(|r| r.mean_count).collect();
    let widget = PanelChart {
        kind: panel.kind,
        ticks: &ticks,
        values: &values,
        x_label: panel.dimension.axis_label(),
        y_label,
    };
    frame.render_widget(widget, inner);
}

/// Write every panel of `output` to `exports/bikes_<analysis>_<dimension>_<ts>.csv`.
fn export_panels(output: &AnalysisOutput) -> Result<Vec<PathBuf>, AppError> {
    let dir = PathBuf::from(EXPORT_DIR);
    create_dir_all(&dir).map_err(|e| AppError::new(4, format!("Failed to create export dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let mut paths = Vec::with_capacity(output.panels.len());
    for panel in &output.panels {
        let path = dir.join(format!(
            "bikes_{}_{}_{ts}.csv",
            output.analysis.slug(),
            panel.dimension.name()
        ));
        crate::io::export::write_rows_csv(&path, panel.dimension, output.metric, &panel.rows)?;
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Metric;

    fn config() -> DashboardConfig {
        DashboardConfig {
            data_path: PathBuf::from("unused.csv"),
            metric: Metric::Count,
            plot: false,
            plot_width: 72,
            plot_height: 12,
            export_csv: None,
            export_json: None,
        }
    }

    fn daily() -> Vec<Record> {
        let date = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        vec![Record::new(date, None, 2, 801)]
    }

    #[test]
    fn trends_failure_is_reported_in_status() {
        // Daily data has no hour column, so the trends panels cannot be built.
        let app = App::new(config(), daily());
        assert!(app.output.is_none());
        assert!(app.status.contains("hour"), "status: {}", app.status);
    }

    #[test]
    fn reload_keeps_analysis_error_visible() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day.csv");
        std::fs::write(&path, "dteday,weathersit,cnt\n2011-01-01,2,801\n").unwrap();

        let mut app = App::new(DashboardConfig { data_path: path, ..config() }, Vec::new());
        assert!(app.output.is_some());

        assert!(!app.handle_key(KeyCode::Char('r')));
        assert_eq!(app.records.len(), 1);
        assert!(app.output.is_none());
        assert!(app.status.contains("hour"), "status: {}", app.status);
    }

    #[test]
    fn reload_reports_record_count_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day.csv");
        std::fs::write(&path, "dteday,weathersit,cnt\n2011-01-01,2,801\n2011-01-02,1,131\n").unwrap();

        let mut app = App::new(DashboardConfig { data_path: path, ..config() }, daily());
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.status, "Reloaded 2 records.");
    }

    #[test]
    fn navigation_and_metric_cycling() {
        let mut app = App::new(config(), daily());
        assert!(!app.handle_key(KeyCode::Down));
        assert_eq!(app.analysis(), Analysis::Weather);
        assert!(app.output.is_some());

        assert!(!app.handle_key(KeyCode::Char('m')));
        assert_eq!(app.config.metric, Metric::Casual);
        // No casual column in the fixture: the panel fails without crashing.
        assert!(app.output.is_none());

        assert!(!app.handle_key(KeyCode::Up));
        assert!(!app.handle_key(KeyCode::Up));
        assert_eq!(app.analysis(), Analysis::Trends);
        assert!(app.handle_key(KeyCode::Char('q')));
    }
}
