//! Command-line parsing for the bike-sharing dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the aggregation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Analysis, Dimension, Metric};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bikes", version, about = "Bike Sharing Data Analysis dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Average a metric over one dimension and print the ordered table and chart.
    Show(ShowArgs),
    /// Print one of the dashboard analyses (all of its charts).
    View(ViewArgs),
    /// Plot a previously exported rows JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// The sidebar lists the analyses; each one is computed with the same
    /// pipeline as `bikes view` and drawn with Plotters.
    Tui(DataArgs),
}

/// Dataset selection shared by every data-reading command.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// CSV dataset. Defaults to `$BIKES_DATA`, then `dashboard/main_data.csv`.
    #[arg(short = 'f', long = "file", value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Which rental column to average.
    #[arg(short = 'm', long, value_enum, default_value_t = Metric::Count)]
    pub metric: Metric,
}

/// Chart size options for terminal output.
#[derive(Debug, Args, Clone)]
pub struct PlotSizeArgs {
    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns), used by line charts.
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,
}

impl Default for PlotSizeArgs {
    fn default() -> Self {
        Self {
            no_plot: false,
            width: 72,
            height: 12,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Dimension to group by: hour, weekday, month, weather_category, time_of_day.
    #[arg(short = 'b', long = "by", value_parser = parse_dimension)]
    pub by: Dimension,

    #[command(flatten)]
    pub plot: PlotSizeArgs,

    /// Export the ordered rows to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the ordered rows to JSON (re-plottable with `bikes plot`).
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    /// Analysis to print.
    #[arg(value_enum, default_value_t = Analysis::Trends)]
    pub analysis: Analysis,

    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub plot: PlotSizeArgs,
}

/// Options for plotting a saved rows file.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Rows JSON file produced by `bikes show --export-json`.
    #[arg(long, value_name = "JSON")]
    pub rows: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,
}

fn parse_dimension(s: &str) -> Result<Dimension, String> {
    s.parse::<Dimension>().map_err(|e| e.to_string())
}
