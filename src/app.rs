//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and loads `.env`
//! - installs logging
//! - resolves the dataset path
//! - runs the aggregation pipeline
//! - prints tables/plots or hands off to the TUI
//! - writes optional exports

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::picker::{prompt_for_dataset, validate_csv_path};
use crate::cli::{Command, DataArgs, PlotArgs, PlotSizeArgs, ShowArgs, ViewArgs};
use crate::domain::{DashboardConfig, Record};
use crate::error::AppError;
use crate::logging::LogTarget;

pub mod pipeline;

/// Environment variable naming the default dataset.
pub const DATA_ENV: &str = "BIKES_DATA";
/// Dataset used when neither `-f` nor `BIKES_DATA` is given.
pub const DEFAULT_DATA_PATH: &str = "dashboard/main_data.csv";

/// Entry point for the `bikes` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // We want `bikes` and `bikes -f day.csv` to behave like `bikes tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let target = match cli.command {
        Command::Tui(_) => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    let _log_guard = crate::logging::init(target);

    match cli.command {
        Command::Show(args) => handle_show(args),
        Command::View(args) => handle_view(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let mut config = config_from_args(&args.data, &args.plot)?;
    config.export_csv = args.export.clone();
    config.export_json = args.export_json.clone();

    let records = load(&config)?;
    let rows = crate::pipeline::aggregate_ordered(&records, args.by, config.metric)?;
    let title = pipeline::panel_title(args.by, config.metric);

    println!(
        "{}",
        crate::report::format_dataset_summary(&config.data_path, records.len(), config.metric)
    );
    println!("### {title}");
    println!("{}", crate::report::format_rows(&rows, config.metric));

    if config.plot {
        let plot = crate::plot::render_ascii_chart(
            &title,
            args.by.chart_kind(),
            &rows,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    if let Some(path) = &config.export_csv {
        crate::io::export::write_rows_csv(path, args.by, config.metric, &rows)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::rows::write_rows_json(path, &config.data_path, args.by, config.metric, &rows)?;
    }

    Ok(())
}

fn handle_view(args: ViewArgs) -> Result<(), AppError> {
    let config = config_from_args(&args.data, &args.plot)?;
    let records = load(&config)?;
    let output = pipeline::run_analysis(&records, args.analysis, config.metric)?;

    println!(
        "{}",
        crate::report::format_dataset_summary(&config.data_path, records.len(), config.metric)
    );
    println!("{}", crate::report::format_analysis(&output));

    if config.plot {
        for panel in &output.panels {
            let plot = crate::plot::render_ascii_chart(
                &panel.title,
                panel.kind,
                &panel.rows,
                config.plot_width,
                config.plot_height,
            );
            println!("{plot}");
        }
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let doc = crate::io::rows::read_rows_json(&args.rows)?;
    let points: Vec<(String, f64)> = doc.rows.iter().map(|r| (r.tick.clone(), r.mean)).collect();
    let title = pipeline::panel_title(doc.dimension, doc.metric);

    let plot = crate::plot::render_points(
        &title,
        doc.dimension.chart_kind(),
        &points,
        args.width,
        args.height,
    );
    println!("{plot}");
    Ok(())
}

fn handle_tui(args: DataArgs) -> Result<(), AppError> {
    // Resolve before entering raw mode: the picker needs a normal terminal.
    let config = config_from_args(&args, &PlotSizeArgs::default())?;
    crate::tui::run(config)
}

fn load(config: &DashboardConfig) -> Result<Vec<Record>, AppError> {
    Ok(crate::io::ingest::load_records(&config.data_path)?)
}

pub fn config_from_args(data: &DataArgs, plot: &PlotSizeArgs) -> Result<DashboardConfig, AppError> {
    let env_path = std::env::var(DATA_ENV).ok().map(PathBuf::from);
    Ok(DashboardConfig {
        data_path: resolve_data_path(data.file.as_deref(), env_path.as_deref())?,
        metric: data.metric,
        plot: !plot.no_plot,
        plot_width: plot.width,
        plot_height: plot.height,
        export_csv: None,
        export_json: None,
    })
}

/// `-f` > `BIKES_DATA` > `dashboard/main_data.csv` > interactive picker.
fn resolve_data_path(flag: Option<&Path>, env: Option<&Path>) -> Result<PathBuf, AppError> {
    if let Some(path) = flag.or(env) {
        return validate_csv_path(path);
    }
    let default = Path::new(DEFAULT_DATA_PATH);
    if default.is_file() {
        return Ok(default.to_path_buf());
    }
    tracing::debug!(default = DEFAULT_DATA_PATH, "default dataset missing; prompting");
    prompt_for_dataset()
}

/// Rewrite argv so `bikes` defaults to `bikes tui`.
///
/// Rules:
/// - `bikes`                       -> `bikes tui`
/// - `bikes -f day.csv ...`        -> `bikes tui -f day.csv ...`
/// - `bikes --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "show" | "view" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
