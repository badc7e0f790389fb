pub mod chart;
pub mod classify;
pub mod cli;
pub mod data;
pub mod error;
pub mod insights;
pub mod io_utils;
pub mod normalize;
pub mod source;
pub mod table;
pub mod trend;
pub mod upload;
pub mod view;

use std::{env, io::Write, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, debug, error, info, warn};
use serde::Serialize;

use crate::{
    chart::ChartSelection,
    cli::{Cli, Commands, InputArgs, OutputFormat},
    error::LoadError,
    insights::Insights,
    upload::{LoadOptions, Upload},
    view::{SortDirective, ViewState},
};

/// Exit status for input the user can fix (bad type, empty, undecodable).
pub const EXIT_INPUT_ERROR: i32 = 2;
/// Exit status for everything else.
pub const EXIT_FAILURE: i32 = 1;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sheet_insights", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Load(args) => handle_load(&args),
        Commands::Profile(args) => handle_profile(&args),
        Commands::Charts(args) => handle_charts(&args),
        Commands::View(args) => handle_view(&args),
    }
}

/// Turns a failed run into output and an exit status. Load errors are the
/// caller's to fix and get the `{error, details}` body; anything else is
/// logged in full and reported briefly.
pub fn report_failure(err: &anyhow::Error) -> i32 {
    if let Some(load_error) = err.downcast_ref::<LoadError>() {
        warn!("{load_error}. {}", load_error.remediation());
        match serde_json::to_string(&load_error.to_response()) {
            Ok(body) => println!("{body}"),
            Err(_) => eprintln!("error: {load_error}"),
        }
        EXIT_INPUT_ERROR
    } else {
        error!("Unexpected failure: {err:?}");
        eprintln!("error: {err}");
        EXIT_FAILURE
    }
}

fn load_upload(source: &InputArgs) -> Result<Upload> {
    let encoding = io_utils::resolve_encoding(source.input_encoding.as_deref())?;
    let options = LoadOptions {
        content_type: source.content_type.as_deref(),
        delimiter: source.delimiter,
        encoding,
    };
    upload::load_path(&source.input, &options)
}

fn handle_load(args: &cli::LoadArgs) -> Result<()> {
    let upload = load_upload(&args.source)?;
    let response = upload.response();
    let body = if args.pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    }
    .context("Serializing upload payload")?;
    write_output(args.source.output.as_deref(), &body)
}

fn handle_profile(args: &cli::ProfileArgs) -> Result<()> {
    let upload = load_upload(&args.source)?;
    let insights = Insights::from_table(&upload.table);
    info!(
        "Profiled {} column(s): {} numeric, {} categorical, {} trend(s)",
        insights.classification.len(),
        insights.numeric_columns.len(),
        insights.categorical_columns.len(),
        insights.trends.len()
    );
    let body = match args.format {
        OutputFormat::Table => {
            let mut body =
                table::render_table(&Insights::table_headers(), &insights.table_rows());
            body.push('\n');
            for line in insights.summary_lines() {
                body.push_str(&line);
                body.push('\n');
            }
            body
        }
        other => serialize(&insights, other)?,
    };
    write_output(args.source.output.as_deref(), &body)
}

fn handle_charts(args: &cli::ChartsArgs) -> Result<()> {
    if args.format == OutputFormat::Table {
        return Err(anyhow!("Chart data can only be written as json or yaml"));
    }
    let upload = load_upload(&args.source)?;
    let insights = Insights::from_table(&upload.table);
    let selection = ChartSelection {
        bar: args.bar_column.clone(),
        pie: args.pie_column.clone(),
        scatter_x: args.scatter_x.clone(),
        scatter_y: args.scatter_y.clone(),
    };
    debug!("Chart selection: {selection:?}");
    let projection = chart::project(&upload.table, &insights.classification, &selection);
    if projection.charts().is_none() {
        info!("No numeric data found in '{}'; charts suppressed", upload.filename);
    }
    let body = serialize(&projection, args.format)?;
    write_output(args.source.output.as_deref(), &body)
}

fn handle_view(args: &cli::ViewArgs) -> Result<()> {
    let upload = load_upload(&args.source)?;
    let table = &upload.table;
    let filters = view::parse_column_filters(&args.filters)?;
    for filter in &filters {
        if !table.columns.contains(&filter.column) {
            return Err(anyhow!("Column '{}' not found for filter", filter.column));
        }
    }
    let sort = if args.no_sort {
        None
    } else if let Some(spec) = &args.sort {
        let directive = SortDirective::parse(spec)?;
        if !table.columns.contains(&directive.column) {
            return Err(anyhow!("Column '{}' not found for sort", directive.column));
        }
        Some(directive)
    } else {
        ViewState::for_table(table).sort
    };
    let mut state = ViewState::default()
        .with_search(args.search.clone())
        .with_sort(sort);
    for filter in filters {
        state = state.with_filter(filter.column, filter.text);
    }

    let mut rows = view::apply_view(table, &state);
    info!(
        "{} of {} rows · {} columns",
        rows.len(),
        table.row_count(),
        table.columns.len()
    );
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }
    let body = match args.format {
        OutputFormat::Table => table::render_records(table, &rows),
        OutputFormat::Json => serde_json::to_string(&rows).context("Serializing rows")?,
        OutputFormat::Yaml => serialize(&rows, OutputFormat::Yaml)?,
    };
    write_output(args.source.output.as_deref(), &body)
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json | OutputFormat::Table => {
            serde_json::to_string_pretty(value).context("Serializing JSON output")
        }
        OutputFormat::Yaml => serde_yaml::to_string(value).context("Serializing YAML output"),
    }
}

fn write_output(path: Option<&std::path::Path>, body: &str) -> Result<()> {
    let mut writer = io_utils::open_output(path)?;
    writer.write_all(body.as_bytes()).context("Writing output")?;
    if !body.ends_with('\n') {
        writer.write_all(b"\n").context("Writing output")?;
    }
    writer.flush().context("Flushing output")?;
    if let Some(path) = path {
        info!("Output written to {path:?}");
    }
    Ok(())
}
