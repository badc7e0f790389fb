use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Turn spreadsheets and CSV files into searchable tables and chart data",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a file and emit the upload payload (columns + rows) as JSON
    Load(LoadArgs),
    /// Classify columns and report time-like columns and trends
    Profile(ProfileArgs),
    /// Project the table into bar, line, pie and scatter chart data
    Charts(ChartsArgs),
    /// Search, filter and sort the table
    View(ViewArgs),
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Spreadsheet (.xlsx, .xls, .ods) or delimited (.csv, .tsv) file; `-` reads stdin
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Declared MIME type, consulted when the extension is not recognised
    #[arg(long = "content-type")]
    pub content_type: Option<String>,
    /// Delimiter for text input (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of text input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Write output to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Pretty-print the JSON payload
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ChartsArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Numeric column for the bar chart (defaults to the first numeric column)
    #[arg(long = "bar-column")]
    pub bar_column: Option<String>,
    /// Categorical column for the pie chart (defaults to the first categorical column)
    #[arg(long = "pie-column")]
    pub pie_column: Option<String>,
    /// Numeric X column for the scatter chart (defaults to the first numeric column)
    #[arg(long = "scatter-x")]
    pub scatter_x: Option<String>,
    /// Numeric Y column for the scatter chart (defaults to the second numeric column)
    #[arg(long = "scatter-y")]
    pub scatter_y: Option<String>,
    /// Output format (json or yaml)
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Case-insensitive text matched against every column
    #[arg(long, default_value = "")]
    pub search: String,
    /// Per-column substring filters of the form `column=text`
    #[arg(long = "filter", action = clap::ArgAction::Append)]
    pub filters: Vec<String>,
    /// Sort directive of the form `column[:asc|desc]` (defaults to the first column, ascending)
    #[arg(long, conflicts_with = "no_sort")]
    pub sort: Option<String>,
    /// Keep rows in file order
    #[arg(long = "no-sort")]
    pub no_sort: bool,
    /// Limit number of rows displayed
    #[arg(long)]
    pub limit: Option<usize>,
    /// Output format (table, json or yaml)
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
