//! I/O utilities for reading uploads and writing rendered payloads.
//!
//! All file I/O in sheet-insights flows through this module. It provides:
//!
//! - **Source detection**: extension-first, content-type-second dispatch to
//!   spreadsheet or delimited-text decoding.
//! - **Delimiter resolution**: `.tsv` → tab, everything else → comma, with
//!   manual override support.
//! - **Encoding**: whole-buffer decoding via `encoding_rs`, defaulting to UTF-8
//!   and honouring a byte-order mark.
//! - **stdin/stdout**: the `-` path convention routes through standard streams.

use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

use crate::error::LoadError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "xlsb", "ods"];
const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

const SPREADSHEET_CONTENT_TYPES: &[&str] = &[
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.oasis.opendocument.spreadsheet",
];
const DELIMITED_CONTENT_TYPES: &[&str] = &[
    "text/csv",
    "text/plain",
    "text/tab-separated-values",
    "application/csv",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Spreadsheet,
    Delimited,
}

impl SourceFormat {
    /// The extension wins; the declared content type is only consulted when the
    /// extension is missing or unknown.
    pub fn detect(path: &Path, content_type: Option<&str>) -> Result<Self, LoadError> {
        if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
            if SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
            {
                return Ok(SourceFormat::Spreadsheet);
            }
            if DELIMITED_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
            {
                return Ok(SourceFormat::Delimited);
            }
        }
        if let Some(declared) = content_type {
            let essence = declared
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            if SPREADSHEET_CONTENT_TYPES.contains(&essence.as_str()) {
                return Ok(SourceFormat::Spreadsheet);
            }
            if DELIMITED_CONTENT_TYPES.contains(&essence.as_str()) {
                return Ok(SourceFormat::Delimited);
            }
        }
        Err(LoadError::UnsupportedFormat {
            filename: display_name(path),
        })
    }
}

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn display_name(path: &Path) -> String {
    if is_dash(path) {
        return "<stdin>".to_string();
    }
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    if is_dash(path) {
        io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("Reading upload from stdin")?;
    } else {
        File::open(path)
            .with_context(|| format!("Opening input file {path:?}"))?
            .read_to_end(&mut bytes)
            .with_context(|| format!("Reading input file {path:?}"))?;
    }
    Ok(bytes)
}

/// Decodes a whole upload. A byte-order mark overrides `encoding`.
pub fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!("Failed to decode text with encoding {}", used.name()))
    } else {
        Ok(text.into_owned())
    }
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(io::stdout()),
    };
    Ok(writer)
}
