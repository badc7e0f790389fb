use std::path::Path;

use anyhow::Result;
use encoding_rs::Encoding;
use log::{debug, info};
use serde::Serialize;

use crate::{
    error::LoadError,
    io_utils::{self, SourceFormat},
    normalize::{self, CanonicalTable},
    source,
};

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions<'a> {
    pub content_type: Option<&'a str>,
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub format: SourceFormat,
    pub table: CanonicalTable,
}

/// Success body of the upload contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse<'a> {
    pub success: bool,
    pub filename: &'a str,
    pub row_count: usize,
    pub columns: &'a [String],
    pub data: &'a [crate::data::Record],
}

impl Upload {
    pub fn response(&self) -> UploadResponse<'_> {
        UploadResponse {
            success: true,
            filename: &self.filename,
            row_count: self.table.row_count(),
            columns: &self.table.columns,
            data: &self.table.rows,
        }
    }
}

/// Reads and normalizes one file. The result is either a whole table or an
/// error; I/O problems surface as plain `anyhow` errors, input problems as
/// [`LoadError`].
pub fn load_path(path: &Path, options: &LoadOptions<'_>) -> Result<Upload> {
    let filename = io_utils::display_name(path);
    let format = SourceFormat::detect(path, options.content_type)?;
    let bytes = io_utils::read_input(path)?;
    info!("Loading '{filename}' ({} byte(s)) as {format:?}", bytes.len());
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let table = load_bytes(bytes, format, &filename, delimiter, options.encoding)?;
    info!(
        "Loaded {} row(s) across {} column(s) from '{filename}'",
        table.row_count(),
        table.columns.len()
    );
    Ok(Upload {
        filename,
        format,
        table,
    })
}

pub fn load_bytes(
    bytes: Vec<u8>,
    format: SourceFormat,
    filename: &str,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<CanonicalTable, LoadError> {
    let grid = match format {
        SourceFormat::Delimited => source::decode_delimited(&bytes, delimiter, encoding, filename)?,
        SourceFormat::Spreadsheet => match source::decode_spreadsheet(bytes, filename)? {
            Some(grid) => grid,
            None => return Err(empty_error(format, filename)),
        },
    };
    let records = source::records_from_grid(&grid);
    debug!("Header-bearing reader produced {} record(s)", records.len());
    let table = normalize::normalize(records, &grid);
    if table.is_empty() {
        return Err(empty_error(format, filename));
    }
    Ok(table)
}

fn empty_error(format: SourceFormat, filename: &str) -> LoadError {
    match format {
        SourceFormat::Spreadsheet => LoadError::EmptySheet {
            filename: filename.to_string(),
        },
        SourceFormat::Delimited => LoadError::EmptyFile {
            filename: filename.to_string(),
        },
    }
}
