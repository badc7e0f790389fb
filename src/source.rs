//! Decoders that turn upload bytes into a raw grid of cells, plus the
//! header-bearing record view of that grid.

use std::io::Cursor;

use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};
use chrono::Timelike;
use encoding_rs::Encoding;
use log::debug;

use crate::{
    data::{Record, Value},
    error::LoadError,
    io_utils,
};

pub type Grid = Vec<Vec<Value>>;

pub fn decode_delimited(
    bytes: &[u8],
    delimiter: u8,
    encoding: &'static Encoding,
    filename: &str,
) -> Result<Grid, LoadError> {
    let text = io_utils::decode_text(bytes, encoding)
        .map_err(|err| LoadError::malformed(filename, err))?;
    let mut reader = io_utils::open_csv_reader(text.as_bytes(), delimiter);
    let mut grid = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record
            .map_err(|err| LoadError::malformed(filename, format!("line {}: {err}", idx + 1)))?;
        let row = record.iter().map(Value::from).collect::<Vec<_>>();
        if row.iter().all(Value::is_empty) {
            continue;
        }
        grid.push(row);
    }
    debug!("Decoded {} delimited row(s) from '{filename}'", grid.len());
    Ok(grid)
}

/// Reads only the first worksheet. `None` means the workbook has no sheets.
pub fn decode_spreadsheet(bytes: Vec<u8>, filename: &str) -> Result<Option<Grid>, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|err| LoadError::malformed(filename, err))?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(None);
    };
    let range = range.map_err(|err| LoadError::malformed(filename, err))?;
    let grid = range
        .rows()
        .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    debug!(
        "Decoded {} worksheet row(s) from '{filename}' ({} column(s) wide)",
        grid.len(),
        range.width()
    );
    Ok(Some(grid))
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::empty(),
        Data::String(s) => Value::Text(s.clone()),
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Boolean(*b),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) if dt.num_seconds_from_midnight() == 0 => {
                Value::Text(dt.format("%Y-%m-%d").to_string())
            }
            Some(dt) => Value::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Value::Text(cell.to_string()),
        },
        other => Value::Text(other.to_string()),
    }
}

/// Record view of a grid whose first row is a usable header: every header
/// cell non-blank and no name repeated. Anything else yields no records so the
/// caller falls back to positional column names.
pub fn records_from_grid(grid: &[Vec<Value>]) -> Vec<Record> {
    let Some((header, body)) = grid.split_first() else {
        return Vec::new();
    };
    let names = header.iter().map(Value::as_display).collect::<Vec<_>>();
    let trimmed = names.iter().map(|name| name.trim()).collect::<Vec<_>>();
    let reliable = !trimmed.is_empty()
        && trimmed.iter().all(|name| !name.is_empty())
        && trimmed
            .iter()
            .enumerate()
            .all(|(idx, name)| !trimmed[..idx].contains(name));
    if !reliable {
        debug!("Header row is not reliable; falling back to positional columns");
        return Vec::new();
    }
    body.iter()
        .filter(|row| !row.iter().all(Value::is_empty))
        .map(|row| {
            names
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    (
                        name.clone(),
                        row.get(idx).cloned().unwrap_or_else(Value::empty),
                    )
                })
                .collect::<Record>()
        })
        .collect()
}
