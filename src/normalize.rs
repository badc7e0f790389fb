//! Canonical table construction.
//!
//! Records from a header-bearing reader are taken as-is. When the reader
//! produced nothing, the raw grid is re-read positionally: the first row
//! supplies names and blank names become `Column<N>`. On either path a body
//! row whose cells are all blank is not a data row.
//!
//! Columns always come from the *first* row's keys. Keys that only appear in
//! later rows are not listed (and never displayed or charted).

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::data::{Record, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTable {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl CanonicalTable {
    pub fn from_records(rows: Vec<Record>) -> Self {
        let columns = rows
            .first()
            .map(|first| first.keys().map(str::to_string).collect())
            .unwrap_or_default();
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_column(&self) -> Option<&str> {
        self.columns.first().map(String::as_str)
    }

    /// Values of `column` in row order; `None` where the key is absent.
    pub fn column_values<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = Option<&'a Value>> {
        self.rows.iter().map(move |row| row.get(column))
    }
}

pub fn normalize(records: Vec<Record>, grid: &[Vec<Value>]) -> CanonicalTable {
    if !records.is_empty() {
        debug!("Using {} header-bearing record(s)", records.len());
        return CanonicalTable::from_records(records);
    }
    CanonicalTable::from_records(records_from_positional_grid(grid))
}

pub fn synthesize_header(header: &[Value], width: usize) -> Vec<String> {
    (0..width)
        .map(|idx| match header.get(idx) {
            Some(cell) if !cell.is_empty() => cell.as_display(),
            _ => format!("Column{}", idx + 1),
        })
        .collect()
}

fn records_from_positional_grid(grid: &[Vec<Value>]) -> Vec<Record> {
    let Some((header, body)) = grid.split_first() else {
        return Vec::new();
    };
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    let names = synthesize_header(header, width);
    debug!("Synthesized header {names:?} for {} grid row(s)", body.len());
    for name in repeated_names(&names) {
        warn!("Header '{name}' repeats; later cells overwrite earlier ones in that column");
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

/// Names that appear more than once, each reported once in first-seen order.
fn repeated_names(names: &[String]) -> Vec<&str> {
    let mut repeated: Vec<&str> = Vec::new();
    for (idx, name) in names.iter().enumerate() {
        if names[..idx].contains(name) && !repeated.contains(&name.as_str()) {
            repeated.push(name);
        }
    }
    repeated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<Value>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| Value::from(*cell)).collect())
            .collect()
    }

    #[test]
    fn records_win_over_grid() {
        let record: Record = [("a", Value::from("1"))].into_iter().collect();
        let table = normalize(vec![record], &grid(&[&["ignored"], &["x"]]));
        assert_eq!(table.columns, vec!["a"]);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn grid_fallback_names_blank_headers_by_position() {
        let table = normalize(
            Vec::new(),
            &grid(&[&["", "Amount"], &["north", "10", "extra"], &["south"]]),
        );
        assert_eq!(table.columns, vec!["Column1", "Amount", "Column3"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].display("Column3"), "extra");
        assert_eq!(table.rows[1].get("Amount"), Some(&Value::empty()));
    }

    #[test]
    fn repeated_header_names_collapse_into_first_position() {
        let table = normalize(Vec::new(), &grid(&[&["x", "x", "y"], &["1", "2", "3"]]));
        assert_eq!(table.columns, vec!["x", "y"]);
        assert_eq!(table.rows[0].display("x"), "2");
    }

    #[test]
    fn repeated_names_are_reported_once() {
        let names = ["x", "y", "x", "x", "y", "z"].map(String::from);
        assert_eq!(repeated_names(&names), vec!["x", "y"]);
        assert!(repeated_names(&["a".to_string()]).is_empty());
    }

    #[test]
    fn blank_body_rows_are_dropped_on_both_paths() {
        let reliable = grid(&[&["a", "b"], &[" ", ""]]);
        let records = crate::source::records_from_grid(&reliable);
        assert!(normalize(records, &reliable).is_empty());

        let positional = grid(&[&["a", ""], &["1", "2"], &["", "  "]]);
        let table = normalize(Vec::new(), &positional);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.columns, vec!["a", "Column2"]);
    }

    #[test]
    fn columns_come_from_first_record_only() {
        let first: Record = [("a", Value::from("1"))].into_iter().collect();
        let second: Record = [("a", Value::from("2")), ("late", Value::from("z"))]
            .into_iter()
            .collect();
        let table = CanonicalTable::from_records(vec![first, second]);
        assert_eq!(table.columns, vec!["a"]);
    }

    #[test]
    fn header_only_grid_has_no_rows() {
        let table = normalize(Vec::new(), &grid(&[&["a", "b"]]));
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }
}
