//! Plain-text table rendering for terminal output.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::{data::Record, normalize::CanonicalTable};

/// Cells wider than this are cut and suffixed with `…`.
pub const MAX_CELL_WIDTH: usize = 40;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let headers = headers.iter().map(|h| clip(h)).collect::<Vec<_>>();
    let rows = rows
        .iter()
        .map(|row| row.iter().take(column_count).map(|c| clip(c)).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }
    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(&headers, &widths));
    let rule = widths
        .iter()
        .map(|w| Cow::Owned("-".repeat((*w).max(3))))
        .collect::<Vec<_>>();
    let rule_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &rule_widths));
    for row in &rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

/// Renders canonical records in table column order; absent cells are blank.
pub fn render_records(table: &CanonicalTable, rows: &[&Record]) -> String {
    let cells = rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .map(|column| row.display(column))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    render_table(&table.columns, &cells)
}

fn format_row(values: &[Cow<'_, str>], widths: &[usize]) -> String {
    let mut line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let padding = width.saturating_sub(display_width(value));
            format!("{value}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn clip(value: &str) -> Cow<'_, str> {
    let value = sanitize_cell(value);
    if display_width(&value) <= MAX_CELL_WIDTH {
        return value;
    }
    let mut clipped = value.chars().take(MAX_CELL_WIDTH - 1).collect::<String>();
    clipped.push('…');
    Cow::Owned(clipped)
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_table_aligns_columns() {
        let headers = vec!["id".to_string(), "name".to_string()];
        let rows = vec![
            vec!["1".to_string(), "Alice".to_string()],
            vec!["2".to_string(), "Bob".to_string()],
        ];
        let rendered = render_table(&headers, &rows);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines, vec!["id  name", "---  -----", "1   Alice", "2   Bob"]);
    }

    #[test]
    fn long_cells_are_clipped() {
        let headers = vec!["note".to_string()];
        let rows = vec![vec!["x".repeat(MAX_CELL_WIDTH + 10)]];
        let rendered = render_table(&headers, &rows);
        let last = rendered.lines().last().expect("row line");
        assert_eq!(last.chars().count(), MAX_CELL_WIDTH);
        assert!(last.ends_with('…'));
    }

    #[test]
    fn control_characters_become_spaces() {
        let headers = vec!["note".to_string()];
        let rows = vec![vec!["line1\nline2\tvalue".to_string()]];
        let rendered = render_table(&headers, &rows);
        assert_eq!(rendered.lines().nth(2), Some("line1 line2 value"));
    }
}
