use serde::Serialize;

use crate::normalize::CanonicalTable;

/// Share of parseable cells a column must exceed to count as numeric.
pub const NUMERIC_COVERAGE_THRESHOLD: f64 = 0.7;

const TIME_KEYWORDS: &[&str] = &["date", "time", "year", "month", "day"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub numeric_count: usize,
    pub time_like: bool,
}

/// Numeric/categorical partition of a table's columns, in column order, with
/// the time-like annotation alongside.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    pub columns: Vec<ColumnProfile>,
}

impl Classification {
    pub fn numeric_columns(&self) -> Vec<String> {
        self.names_where(|profile| profile.kind == ColumnKind::Numeric)
    }

    pub fn categorical_columns(&self) -> Vec<String> {
        self.names_where(|profile| profile.kind == ColumnKind::Categorical)
    }

    pub fn time_columns(&self) -> Vec<String> {
        self.names_where(|profile| profile.time_like)
    }

    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        self.columns
            .iter()
            .find(|profile| profile.name == column)
            .map(|profile| profile.kind)
    }

    pub fn has_numeric(&self) -> bool {
        self.columns
            .iter()
            .any(|profile| profile.kind == ColumnKind::Numeric)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn names_where(&self, predicate: impl Fn(&ColumnProfile) -> bool) -> Vec<String> {
        self.columns
            .iter()
            .filter(|profile| predicate(profile))
            .map(|profile| profile.name.clone())
            .collect()
    }
}

pub fn classify(table: &CanonicalTable) -> Classification {
    let columns = table
        .columns
        .iter()
        .map(|name| {
            let numeric_count = table
                .column_values(name)
                .filter(|value| value.and_then(|v| v.as_number()).is_some())
                .count();
            ColumnProfile {
                name: name.clone(),
                kind: kind_for(numeric_count, table.row_count()),
                numeric_count,
                time_like: is_time_like(table, name),
            }
        })
        .collect();
    Classification { columns }
}

fn kind_for(numeric_count: usize, total: usize) -> ColumnKind {
    if total > 0 && numeric_count as f64 > NUMERIC_COVERAGE_THRESHOLD * total as f64 {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

/// Looks only at the first row's cell text; a naming heuristic, not parsing.
fn is_time_like(table: &CanonicalTable, column: &str) -> bool {
    let Some(first) = table.rows.first() else {
        return false;
    };
    let text = first.display(column).to_lowercase();
    !text.trim().is_empty() && TIME_KEYWORDS.iter().any(|keyword| text.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Record, Value};

    fn table(columns: &[&str], rows: &[&[&str]]) -> CanonicalTable {
        let rows = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .zip(row.iter())
                    .map(|(name, cell)| (*name, Value::from(*cell)))
                    .collect::<Record>()
            })
            .collect();
        CanonicalTable::from_records(rows)
    }

    #[test]
    fn coverage_must_exceed_seventy_percent() {
        // 7 of 10 parse: exactly 0.7 is not enough.
        let cells = ["1", "2", "3", "4", "5", "6", "7", "x", "y", "z"];
        let rows = cells.iter().map(|c| vec![*c]).collect::<Vec<_>>();
        let refs = rows.iter().map(Vec::as_slice).collect::<Vec<_>>();
        let result = classify(&table(&["v"], &refs));
        assert_eq!(result.kind_of("v"), Some(ColumnKind::Categorical));

        let cells = ["1", "2", "3", "4", "5", "6", "7", "8", "y", "z"];
        let rows = cells.iter().map(|c| vec![*c]).collect::<Vec<_>>();
        let refs = rows.iter().map(Vec::as_slice).collect::<Vec<_>>();
        let result = classify(&table(&["v"], &refs));
        assert_eq!(result.kind_of("v"), Some(ColumnKind::Numeric));
    }

    #[test]
    fn blanks_count_against_coverage() {
        let result = classify(&table(&["v"], &[&["1"], &[""], &[" "], &["4"]]));
        assert_eq!(result.kind_of("v"), Some(ColumnKind::Categorical));
        assert_eq!(result.columns[0].numeric_count, 2);
    }

    #[test]
    fn zero_rows_default_to_categorical() {
        let empty = CanonicalTable {
            columns: vec!["a".to_string()],
            rows: Vec::new(),
        };
        let result = classify(&empty);
        assert_eq!(result.categorical_columns(), vec!["a"]);
        assert!(!result.has_numeric());
    }

    #[test]
    fn time_like_checks_first_value_text() {
        let result = classify(&table(
            &["when", "note", "blank"],
            &[&["Date: 2024", "today", ""], &["x", "Birthday", "day"]],
        ));
        assert_eq!(result.time_columns(), vec!["when", "note"]);
    }

    #[test]
    fn partition_covers_every_column() {
        let result = classify(&table(&["a", "b", "c"], &[&["1", "x", "2.5"]]));
        let mut all = result.numeric_columns();
        all.extend(result.categorical_columns());
        all.sort();
        assert_eq!(all, vec!["a", "b", "c"]);
        assert_eq!(result.numeric_columns(), vec!["a", "c"]);
    }
}
