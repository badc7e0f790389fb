//! Chart payload projection.
//!
//! Each chart gets the smallest data shape its renderer needs. Row windows
//! are plain truncation in table order. A table without numeric columns
//! produces [`Projection::NoNumericData`] and no chart at all.

use std::collections::HashMap;

use log::debug;
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{classify::Classification, normalize::CanonicalTable};

pub const BAR_ROW_LIMIT: usize = 10;
pub const LINE_ROW_LIMIT: usize = 20;
pub const LINE_SERIES_LIMIT: usize = 3;
pub const PIE_SLICE_LIMIT: usize = 5;
pub const SCATTER_ROW_LIMIT: usize = 50;

const UNKNOWN_LABEL: &str = "Unknown";
const LINE_LABEL_KEY: &str = "name";

/// Column choices made by the user. Empty strings count as "not chosen".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSelection {
    pub bar: Option<String>,
    pub pie: Option<String>,
    pub scatter_x: Option<String>,
    pub scatter_y: Option<String>,
}

/// Picks `selected` when it names an eligible column, otherwise the eligible
/// column at `fallback_index`.
pub fn resolve(
    selected: Option<&str>,
    eligible: &[String],
    fallback_index: usize,
) -> Option<String> {
    if let Some(choice) = selected.map(str::trim).filter(|choice| !choice.is_empty()) {
        if eligible.iter().any(|column| column == choice) {
            return Some(choice.to_string());
        }
        debug!("Ignoring selection '{choice}': not one of {eligible:?}");
    }
    eligible.get(fallback_index).cloned()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub column: String,
    pub data: Vec<NamedValue>,
}

/// One x-axis position of the line chart: `name` plus one key per series.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    pub name: String,
    pub values: Vec<(String, f64)>,
}

impl LinePoint {
    pub fn get(&self, column: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| *value)
    }
}

impl Serialize for LinePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry(LINE_LABEL_KEY, &self.name)?;
        for (column, value) in &self.values {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub columns: Vec<String>,
    pub data: Vec<LinePoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub column: String,
    pub data: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterChart {
    pub x_column: String,
    pub y_column: String,
    pub data: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSet {
    pub bar: Option<BarChart>,
    pub line: Option<LineChart>,
    pub pie: Option<PieChart>,
    pub scatter: Option<ScatterChart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "charts", rename_all = "camelCase")]
pub enum Projection {
    NoNumericData,
    Charts(ChartSet),
}

impl Projection {
    pub fn charts(&self) -> Option<&ChartSet> {
        match self {
            Projection::Charts(set) => Some(set),
            Projection::NoNumericData => None,
        }
    }
}

pub fn project(
    table: &CanonicalTable,
    classification: &Classification,
    selection: &ChartSelection,
) -> Projection {
    if !classification.has_numeric() {
        debug!("No numeric columns; chart projection suppressed");
        return Projection::NoNumericData;
    }
    let numeric = classification.numeric_columns();
    let categorical = classification.categorical_columns();
    Projection::Charts(ChartSet {
        bar: bar_chart(table, &numeric, selection.bar.as_deref()),
        line: line_chart(table, &numeric),
        pie: pie_chart(table, &categorical, selection.pie.as_deref()),
        scatter: scatter_chart(
            table,
            &numeric,
            selection.scatter_x.as_deref(),
            selection.scatter_y.as_deref(),
        ),
    })
}

pub fn bar_chart(
    table: &CanonicalTable,
    numeric: &[String],
    selected: Option<&str>,
) -> Option<BarChart> {
    let column = resolve(selected, numeric, 0)?;
    let data = table
        .rows
        .iter()
        .take(BAR_ROW_LIMIT)
        .enumerate()
        .map(|(idx, row)| NamedValue {
            name: point_name(table, row, idx),
            value: row.number(&column).unwrap_or(0.0),
        })
        .collect::<Vec<_>>();
    (!data.is_empty()).then_some(BarChart { column, data })
}

/// A numeric column called `name` would collide with the point label, so it
/// is never plotted as a series.
pub fn line_chart(table: &CanonicalTable, numeric: &[String]) -> Option<LineChart> {
    let columns = numeric
        .iter()
        .filter(|column| column.as_str() != LINE_LABEL_KEY)
        .take(LINE_SERIES_LIMIT)
        .cloned()
        .collect::<Vec<_>>();
    if columns.is_empty() {
        return None;
    }
    let data = table
        .rows
        .iter()
        .take(LINE_ROW_LIMIT)
        .enumerate()
        .map(|(idx, row)| LinePoint {
            name: point_name(table, row, idx),
            values: columns
                .iter()
                .map(|column| (column.clone(), row.number(column).unwrap_or(0.0)))
                .collect(),
        })
        .collect::<Vec<_>>();
    (!data.is_empty()).then_some(LineChart { columns, data })
}

/// Counts every row, then keeps the first few distinct labels in the order
/// they were first seen (not by frequency).
pub fn pie_chart(
    table: &CanonicalTable,
    categorical: &[String],
    selected: Option<&str>,
) -> Option<PieChart> {
    let column = resolve(selected, categorical, 0)?;
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for row in &table.rows {
        let mut label = row.display(&column);
        if label.is_empty() {
            label = UNKNOWN_LABEL.to_string();
        }
        match positions.get(&label) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(label.clone(), counts.len());
                counts.push((label, 1));
            }
        }
    }
    let data = counts
        .into_iter()
        .take(PIE_SLICE_LIMIT)
        .map(|(name, value)| PieSlice { name, value })
        .collect::<Vec<_>>();
    (!data.is_empty()).then_some(PieChart { column, data })
}

/// X and Y may resolve to the same column when only one is numeric.
pub fn scatter_chart(
    table: &CanonicalTable,
    numeric: &[String],
    selected_x: Option<&str>,
    selected_y: Option<&str>,
) -> Option<ScatterChart> {
    let x_column = resolve(selected_x, numeric, 0)?;
    let y_column = resolve(selected_y, numeric, 1)?;
    let data = table
        .rows
        .iter()
        .take(SCATTER_ROW_LIMIT)
        .enumerate()
        .map(|(idx, row)| ScatterPoint {
            x: row.number(&x_column).unwrap_or(0.0),
            y: row.number(&y_column).unwrap_or(0.0),
            name: point_name(table, row, idx),
        })
        .collect::<Vec<_>>();
    (!data.is_empty()).then_some(ScatterChart {
        x_column,
        y_column,
        data,
    })
}

fn point_name(table: &CanonicalTable, row: &crate::data::Record, idx: usize) -> String {
    let label = table
        .first_column()
        .map(|column| row.display(column))
        .unwrap_or_default();
    if label.is_empty() {
        format!("Row {}", idx + 1)
    } else {
        label
    }
}
