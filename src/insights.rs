use itertools::Itertools;
use serde::Serialize;

use crate::{
    classify::{self, Classification, ColumnKind},
    normalize::CanonicalTable,
    trend::{self, Trend},
};

/// Summary of an uploaded table: classification, time-like columns and trends.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub row_count: usize,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub time_columns: Vec<String>,
    pub trends: Vec<Trend>,
    #[serde(skip)]
    pub classification: Classification,
}

impl Insights {
    pub fn from_table(table: &CanonicalTable) -> Self {
        let classification = classify::classify(table);
        let trends = trend::analyze_trends(table, &classification);
        Self {
            row_count: table.row_count(),
            numeric_columns: classification.numeric_columns(),
            categorical_columns: classification.categorical_columns(),
            time_columns: classification.time_columns(),
            trends,
            classification,
        }
    }

    pub fn has_numeric_data(&self) -> bool {
        !self.numeric_columns.is_empty()
    }

    pub fn trend_for(&self, column: &str) -> Option<&Trend> {
        self.trends.iter().find(|trend| trend.column == column)
    }

    pub fn table_headers() -> Vec<String> {
        ["column", "kind", "numeric", "time_like", "trend", "change"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn table_rows(&self) -> Vec<Vec<String>> {
        self.classification
            .columns
            .iter()
            .map(|profile| {
                let kind = match profile.kind {
                    ColumnKind::Numeric => "numeric",
                    ColumnKind::Categorical => "categorical",
                };
                let (direction, change) = self
                    .trend_for(&profile.name)
                    .map(|t| (t.direction.as_str().to_string(), format_change(t.change_percent)))
                    .unwrap_or_default();
                vec![
                    profile.name.clone(),
                    kind.to_string(),
                    format!("{}/{}", profile.numeric_count, self.row_count),
                    if profile.time_like { "yes" } else { "" }.to_string(),
                    direction,
                    change,
                ]
            })
            .collect()
    }

    /// One-line-per-fact summary, as shown under the charts.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Total rows: {}", self.row_count)];
        if self.has_numeric_data() {
            lines.push(format!(
                "Numeric columns: {}",
                self.numeric_columns.iter().join(", ")
            ));
        } else {
            lines.push(
                "No numeric data found to visualize. Upload a file with numeric columns to see charts."
                    .to_string(),
            );
        }
        if !self.categorical_columns.is_empty() {
            lines.push(format!(
                "Categorical columns: {}",
                self.categorical_columns.iter().join(", ")
            ));
        }
        if !self.time_columns.is_empty() {
            lines.push(format!(
                "Time-based columns detected: {}",
                self.time_columns.iter().join(", ")
            ));
        }
        lines
    }
}

fn format_change(change: f64) -> String {
    if change > 0.0 {
        format!("+{change}%")
    } else {
        format!("{change}%")
    }
}
