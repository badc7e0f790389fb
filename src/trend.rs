use serde::Serialize;

use crate::{classify::Classification, normalize::CanonicalTable};

/// Percent change beyond which a column counts as moving.
const TREND_THRESHOLD_PERCENT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub column: String,
    pub direction: TrendDirection,
    pub change_percent: f64,
}

pub fn analyze_trends(table: &CanonicalTable, classification: &Classification) -> Vec<Trend> {
    classification
        .numeric_columns()
        .into_iter()
        .filter_map(|column| {
            let values = table
                .column_values(&column)
                .filter_map(|value| value.and_then(|v| v.as_number()))
                .collect::<Vec<_>>();
            trend_for(&values).map(|(direction, change_percent)| Trend {
                column,
                direction,
                change_percent,
            })
        })
        .collect()
}

/// First-versus-last change of a series. `None` below two observations.
pub fn trend_for(values: &[f64]) -> Option<(TrendDirection, f64)> {
    if values.len() < 2 {
        return None;
    }
    let first = values[0];
    let last = values[values.len() - 1];
    let change = if first == 0.0 {
        0.0
    } else {
        (last - first) / first * 100.0
    };
    // Direction uses the unrounded change; only the reported figure is rounded.
    let direction = if change > TREND_THRESHOLD_PERCENT {
        TrendDirection::Increasing
    } else if change < -TREND_THRESHOLD_PERCENT {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };
    Some((direction, (change * 10.0).round() / 10.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        classify::classify,
        data::{Record, Value},
    };

    #[test]
    fn reference_series() {
        assert_eq!(trend_for(&[100.0, 150.0]), Some((TrendDirection::Increasing, 50.0)));
        assert_eq!(trend_for(&[100.0, 94.0]), Some((TrendDirection::Decreasing, -6.0)));
        assert_eq!(trend_for(&[100.0, 97.0]), Some((TrendDirection::Stable, -3.0)));
        assert_eq!(trend_for(&[0.0, 5.0]), Some((TrendDirection::Stable, 0.0)));
        assert_eq!(trend_for(&[3.0]), None);
    }

    #[test]
    fn rounds_to_one_decimal() {
        let (_, change) = trend_for(&[3.0, 4.0]).expect("trend");
        assert_eq!(change, 33.3);
        let (_, change) = trend_for(&[3.0, 2.0]).expect("trend");
        assert_eq!(change, -33.3);
    }

    #[test]
    fn skips_unparseable_cells_instead_of_positions() {
        let rows = ["n/a", "200", "", "250", "oops", "220", "x"]
            .iter()
            .map(|cell| [("v", Value::from(*cell))].into_iter().collect::<Record>())
            .collect::<Vec<_>>();
        // Force the column numeric regardless of coverage.
        let table = CanonicalTable::from_records(rows);
        let mut classification = classify(&table);
        classification.columns[0].kind = crate::classify::ColumnKind::Numeric;
        let trends = analyze_trends(&table, &classification);
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].change_percent, 10.0);
        assert_eq!(trends[0].direction, TrendDirection::Increasing);
    }

    #[test]
    fn categorical_columns_have_no_trend() {
        let rows = ["a", "b"]
            .iter()
            .map(|cell| [("v", Value::from(*cell))].into_iter().collect::<Record>())
            .collect::<Vec<_>>();
        let table = CanonicalTable::from_records(rows);
        assert!(analyze_trends(&table, &classify(&table)).is_empty());
    }
}
