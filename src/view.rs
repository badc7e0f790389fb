//! Table view engine: global search, per-column filters and a single-column,
//! numeric-aware sort over a canonical table.
//!
//! [`apply_view`] is a pure function of the table and a [`ViewState`]
//! snapshot; running it twice on the same inputs yields the same rows.

use std::cmp::Ordering;

use anyhow::{Result, anyhow};
use serde::Serialize;

use crate::{data::Record, normalize::CanonicalTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortDirective {
    pub column: String,
    pub direction: SortDirection,
}

impl SortDirective {
    pub fn parse(spec: &str) -> Result<Self> {
        let (column, direction) = match spec.rsplit_once(':') {
            Some((column, direction)) => (column, Some(direction)),
            None => (spec, None),
        };
        let column = column.trim();
        if column.is_empty() {
            return Err(anyhow!("Sort directive is missing a column"));
        }
        let direction = match direction.map(|d| d.trim().to_ascii_lowercase()).as_deref() {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => return Err(anyhow!("Unknown sort direction '{other}'")),
        };
        Ok(SortDirective {
            column: column.to_string(),
            direction,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnFilter {
    pub column: String,
    pub text: String,
}

pub fn parse_column_filters(filters: &[String]) -> Result<Vec<ColumnFilter>> {
    filters.iter().map(|f| parse_column_filter(f)).collect()
}

fn parse_column_filter(filter: &str) -> Result<ColumnFilter> {
    let (column, text) = filter
        .split_once('=')
        .ok_or_else(|| anyhow!("Filter '{filter}' must look like column=text"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(anyhow!("Filter '{filter}' is missing a column"));
    }
    Ok(ColumnFilter {
        column: column.to_string(),
        text: text.to_string(),
    })
}

/// Immutable snapshot of the table controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub search: String,
    pub filters: Vec<ColumnFilter>,
    pub sort: Option<SortDirective>,
}

impl ViewState {
    /// Initial state for a freshly loaded table: sorted by its first column,
    /// ascending, nothing filtered.
    pub fn for_table(table: &CanonicalTable) -> Self {
        Self {
            sort: table.first_column().map(|column| SortDirective {
                column: column.to_string(),
                direction: SortDirection::Asc,
            }),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Later filters on the same column replace earlier ones.
    pub fn with_filter(mut self, column: impl Into<String>, text: impl Into<String>) -> Self {
        let column = column.into();
        let text = text.into();
        match self.filters.iter_mut().find(|f| f.column == column) {
            Some(existing) => existing.text = text,
            None => self.filters.push(ColumnFilter { column, text }),
        }
        self
    }

    pub fn with_sort(mut self, sort: Option<SortDirective>) -> Self {
        self.sort = sort;
        self
    }

    /// Header-click behaviour: same column flips direction, a new column
    /// starts ascending.
    pub fn toggle_sort(self, column: &str) -> Self {
        let next = match &self.sort {
            Some(current) if current.column == column => SortDirective {
                column: column.to_string(),
                direction: match current.direction {
                    SortDirection::Asc => SortDirection::Desc,
                    SortDirection::Desc => SortDirection::Asc,
                },
            },
            _ => SortDirective {
                column: column.to_string(),
                direction: SortDirection::Asc,
            },
        };
        self.with_sort(Some(next))
    }
}

pub fn apply_view<'a>(table: &'a CanonicalTable, state: &ViewState) -> Vec<&'a Record> {
    let search = state.search.to_lowercase();
    let filters = state
        .filters
        .iter()
        .filter(|f| !f.text.is_empty())
        .map(|f| (f.column.as_str(), f.text.to_lowercase()))
        .collect::<Vec<_>>();

    let mut rows = table
        .rows
        .iter()
        .filter(|row| search.is_empty() || matches_search(row, &table.columns, &search))
        .filter(|row| {
            filters
                .iter()
                .all(|(column, needle)| row.display(column).to_lowercase().contains(needle))
        })
        .collect::<Vec<_>>();

    if let Some(sort) = &state.sort {
        merge_sort_by(&mut rows, &|a: &&Record, b: &&Record| {
            let ordering = compare_cells(&a.display(&sort.column), &b.display(&sort.column));
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
    rows
}

fn matches_search(row: &Record, columns: &[String], needle: &str) -> bool {
    columns
        .iter()
        .any(|column| row.display(column).to_lowercase().contains(needle))
}

/// Numeric when both sides parse, case-insensitive text otherwise.
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    match (crate::data::parse_number(a), crate::data::parse_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

// The mixed numeric/text comparator is not transitive, so the std sort (which
// may panic on inconsistent orderings) is avoided. Stable: ties keep input order.
fn merge_sort_by<T: Copy, F>(items: &mut [T], compare: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    let len = items.len();
    if len <= 1 {
        return;
    }
    let mid = len / 2;
    merge_sort_by(&mut items[..mid], compare);
    merge_sort_by(&mut items[mid..], compare);

    let mut merged = Vec::with_capacity(len);
    let (mut left, mut right) = (0, mid);
    while left < mid && right < len {
        if compare(&items[right], &items[left]) == Ordering::Less {
            merged.push(items[right]);
            right += 1;
        } else {
            merged.push(items[left]);
            left += 1;
        }
    }
    merged.extend_from_slice(&items[left..mid]);
    merged.extend_from_slice(&items[right..len]);
    items.copy_from_slice(&merged);
}
