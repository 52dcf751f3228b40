//! Table sorting
//!
//! Rows are reordered with a stable sort. Numeric columns compare as
//! percentages; blank or non-numeric text counts as zero.

use crate::table::{parse_pct, ComparisonTable, Row};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => anyhow::bail!("unknown sort direction: {} (expected asc or desc)", other),
        }
    }
}

/// A sortable column of the rendered table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Identifier,
    Summary,
    /// Data column by column index
    Data(usize),
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortColumn::Identifier => write!(f, "test"),
            SortColumn::Summary => write!(f, "worst"),
            SortColumn::Data(index) => write!(f, "{}", index),
        }
    }
}

/// Which column the table is sorted by, and in which direction.
///
/// `column` is `None` when the row order is the load order. The direction
/// is kept even then, since recomputation re-sorts with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl Default for SortState {
    /// Worst-first on page load
    fn default() -> Self {
        SortState {
            column: Some(SortColumn::Summary),
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// Direction indicator for a header, if that header is the sorted one
    pub fn indicator(&self, column: SortColumn) -> Option<SortDirection> {
        (self.column == Some(column)).then_some(self.direction)
    }
}

fn numeric_key(text: &str) -> f64 {
    let value = parse_pct(text);
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

fn compare_rows(a: &Row, b: &Row, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Identifier => a.test_id.cmp(&b.test_id),
        SortColumn::Summary => numeric_key(&a.summary.text)
            .partial_cmp(&numeric_key(&b.summary.text))
            .unwrap_or(Ordering::Equal),
        SortColumn::Data(index) => {
            let a_val = a.cells.get(index).map(|c| numeric_key(&c.text)).unwrap_or(0.0);
            let b_val = b.cells.get(index).map(|c| numeric_key(&c.text)).unwrap_or(0.0);
            a_val.partial_cmp(&b_val).unwrap_or(Ordering::Equal)
        }
    }
}

/// Stable sort of the table's rows by one column
pub fn sort_by(table: &mut ComparisonTable, column: SortColumn, direction: SortDirection) {
    log::trace!("sorting {} rows by {} ({})", table.rows.len(), column, direction.as_str());
    table.rows.sort_by(|a, b| match direction {
        SortDirection::Ascending => compare_rows(a, b, column),
        SortDirection::Descending => compare_rows(b, a, column),
    });
}

/// Header interaction: re-clicking the sorted column flips the direction,
/// any other column sorts ascending.
pub fn header_click(table: &mut ComparisonTable, state: &mut SortState, column: SortColumn) {
    let direction = if state.column == Some(column) {
        state.direction.flipped()
    } else {
        SortDirection::Ascending
    };
    sort_by(table, column, direction);
    *state = SortState {
        column: Some(column),
        direction,
    };
}
