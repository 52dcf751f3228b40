//! Comparison table data model
//!
//! One row per test, one data column per machine/configuration. Row
//! positions 0 and 1 are reserved for the test identifier and the derived
//! worst-time summary; data cells start at position 2.
//!
//! Global invariants enforced:
//! - Cell contents are immutable after construction
//! - Every row has exactly one cell per column
//! - Column names are unique

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Row position of the first data cell (0 = identifier, 1 = summary)
pub const FIRST_DATA_POSITION: usize = 2;

/// Background color used for a summary cell with no visible source cell
pub const DEFAULT_NEUTRAL_COLOR: &str = "#dbdbdb";

/// A measurement cell: displayed percentage text and its background color
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub color: String,
}

/// A machine/configuration column
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

impl Column {
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }
}

/// Derived worst-time cell (row position 1)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryCell {
    pub text: String,
    pub color: String,
    /// Column index of the cell that produced the value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<usize>,
}

impl SummaryCell {
    pub fn blank(neutral_color: &str) -> Self {
        SummaryCell {
            text: String::new(),
            color: neutral_color.to_string(),
            source: None,
        }
    }
}

impl Default for SummaryCell {
    fn default() -> Self {
        SummaryCell::blank(DEFAULT_NEUTRAL_COLOR)
    }
}

/// One test's measurements across all columns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Row {
    pub test_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(default)]
    pub summary: SummaryCell,
    pub cells: Vec<Cell>,
}

impl Row {
    /// Data cell at a row position (positions below 2 are reserved)
    pub fn cell_at(&self, position: usize) -> Option<&Cell> {
        position
            .checked_sub(FIRST_DATA_POSITION)
            .and_then(|index| self.cells.get(index))
    }
}

/// The full comparison table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl ComparisonTable {
    /// Build a table, checking its structure
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Result<Self> {
        let table = ComparisonTable { columns, rows };
        table.validate()?;
        Ok(table)
    }

    /// Parse a table from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        let table: ComparisonTable =
            serde_json::from_str(json).context("failed to parse comparison table")?;
        table.validate()?;
        Ok(table)
    }

    /// Load a table from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read table file: {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("invalid table in: {}", path.display()))
    }

    /// Check column uniqueness and row widths. Cell text is not inspected.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.name.is_empty() {
                anyhow::bail!("column names must not be empty");
            }
            if !seen.insert(column.name.as_str()) {
                anyhow::bail!("duplicate column name: {}", column.name);
            }
        }

        for row in &self.rows {
            if row.cells.len() != self.columns.len() {
                anyhow::bail!(
                    "row {} has {} cells, expected {} (one per column)",
                    row.test_id,
                    row.cells.len(),
                    self.columns.len()
                );
            }
        }

        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// All group names in first-seen column order
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for column in &self.columns {
            for group in &column.groups {
                if !groups.contains(&group.as_str()) {
                    groups.push(group);
                }
            }
        }
        groups
    }

    /// Reset every summary to blank with the given placeholder color
    pub fn clear_summaries(&mut self, neutral_color: &str) {
        for row in &mut self.rows {
            row.summary = SummaryCell::blank(neutral_color);
        }
    }
}

/// Parse a displayed percentage (`"12.5%"` -> `12.5`).
///
/// Text that is not a number yields NaN; NaN never wins a `>` comparison,
/// so such a cell cannot become a row's worst value.
pub fn parse_pct(text: &str) -> f64 {
    let trimmed = text.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed);
    number.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Format a value as displayed percentage text (`75.0` -> `"75%"`).
///
/// Shortest round-trip digits; magnitudes below 1e-6 or from 1e21 up use
/// exponent form (`1e-7%`, `1e+21%`), and negative zero prints as `0%`.
pub fn format_pct(value: f64) -> String {
    if value == 0.0 {
        return "0%".to_string();
    }
    let magnitude = value.abs();
    if value.is_finite() && !(1e-6..1e21).contains(&magnitude) {
        let exp = format!("{:e}", value);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}%", mantissa, power)
            }
            _ => format!("{}%", exp),
        };
    }
    format!("{}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str) -> Cell {
        Cell {
            text: text.to_string(),
            color: "#ffffff".to_string(),
        }
    }

    fn column(name: &str, groups: &[&str]) -> Column {
        Column {
            name: name.to_string(),
            groups: groups.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn row(test_id: &str, cells: Vec<Cell>) -> Row {
        Row {
            test_id: test_id.to_string(),
            run_id: None,
            summary: SummaryCell::default(),
            cells,
        }
    }

    #[test]
    fn test_parse_pct() {
        assert_eq!(parse_pct("50%"), 50.0);
        assert_eq!(parse_pct("12.5%"), 12.5);
        assert_eq!(parse_pct("-3.25%"), -3.25);
        assert_eq!(parse_pct("7"), 7.0);
        assert!(parse_pct("").is_nan());
        assert!(parse_pct("n/a").is_nan());
    }

    #[test]
    fn test_format_pct() {
        assert_eq!(format_pct(75.0), "75%");
        assert_eq!(format_pct(12.5), "12.5%");
        assert_eq!(format_pct(-0.5), "-0.5%");
    }

    #[test]
    fn test_format_pct_edge_values() {
        assert_eq!(format_pct(-0.0), "0%");
        assert_eq!(format_pct(0.0), "0%");
        assert_eq!(format_pct(1e-7), "1e-7%");
        assert_eq!(format_pct(-2.5e-7), "-2.5e-7%");
        assert_eq!(format_pct(1e21), "1e+21%");
        assert_eq!(format_pct(0.000001), "0.000001%");
        assert_eq!(format_pct(123456.0), "123456%");
    }

    #[test]
    fn test_cell_at_skips_reserved_positions() {
        let r = row("t1", vec![cell("1%"), cell("2%")]);
        assert!(r.cell_at(0).is_none());
        assert!(r.cell_at(1).is_none());
        assert_eq!(r.cell_at(2).unwrap().text, "1%");
        assert_eq!(r.cell_at(3).unwrap().text, "2%");
        assert!(r.cell_at(4).is_none());
    }

    #[test]
    fn test_reject_short_row() {
        let result = ComparisonTable::new(
            vec![column("m1", &[]), column("m2", &[])],
            vec![row("t1", vec![cell("1%")])],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_reject_duplicate_column() {
        let result = ComparisonTable::new(vec![column("m1", &[]), column("m1", &[])], vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_groups_in_column_order() {
        let table = ComparisonTable::new(
            vec![
                column("m1", &["linux"]),
                column("m2", &["arm", "linux"]),
                column("m3", &[]),
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(table.groups(), vec!["linux", "arm"]);
        assert_eq!(table.column_index("m2"), Some(1));
        assert_eq!(table.column_index("m9"), None);
    }

    #[test]
    fn test_from_json_defaults_summary() {
        let json = r##"{
            "columns": [{"name": "m1", "groups": ["x86"]}],
            "rows": [{"test_id": "SingleSource/foo", "cells": [{"text": "3%", "color": "#ff0000"}]}]
        }"##;
        let table = ComparisonTable::from_json(json).unwrap();
        assert_eq!(table.rows[0].summary.text, "");
        assert_eq!(table.rows[0].summary.color, DEFAULT_NEUTRAL_COLOR);
        assert!(table.rows[0].run_id.is_none());
    }
}
