//! Reporting and output generation
//!
//! Renders the current view of a comparison table. Hidden columns are left
//! out; rows appear in their current sorted order.

use crate::sort::SortState;
use crate::table::ComparisonTable;
use crate::view::{TableViewState, ToggleControl};
use serde::Serialize;

/// Serializable projection of a table under its view state
#[derive(Debug, Clone, Serialize)]
pub struct TableSnapshot {
    pub active_view: String,
    pub sort: SortState,
    pub columns: Vec<ColumnSnapshot>,
    pub rows: Vec<RowSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnSnapshot {
    pub name: String,
    pub groups: Vec<String>,
    pub visible: bool,
    pub control: ToggleControl,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowSnapshot {
    pub test_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    pub worst: WorstSnapshot,
    /// Visible cells only
    pub cells: Vec<CellSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorstSnapshot {
    pub text: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CellSnapshot {
    pub column: String,
    pub text: String,
    pub color: String,
}

impl TableSnapshot {
    pub fn capture(table: &ComparisonTable, state: &TableViewState) -> Self {
        let visible = state.visible_columns(table);

        let columns = table
            .columns
            .iter()
            .zip(state.controls())
            .enumerate()
            .map(|(i, (column, control))| ColumnSnapshot {
                name: column.name.clone(),
                groups: column.groups.iter().cloned().collect(),
                visible: visible.contains(&i),
                control: control.clone(),
            })
            .collect();

        let rows = table
            .rows
            .iter()
            .map(|row| RowSnapshot {
                test_id: row.test_id.clone(),
                run_id: row.run_id.clone(),
                worst: WorstSnapshot {
                    text: row.summary.text.clone(),
                    color: row.summary.color.clone(),
                    column: row
                        .summary
                        .source
                        .and_then(|i| table.columns.get(i))
                        .map(|c| c.name.clone()),
                },
                cells: visible
                    .iter()
                    .map(|&i| CellSnapshot {
                        column: table.columns[i].name.clone(),
                        text: row.cells[i].text.clone(),
                        color: row.cells[i].color.clone(),
                    })
                    .collect(),
            })
            .collect();

        TableSnapshot {
            active_view: state.active_view().to_string(),
            sort: state.sort,
            columns,
            rows,
        }
    }
}

/// Render the visible part of the table as aligned text
pub fn render_text(table: &ComparisonTable, state: &TableViewState) -> String {
    let visible = state.visible_columns(table);
    let mut output = String::new();

    output.push_str(&format!(
        "view: {}  sort: worst {}\n",
        state.active_view(),
        state.sort.direction.as_str()
    ));

    // Header
    output.push_str(&format!("{:<30} {:<10}", "TEST", "WORST"));
    for &i in &visible {
        output.push_str(&format!(" {:<12}", truncate_or_pad(&table.columns[i].name, 12)));
    }
    output.push('\n');

    // Rows
    for row in &table.rows {
        let worst = if row.summary.text.is_empty() {
            "-"
        } else {
            row.summary.text.as_str()
        };
        output.push_str(&format!(
            "{:<30} {:<10}",
            truncate_or_pad(&row.test_id, 30),
            worst
        ));
        for &i in &visible {
            output.push_str(&format!(" {:<12}", row.cells[i].text));
        }
        output.push('\n');
    }

    output
}

/// Render the current view as JSON output
pub fn render_json(table: &ComparisonTable, state: &TableViewState) -> String {
    serde_json::to_string_pretty(&TableSnapshot::capture(table, state))
        .unwrap_or_else(|_| "{}".to_string())
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}
