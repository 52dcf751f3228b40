//! View-state controller
//!
//! Owns which columns are visible. Two independent exclusion sets decide
//! visibility: one driven by the active view, one by per-column toggles.
//! A column is visible iff it is in neither set.
//!
//! Every visibility-changing operation ends with a full worst-time
//! recomputation, so the summary column never lags the visibility state.

use crate::engine::recompute_worst_times;
use crate::sort::SortState;
use crate::table::{ComparisonTable, DEFAULT_NEUTRAL_COLOR};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// View name that selects every column
pub const ALL_VIEW: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveView {
    All,
    Group(String),
}

impl ActiveView {
    pub fn from_name(name: &str) -> Self {
        if name == ALL_VIEW {
            ActiveView::All
        } else {
            ActiveView::Group(name.to_string())
        }
    }
}

impl fmt::Display for ActiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveView::All => write!(f, "{}", ALL_VIEW),
            ActiveView::Group(name) => write!(f, "{}", name),
        }
    }
}

/// Per-column visibility checkbox, kept in sync by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleControl {
    pub column: String,
    pub checked: bool,
    pub enabled: bool,
}

/// Startup options for a view state
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub neutral_color: String,
    pub sort: SortState,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            neutral_color: DEFAULT_NEUTRAL_COLOR.to_string(),
            sort: SortState::default(),
        }
    }
}

/// Visibility and sort state of one comparison table
#[derive(Debug, Clone, PartialEq)]
pub struct TableViewState {
    active_view: ActiveView,
    view_excluded: BTreeSet<String>,
    column_excluded: BTreeSet<String>,
    controls: Vec<ToggleControl>,
    neutral_color: String,
    pub sort: SortState,
}

impl TableViewState {
    /// Everything visible, worst-first
    pub fn new(table: &ComparisonTable) -> Self {
        Self::with_options(table, ViewOptions::default())
    }

    pub fn with_options(table: &ComparisonTable, options: ViewOptions) -> Self {
        let controls = table
            .columns
            .iter()
            .map(|c| ToggleControl {
                column: c.name.clone(),
                checked: true,
                enabled: true,
            })
            .collect();

        TableViewState {
            active_view: ActiveView::All,
            view_excluded: BTreeSet::new(),
            column_excluded: BTreeSet::new(),
            controls,
            neutral_color: options.neutral_color,
            sort: options.sort,
        }
    }

    pub fn active_view(&self) -> &ActiveView {
        &self.active_view
    }

    pub fn controls(&self) -> &[ToggleControl] {
        &self.controls
    }

    pub fn neutral_color(&self) -> &str {
        &self.neutral_color
    }

    pub fn is_visible(&self, column: &str) -> bool {
        !self.view_excluded.contains(column) && !self.column_excluded.contains(column)
    }

    /// Visibility flag per column index
    pub fn visibility_mask(&self, table: &ComparisonTable) -> Vec<bool> {
        table
            .columns
            .iter()
            .map(|c| self.is_visible(&c.name))
            .collect()
    }

    /// Indices of visible columns, in column order
    pub fn visible_columns(&self, table: &ComparisonTable) -> Vec<usize> {
        table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| self.is_visible(&c.name))
            .map(|(i, _)| i)
            .collect()
    }

    /// Activate a named view, or return to "all" if it is already active
    pub fn select_view(&mut self, table: &mut ComparisonTable, view_name: &str) {
        let requested = ActiveView::from_name(view_name);
        if requested == self.active_view {
            log::debug!("view {} already active, resetting", view_name);
            self.reset_view(table);
            return;
        }

        self.view_excluded = match &requested {
            ActiveView::All => BTreeSet::new(),
            ActiveView::Group(group) => table
                .columns
                .iter()
                .filter(|c| !c.in_group(group))
                .map(|c| c.name.clone())
                .collect(),
        };
        self.column_excluded.clear();

        for (control, column) in self.controls.iter_mut().zip(&table.columns) {
            let in_view = match &requested {
                ActiveView::All => true,
                ActiveView::Group(group) => column.in_group(group),
            };
            control.checked = in_view;
            control.enabled = in_view;
        }

        if self.view_excluded.len() == table.columns.len() && !table.columns.is_empty() {
            log::warn!("view {} matches no columns", view_name);
        }
        log::debug!(
            "selected view {} ({} of {} columns visible)",
            view_name,
            table.columns.len() - self.view_excluded.len(),
            table.columns.len()
        );
        self.active_view = requested;

        recompute_worst_times(table, self);
    }

    /// Show every column and re-enable every toggle
    pub fn reset_view(&mut self, table: &mut ComparisonTable) {
        self.active_view = ActiveView::All;
        self.view_excluded.clear();
        self.column_excluded.clear();
        for control in &mut self.controls {
            control.checked = true;
            control.enabled = true;
        }
        log::debug!("view reset, all {} columns visible", table.columns.len());

        recompute_worst_times(table, self);
    }

    /// Flip one column's individual override, keeping the active view
    pub fn toggle_column(&mut self, table: &mut ComparisonTable, column: &str) {
        if table.column_index(column).is_none() {
            log::warn!("toggled unknown column {}", column);
            recompute_worst_times(table, self);
            return;
        }

        if !self.column_excluded.remove(column) {
            self.column_excluded.insert(column.to_string());
        }

        // A column outside the active view stays hidden whatever its override
        let visible = self.is_visible(column);
        if let Some(control) = self.controls.iter_mut().find(|c| c.column == column) {
            control.checked = visible;
        }
        log::debug!("column {} {}", column, if visible { "shown" } else { "hidden" });

        recompute_worst_times(table, self);
    }
}
