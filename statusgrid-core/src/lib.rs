//! statusgrid core library - machine-comparison performance tables
//!
//! One row per test, one column per machine. Viewers pick subsets of
//! columns; each row's worst visible time is summarized and the table is
//! kept sorted by it.

#![deny(warnings)]

// Global invariants enforced in this crate:
// - No global mutable state; all view state lives in `TableViewState`
// - No randomness, clocks, threads, or async
// - Summaries are always a full recomputation from visible cells
// - Row order changes only through a stable sort

pub mod config;
pub mod engine;
pub mod event;
pub mod html;
pub mod navigation;
pub mod report;
pub mod sort;
pub mod table;
pub mod view;

pub use config::ResolvedConfig;
pub use engine::{recompute_worst_times, worst_of};
pub use event::Event;
pub use report::{render_json, render_text, TableSnapshot};
pub use sort::{SortColumn, SortDirection, SortState};
pub use table::{Cell, Column, ComparisonTable, Row, SummaryCell};
pub use view::{ActiveView, TableViewState};

/// Build the page-ready view of a freshly loaded table.
///
/// Runs the initial recomputation, then activates the configured initial
/// view if there is one.
pub fn open_view(table: &mut ComparisonTable, config: &ResolvedConfig) -> TableViewState {
    table.clear_summaries(&config.neutral_color);
    let mut state = TableViewState::with_options(table, config.view_options());
    Event::Ready.apply(table, &mut state);

    if let Some(view) = &config.initial_view {
        state.select_view(table, view);
    }

    log::debug!(
        "opened table with {} rows, {} columns, view {}",
        table.rows.len(),
        table.columns.len(),
        state.active_view()
    );
    state
}
