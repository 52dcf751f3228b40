//! Worst-time aggregation
//!
//! For every row, the summary cell shows the largest percentage among the
//! currently visible columns, colored like the cell it came from.
//!
//! Global invariants enforced:
//! - Summaries are strictly derived (full recomputation, no carried state)
//! - Ties go to the lowest visible column index (strict `>` scan)
//! - The table is re-sorted by the summary column after every recomputation,
//!   keeping the current sort direction

use crate::sort::{sort_by, SortColumn, SortState};
use crate::table::{format_pct, parse_pct, ComparisonTable, Row, SummaryCell};
use crate::view::TableViewState;

/// Worst visible value of a row as `(column index, value)`.
///
/// `visible[i]` says whether column `i` is visible; missing entries count
/// as hidden. Returns `None` when no visible cell holds a number.
pub fn worst_of(row: &Row, visible: &[bool]) -> Option<(usize, f64)> {
    let mut max = f64::NEG_INFINITY;
    let mut max_index = None;

    for (index, cell) in row.cells.iter().enumerate() {
        if !visible.get(index).copied().unwrap_or(false) {
            continue;
        }

        let value = parse_pct(&cell.text);
        if value > max {
            max = value;
            max_index = Some(index);
        }
    }

    max_index.map(|index| (index, max))
}

/// Summary cell for a row under a visibility mask
pub fn summarize_row(row: &Row, visible: &[bool], neutral_color: &str) -> SummaryCell {
    match worst_of(row, visible) {
        Some((index, value)) => SummaryCell {
            text: format_pct(value),
            color: row.cells[index].color.clone(),
            source: Some(index),
        },
        None => SummaryCell::blank(neutral_color),
    }
}

/// Recompute every row's summary from the visible cells, then re-sort by
/// the summary column with the current direction.
pub fn recompute_worst_times(table: &mut ComparisonTable, state: &mut TableViewState) {
    let visible = state.visibility_mask(table);
    log::debug!(
        "recomputing worst times for {} rows over {} visible columns",
        table.rows.len(),
        visible.iter().filter(|v| **v).count()
    );

    for row in &mut table.rows {
        row.summary = summarize_row(row, &visible, state.neutral_color());
        log::trace!("{}: worst {:?}", row.test_id, row.summary.text);
    }

    let direction = state.sort.direction;
    sort_by(table, SortColumn::Summary, direction);
    state.sort = SortState {
        column: Some(SortColumn::Summary),
        direction,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortDirection;
    use crate::table::{Cell, Column, DEFAULT_NEUTRAL_COLOR};

    fn row(test_id: &str, values: &[&str]) -> Row {
        Row {
            test_id: test_id.to_string(),
            run_id: None,
            summary: SummaryCell::default(),
            cells: values
                .iter()
                .enumerate()
                .map(|(i, v)| Cell {
                    text: v.to_string(),
                    color: format!("#c{}", i),
                })
                .collect(),
        }
    }

    fn table(rows: Vec<Row>) -> ComparisonTable {
        let width = rows.first().map(|r| r.cells.len()).unwrap_or(0);
        let columns = (0..width)
            .map(|i| Column {
                name: format!("m{}", i),
                groups: Default::default(),
            })
            .collect();
        ComparisonTable::new(columns, rows).unwrap()
    }

    #[test]
    fn test_worst_of_first_max_wins_ties() {
        let r = row("t", &["50%", "75%", "75%"]);
        assert_eq!(worst_of(&r, &[true, true, true]), Some((1, 75.0)));
        assert_eq!(worst_of(&r, &[true, false, true]), Some((2, 75.0)));
        assert_eq!(worst_of(&r, &[false, false, false]), None);
    }

    #[test]
    fn test_worst_of_skips_non_numeric_cells() {
        let r = row("t", &["n/a", "-4%"]);
        assert_eq!(worst_of(&r, &[true, true]), Some((1, -4.0)));
        assert_eq!(worst_of(&r, &[true, false]), None);
    }

    #[test]
    fn test_worst_of_short_mask_treats_missing_as_hidden() {
        let r = row("t", &["1%", "9%"]);
        assert_eq!(worst_of(&r, &[true]), Some((0, 1.0)));
    }

    #[test]
    fn test_summarize_row_colors() {
        let r = row("t", &["50%", "75%", "75%"]);
        let summary = summarize_row(&r, &[true, true, true], DEFAULT_NEUTRAL_COLOR);
        assert_eq!(summary.text, "75%");
        assert_eq!(summary.color, "#c1");
        assert_eq!(summary.source, Some(1));

        let blank = summarize_row(&r, &[false, false, false], "#123456");
        assert_eq!(blank.text, "");
        assert_eq!(blank.color, "#123456");
        assert_eq!(blank.source, None);
    }

    #[test]
    fn test_recompute_sorts_worst_first_by_default() {
        let mut t = table(vec![row("low", &["1%", "2%"]), row("high", &["30%", "4%"])]);
        let mut state = TableViewState::new(&t);
        recompute_worst_times(&mut t, &mut state);

        assert_eq!(t.rows[0].test_id, "high");
        assert_eq!(t.rows[0].summary.text, "30%");
        assert_eq!(t.rows[1].summary.text, "2%");
        assert_eq!(state.sort.direction, SortDirection::Descending);
    }

    #[test]
    fn test_recompute_keeps_direction_and_takes_over_sort_column() {
        let mut t = table(vec![row("a", &["1%", "2%"]), row("b", &["30%", "4%"])]);
        let mut state = TableViewState::new(&t);
        state.sort = SortState {
            column: Some(SortColumn::Identifier),
            direction: SortDirection::Ascending,
        };
        recompute_worst_times(&mut t, &mut state);

        assert_eq!(state.sort.column, Some(SortColumn::Summary));
        assert_eq!(state.sort.direction, SortDirection::Ascending);
        assert_eq!(t.rows[0].test_id, "a");
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut t = table(vec![
            row("a", &["3%", "3%"]),
            row("b", &["7%", "1%"]),
            row("c", &["", "0%"]),
        ]);
        let mut state = TableViewState::new(&t);
        recompute_worst_times(&mut t, &mut state);
        let first = t.clone();
        recompute_worst_times(&mut t, &mut state);
        assert_eq!(first, t);
    }
}
