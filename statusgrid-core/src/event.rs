//! Viewer interaction events
//!
//! Each event runs to completion against the table and its view state
//! before the next one is applied.
//!
//! Textual form (used by the CLI):
//! - `ready` - initial page-ready recomputation
//! - `view:NAME` - select a view (`view:all` for every column)
//! - `reset` - show every column
//! - `toggle:COLUMN` - flip one column's visibility
//! - `sort:COLUMN` - header click on `test`, `worst`, or a column name
//! - `sort:COLUMN:asc|desc` - sort with an explicit direction

use crate::engine::recompute_worst_times;
use crate::sort::{header_click, sort_by, SortColumn, SortDirection, SortState};
use crate::table::ComparisonTable;
use crate::view::TableViewState;
use std::str::FromStr;

/// Header a sort event refers to, by its displayed name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortTarget {
    Identifier,
    Summary,
    Column(String),
}

impl SortTarget {
    fn parse(s: &str) -> Self {
        match s {
            "test" => SortTarget::Identifier,
            "worst" => SortTarget::Summary,
            other => SortTarget::Column(other.to_string()),
        }
    }

    fn resolve(&self, table: &ComparisonTable) -> Option<SortColumn> {
        match self {
            SortTarget::Identifier => Some(SortColumn::Identifier),
            SortTarget::Summary => Some(SortColumn::Summary),
            SortTarget::Column(name) => table.column_index(name).map(SortColumn::Data),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Ready,
    SelectView(String),
    ResetView,
    ToggleColumn(String),
    Sort(SortTarget, Option<SortDirection>),
}

impl FromStr for Event {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg)),
            None => (s, None),
        };

        match (kind, arg) {
            ("ready", None) => Ok(Event::Ready),
            ("reset", None) => Ok(Event::ResetView),
            ("view", Some(name)) if !name.is_empty() => Ok(Event::SelectView(name.to_string())),
            ("toggle", Some(name)) if !name.is_empty() => {
                Ok(Event::ToggleColumn(name.to_string()))
            }
            ("sort", Some(target)) if !target.is_empty() => {
                // Column names may contain ':', so the direction is only the last segment
                match target.rsplit_once(':') {
                    Some((column, dir)) if matches!(dir, "asc" | "desc") => Ok(Event::Sort(
                        SortTarget::parse(column),
                        Some(dir.parse()?),
                    )),
                    _ => Ok(Event::Sort(SortTarget::parse(target), None)),
                }
            }
            _ => anyhow::bail!(
                "invalid event: {} (expected ready, reset, view:NAME, toggle:COLUMN or sort:COLUMN[:asc|desc])",
                s
            ),
        }
    }
}

impl Event {
    /// Apply this event to the table
    pub fn apply(&self, table: &mut ComparisonTable, state: &mut TableViewState) {
        log::debug!("event {:?}", self);
        match self {
            Event::Ready => recompute_worst_times(table, state),
            Event::SelectView(name) => state.select_view(table, name),
            Event::ResetView => state.reset_view(table),
            Event::ToggleColumn(name) => state.toggle_column(table, name),
            Event::Sort(target, direction) => {
                let Some(column) = target.resolve(table) else {
                    log::warn!("cannot sort by unknown column {:?}", target);
                    return;
                };
                match direction {
                    Some(direction) => {
                        sort_by(table, column, *direction);
                        state.sort = SortState {
                            column: Some(column),
                            direction: *direction,
                        };
                    }
                    None => header_click(table, &mut state.sort, column),
                }
            }
        }
    }
}

/// Apply events in order
pub fn apply_all(table: &mut ComparisonTable, state: &mut TableViewState, events: &[Event]) {
    for event in events {
        event.apply(table, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events() {
        assert_eq!("ready".parse::<Event>().unwrap(), Event::Ready);
        assert_eq!("reset".parse::<Event>().unwrap(), Event::ResetView);
        assert_eq!(
            "view:linux".parse::<Event>().unwrap(),
            Event::SelectView("linux".to_string())
        );
        assert_eq!(
            "toggle:machine7".parse::<Event>().unwrap(),
            Event::ToggleColumn("machine7".to_string())
        );
        assert_eq!(
            "sort:worst".parse::<Event>().unwrap(),
            Event::Sort(SortTarget::Summary, None)
        );
        assert_eq!(
            "sort:test:desc".parse::<Event>().unwrap(),
            Event::Sort(SortTarget::Identifier, Some(SortDirection::Descending))
        );
    }

    #[test]
    fn test_parse_sort_column_with_colon() {
        assert_eq!(
            "sort:host:O3:asc".parse::<Event>().unwrap(),
            Event::Sort(
                SortTarget::Column("host:O3".to_string()),
                Some(SortDirection::Ascending)
            )
        );
        assert_eq!(
            "sort:host:O3".parse::<Event>().unwrap(),
            Event::Sort(SortTarget::Column("host:O3".to_string()), None)
        );
    }

    #[test]
    fn test_reject_malformed_events() {
        for bad in ["", "view", "view:", "toggle", "reset:now", "jump:3", "sort:"] {
            assert!(bad.parse::<Event>().is_err(), "{:?} should be rejected", bad);
        }
    }
}
