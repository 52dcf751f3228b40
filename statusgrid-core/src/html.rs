//! HTML report generation
//!
//! Generates a self-contained HTML page for the current view of a table.
//! The page is a pure projection of the view state: hidden columns are
//! omitted, checkbox controls carry their synchronized state, and the
//! worst-time header carries the sort indicator.

use crate::navigation::drilldown_url;
use crate::sort::{SortColumn, SortDirection};
use crate::table::ComparisonTable;
use crate::view::TableViewState;

/// Link target for drill-down menus; `None` renders cells without links
pub struct HtmlOptions<'a> {
    pub page_url: Option<&'a str>,
    pub default_field: u32,
}

/// Render the table and its view state as an HTML document
pub fn render_html(
    table: &ComparisonTable,
    state: &TableViewState,
    options: &HtmlOptions<'_>,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Global Status - {view}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        {controls}
        {data_table}
        {footer}
    </div>
</body>
</html>"#,
        view = html_escape(&state.active_view().to_string()),
        css = inline_css(),
        controls = render_controls(table, state),
        data_table = render_data_table(table, state, options),
        footer = render_footer(),
    )
}

fn inline_css() -> &'static str {
    r#"
body { font-family: system-ui, -apple-system, 'Segoe UI', sans-serif; color: #111827; }
.container { max-width: 1400px; margin: 0 auto; padding: 2rem; }
.controls { display: flex; flex-wrap: wrap; gap: 0.75rem; margin-bottom: 1rem; }
.controls .views a { margin-right: 0.5rem; }
.controls .views a.active { font-weight: 700; }
table#data-table { border-collapse: collapse; font-size: 0.875rem; }
table#data-table th, table#data-table td { padding: 0.25rem 0.5rem; border: 1px solid #e5e7eb; }
th.sorttable_sorted::after { content: " \25B4"; }
th.sorttable_sorted_reverse::after { content: " \25BE"; }
footer { margin-top: 2rem; color: #6b7280; font-size: 0.75rem; }
"#
}

/// View selectors and per-column checkboxes
fn render_controls(table: &ComparisonTable, state: &TableViewState) -> String {
    let active = state.active_view().to_string();
    let views: String = std::iter::once(crate::view::ALL_VIEW)
        .chain(table.groups())
        .map(|name| {
            let class = if name == active { " class=\"active\"" } else { "" };
            format!(
                r#"<a href="?view={name}" data-view="{name}"{class}>{name}</a>"#,
                name = html_escape(name),
                class = class,
            )
        })
        .collect();

    let checkboxes: String = table
        .columns
        .iter()
        .zip(state.controls())
        .map(|(column, control)| {
            format!(
                r#"<label><input type="checkbox" machine="{name}" data-groups="{groups}"{checked}{disabled}> {name}</label>"#,
                name = html_escape(&column.name),
                groups = html_escape(&column.groups.iter().cloned().collect::<Vec<_>>().join(" ")),
                checked = if control.checked { " checked" } else { "" },
                disabled = if control.enabled { "" } else { " disabled" },
            )
        })
        .collect();

    format!(
        r#"<section class="controls">
    <div class="views">{views}</div>
    <div class="columns">{checkboxes}</div>
</section>"#,
        views = views,
        checkboxes = checkboxes,
    )
}

fn sort_class(state: &TableViewState, column: SortColumn) -> &'static str {
    match state.sort.indicator(column) {
        Some(SortDirection::Ascending) => " sorttable_sorted",
        Some(SortDirection::Descending) => " sorttable_sorted_reverse",
        None => "",
    }
}

fn render_data_table(
    table: &ComparisonTable,
    state: &TableViewState,
    options: &HtmlOptions<'_>,
) -> String {
    let visible = state.visible_columns(table);

    let headers: String = visible
        .iter()
        .map(|&i| {
            let column = &table.columns[i];
            format!(
                r#"<th class="sortable{sorted}" machine="{name}" data-groups="{groups}">{name}</th>"#,
                sorted = sort_class(state, SortColumn::Data(i)),
                name = html_escape(&column.name),
                groups = html_escape(&column.groups.iter().cloned().collect::<Vec<_>>().join(" ")),
            )
        })
        .collect();

    let rows: String = table
        .rows
        .iter()
        .map(|row| {
            let link = match (options.page_url, row.run_id.as_deref()) {
                (Some(url), Some(run_id)) => format!(
                    r#" data-href="{}""#,
                    html_escape(&drilldown_url(url, run_id, &row.test_id, options.default_field))
                ),
                _ => String::new(),
            };
            let cells: String = visible
                .iter()
                .map(|&i| {
                    let cell = &row.cells[i];
                    format!(
                        r#"<td class="data-cell" bgcolor="{color}"{link}>{text}</td>"#,
                        color = html_escape(&cell.color),
                        link = link,
                        text = html_escape(&cell.text),
                    )
                })
                .collect();

            format!(
                r#"<tr class="data-row" test_id="{id}">
    <td>{id}</td>
    <td bgcolor="{worst_color}">{worst}</td>
    {cells}
</tr>"#,
                id = html_escape(&row.test_id),
                worst_color = html_escape(&row.summary.color),
                worst = html_escape(&row.summary.text),
                cells = cells,
            )
        })
        .collect();

    format!(
        r#"<section class="section">
    <table id="data-table">
        <thead id="data-table-header">
            <tr>
                <th class="sortable{test_sorted}">Test</th>
                <th id="worst-time-header" class="sortable{worst_sorted}">Worst Time</th>
                {headers}
            </tr>
        </thead>
        <tbody>
            {rows}
        </tbody>
    </table>
</section>"#,
        test_sorted = sort_class(state, SortColumn::Identifier),
        worst_sorted = sort_class(state, SortColumn::Summary),
        headers = headers,
        rows = rows,
    )
}

fn render_footer() -> String {
    r#"<footer>
    <p>Generated by statusgrid</p>
</footer>"#
        .to_string()
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
