//! Terminal Rendering
//!
//! Plain-text renderers used by the `estate-chat` binary.

use std::fmt::Write;

use crate::chat::ChatMessage;
use crate::shaping::{ChartSpec, ResultView};
use crate::table::{Pager, TableData};

/// Widest a table cell is allowed to get before it is truncated
const MAX_CELL_WIDTH: usize = 24;

/// One chat bubble as a line of text
pub fn render_message(message: &ChatMessage) -> String {
    format!("{}: {}", message.author(), message.text)
}

/// Summary panel, chart and the pager's page of the table
pub fn render_view(view: &ResultView, pager: Option<&Pager>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "== Analysis Summary ==");
    let _ = writeln!(out, "{}", view.summary_text());

    if let Some(chart) = &view.chart {
        out.push('\n');
        out.push_str(&render_chart(chart));
    }

    if let (Some(table), Some(pager)) = (&view.table, pager) {
        out.push('\n');
        out.push_str(&render_table_page(table, pager));
    }

    out
}

/// Each line of a chart as `name: year=value, ...`
pub fn render_chart(chart: &ChartSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", chart.title);

    if chart.is_empty() {
        let _ = writeln!(out, "(no data)");
        return out;
    }

    let years = chart.years();
    for line in &chart.lines {
        let points: Vec<String> = chart
            .points(line)
            .into_iter()
            .map(|(idx, value)| match years.get(idx) {
                Some(year) => format!("{}={}", year, format_value(value)),
                None => format_value(value),
            })
            .collect();

        if points.is_empty() {
            let _ = writeln!(out, "{}: -", line.name);
        } else {
            let _ = writeln!(out, "{}: {}", line.name, points.join(", "));
        }
    }

    out
}

/// The current page of a table with a footer naming the page
pub fn render_table_page(table: &TableData, pager: &Pager) -> String {
    let columns = table.columns();
    let page = table.page(pager);

    let cells: Vec<Vec<String>> = page
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| truncate(&TableData::cell(row, column)))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(truncate(column).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "== Data Table ==");

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, &width)| pad(&truncate(column), width))
        .collect();
    let _ = writeln!(out, "{}", header.join(" | ").trim_end());

    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| pad(cell, width))
            .collect();
        let _ = writeln!(out, "{}", line.join(" | ").trim_end());
    }

    let _ = writeln!(out, "{} ({} rows)", pager.label(), table.len());
    out
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        text.to_string()
    } else {
        let kept: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", kept)
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}
