//! Markdown rendering of reports.

use crate::engine::Report;
use crate::table::Table;

/// Render a report: heading, chart hint, then its table.
pub fn render_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&format!("## {}\n\n", escape(&report.name)));
    output.push_str(&format!("**{}**\n\n", escape(&report.title)));

    if !report.chart.bars.is_empty() {
        output.push_str(&format!("- **Bars:** {}\n", list(&report.chart.bars)));
    }
    if !report.chart.lines.is_empty() {
        output.push_str(&format!("- **Lines:** {}\n", list(&report.chart.lines)));
    }
    if !report.chart.bars.is_empty() || !report.chart.lines.is_empty() {
        output.push('\n');
    }

    output.push_str(&render_table(&report.table));
    output
}

/// Render a table with its row labels as the first column.
pub fn render_table(table: &Table) -> String {
    if table.is_empty() {
        return "_No data._\n".to_string();
    }

    let mut output = String::new();

    output.push_str("| |");
    for column in table.columns() {
        output.push_str(&format!(" {} |", escape(column)));
    }
    output.push('\n');

    output.push_str("|---|");
    for _ in table.columns() {
        output.push_str("---:|");
    }
    output.push('\n');

    for (label, row) in table.iter() {
        output.push_str(&format!("| {} |", escape(label)));
        for cell in row {
            output.push_str(&format!(" {} |", cell));
        }
        output.push('\n');
    }

    output
}

fn list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("`{}`", c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Keep a cell on one line and its pipes literal.
fn escape(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .replace('|', "\\|")
}
