use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::ui::tables::{report_table, summary_tables, ReportTab, ReportTable};
use crate::usecase::services::report_service::Dashboard;

const STYLE: &str = "body{font-family:sans-serif;margin:16px;}\
table{border-collapse:collapse;margin-bottom:24px;}\
th,td{border:1px solid #ccc;padding:4px 8px;}\
th{background:#f4f4f4;}\
tfoot td{font-weight:bold;}\
tr.detail td{background:#fafafa;font-size:90%;}";

pub fn html_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn write_row(out: &mut String, cells: &[String], table: &ReportTable) {
    out.push_str("<tr>");
    for (idx, cell) in cells.iter().enumerate() {
        let align = table
            .columns
            .get(idx)
            .map(|column| column.align.css())
            .unwrap_or("left");
        let _ = write!(out, "<td style=\"text-align:{align}\">{}</td>", html_escape(cell));
    }
    out.push_str("</tr>");
}

/// One table with every detail row expanded beneath its parent.
pub fn render_table(table: &ReportTable) -> String {
    let mut out = String::new();
    let _ = write!(out, "<h2>{}</h2><table><thead><tr>", html_escape(&table.title));
    for column in &table.columns {
        let _ = write!(out, "<th>{}</th>", html_escape(&column.label));
    }
    out.push_str("</tr></thead><tbody>");

    for group in &table.groups {
        write_row(&mut out, &group.cells, table);
        if group.detail.is_empty() {
            continue;
        }
        let _ = write!(
            out,
            "<tr class=\"detail\"><td colspan=\"{}\"><table><thead><tr>",
            table.columns.len()
        );
        for column in &table.detail_columns {
            let _ = write!(out, "<th>{}</th>", html_escape(&column.label));
        }
        out.push_str("</tr></thead><tbody>");
        for line in &group.detail {
            out.push_str("<tr>");
            for cell in line {
                let _ = write!(out, "<td>{}</td>", html_escape(cell));
            }
            out.push_str("</tr>");
        }
        out.push_str("</tbody></table></td></tr>");
    }
    out.push_str("</tbody>");

    if let Some(footer) = &table.footer {
        out.push_str("<tfoot>");
        write_row(&mut out, footer, table);
        out.push_str("</tfoot>");
    }
    out.push_str("</table>");
    out
}

/// Standalone document with the summaries followed by every report.
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::from("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    let _ = write!(out, "<title>Demand Planner</title><style>{STYLE}</style></head><body>");
    out.push_str("<h1>Demand Planner</h1>");
    if let Some(style_id) = &dashboard.criteria.style_search {
        let _ = write!(out, "<p>Style: {}</p>", html_escape(style_id));
    }
    let _ = write!(out, "<p>Sale days in window: {}</p>", dashboard.total_sale_days);

    for table in summary_tables(dashboard) {
        out.push_str(&render_table(&table));
    }
    for tab in ReportTab::ALL {
        out.push_str(&render_table(&report_table(dashboard, tab)));
    }
    out.push_str("</body></html>");
    out
}

pub fn export_dashboard(path: &Path, dashboard: &Dashboard) -> Result<()> {
    let document = render_dashboard(dashboard);
    fs::write(path, document)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    info!(path = %path.display(), "dashboard exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::tables::{Align, Column, RowGroup};

    #[test]
    fn html_escape_covers_markup_characters() {
        assert_eq!(
            html_escape("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn render_table_nests_detail_rows() {
        let table = ReportTable {
            title: "Demand".to_string(),
            columns: vec![
                Column {
                    label: "Style ID".to_string(),
                    align: Align::Left,
                },
                Column {
                    label: "Demand".to_string(),
                    align: Align::Right,
                },
            ],
            detail_columns: vec![Column {
                label: "Uniware SKU".to_string(),
                align: Align::Left,
            }],
            groups: vec![RowGroup {
                key: "A<1>".to_string(),
                cells: vec!["A<1>".to_string(), "750".to_string()],
                detail: vec![vec!["A-M".to_string()]],
            }],
            footer: None,
        };

        let html = render_table(&table);

        assert!(html.contains("<td style=\"text-align:left\">A&lt;1&gt;</td>"));
        assert!(html.contains("<td style=\"text-align:right\">750</td>"));
        assert!(html.contains("<tr class=\"detail\"><td colspan=\"2\">"));
        assert!(html.contains("<th>Uniware SKU</th>"));
        assert!(!html.contains("<tfoot>"));
    }
}
