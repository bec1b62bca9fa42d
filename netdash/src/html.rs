//! Static HTML rendition of the dashboard table.

use std::fmt::Write as _;

use crate::render::{RenderTarget, RowSpec};

/// Collects header cells and rows and serializes them as HTML markup.
/// Alert rows are written with red text.
#[derive(Debug, Default, Clone)]
pub struct HtmlTable {
    header: Vec<String>,
    rows: Vec<RowSpec>,
}

impl HtmlTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[RowSpec] {
        &self.rows
    }

    /// The `<table>` element alone.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<table id=\"dataTable\">\n  <thead>\n    <tr id=\"tableHeaderRow\">");
        for h in &self.header {
            let _ = write!(out, "<th>{}</th>", escape(h));
        }
        out.push_str("</tr>\n  </thead>\n  <tbody id=\"dataTableBody\">\n");
        for row in &self.rows {
            if row.alert {
                out.push_str("    <tr style=\"color: red\">");
            } else {
                out.push_str("    <tr>");
            }
            for cell in &row.cells {
                let _ = write!(out, "<td>{}</td>", escape(cell));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("  </tbody>\n</table>\n");
        out
    }

    /// A standalone page wrapping the table.
    pub fn to_document(&self, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{t}</title>\n</head>\n<body>\n<h1>{t}</h1>\n{table}</body>\n</html>\n",
            t = escape(title),
            table = self.to_html(),
        )
    }
}

impl RenderTarget for HtmlTable {
    fn clear(&mut self) {
        self.header.clear();
        self.rows.clear();
    }

    fn append_header_cell(&mut self, text: &str) {
        self.header.push(text.to_string());
    }

    fn append_row(&mut self, row: RowSpec) {
        self.rows.push(row);
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_cell_text() {
        let mut t = HtmlTable::new();
        t.append_header_cell("Agent");
        t.append_row(RowSpec {
            cells: vec!["<b>&".into()],
            alert: false,
        });
        let html = t.to_html();
        assert!(html.contains("<td>&lt;b&gt;&amp;</td>"));
        assert!(!html.contains("<b>"));
    }
}
