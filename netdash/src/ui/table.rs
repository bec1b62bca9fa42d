//! Task table for the terminal: the render target plus drawing with a
//! scrollbar. Alert rows are drawn in red.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::render::{RenderTarget, RowSpec};
use crate::ui::theme::{ALERT_FG, HEADER_FG, MUTED_FG, SB_ARROW, SB_THUMB, SB_TRACK};

// widest a column may grow before its cells are clipped
const MAX_COL_WIDTH: usize = 24;

#[derive(Debug, Default, Clone)]
pub struct TuiTable {
    header: Vec<String>,
    rows: Vec<RowSpec>,
}

impl TuiTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[RowSpec] {
        &self.rows
    }

    // Each column is as wide as its widest cell, header included.
    fn widths(&self) -> Vec<Constraint> {
        (0..self.header.len())
            .map(|i| {
                let body = self
                    .rows
                    .iter()
                    .filter_map(|r| r.cells.get(i))
                    .map(|c| c.chars().count())
                    .max()
                    .unwrap_or(0);
                let w = body.max(self.header[i].chars().count()).min(MAX_COL_WIDTH);
                Constraint::Length(w as u16)
            })
            .collect()
    }
}

impl RenderTarget for TuiTable {
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

/// Rows visible at once inside `area` (borders and header excluded).
pub fn table_page_size(area: Rect) -> usize {
    area.height.saturating_sub(3) as usize
}

pub fn draw_table(f: &mut ratatui::Frame<'_>, area: Rect, table: &TuiTable, scroll_offset: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Tasks ({})", table.rows.len()));
    f.render_widget(block, area);

    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if inner.height < 1 || inner.width < 3 {
        return;
    }

    if table.header.is_empty() {
        let msg = Line::from(Span::styled("No data", Style::default().fg(MUTED_FG)));
        f.render_widget(Paragraph::new(msg), inner);
        return;
    }

    // reserve 2 columns for the scrollbar
    let content = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width.saturating_sub(2),
        height: inner.height,
    };

    let total_rows = table.rows.len();
    let viewport_rows = content.height.saturating_sub(1) as usize;
    let max_off = total_rows.saturating_sub(viewport_rows);
    let offset = scroll_offset.min(max_off);

    let rows = table
        .rows
        .iter()
        .skip(offset)
        .take(viewport_rows)
        .map(|r| {
            let style = if r.alert {
                Style::default().fg(ALERT_FG)
            } else {
                Style::default()
            };
            Row::new(r.cells.iter().map(|c| Cell::from(c.as_str()))).style(style)
        });

    let header = Row::new(table.header.iter().map(|h| Cell::from(h.as_str()))).style(
        Style::default()
            .fg(HEADER_FG)
            .add_modifier(Modifier::BOLD),
    );

    let widget = Table::new(rows, table.widths())
        .header(header)
        .column_spacing(1);
    f.render_widget(widget, content);

    let scroll_area = Rect {
        x: inner.x + inner.width.saturating_sub(1),
        y: inner.y,
        width: 1,
        height: inner.height,
    };
    draw_scrollbar(f, scroll_area, total_rows, viewport_rows, offset);
}

fn draw_scrollbar(f: &mut ratatui::Frame<'_>, area: Rect, total: usize, view: usize, offset: usize) {
    if area.height < 3 {
        return;
    }
    let track = (area.height - 2) as usize;
    let total = total.max(1);
    let view = view.clamp(1, total);
    let max_off = total.saturating_sub(view);

    let thumb_len = (track * view).div_ceil(total).clamp(1, track);
    let thumb_top = if max_off == 0 {
        0
    } else {
        ((track - thumb_len) * offset.min(max_off) + max_off / 2) / max_off
    };

    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
    lines.push(Line::from(Span::styled("▲", Style::default().fg(SB_ARROW))));
    for i in 0..track {
        if i >= thumb_top && i < thumb_top + thumb_len {
            lines.push(Line::from(Span::styled("█", Style::default().fg(SB_THUMB))));
        } else {
            lines.push(Line::from(Span::styled("│", Style::default().fg(SB_TRACK))));
        }
    }
    lines.push(Line::from(Span::styled("▼", Style::default().fg(SB_ARROW))));
    f.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn sample() -> TuiTable {
        let mut t = TuiTable::new();
        t.append_header_cell("Agent");
        t.append_header_cell("Alert");
        t.append_row(RowSpec {
            cells: vec!["r1".into(), "No".into()],
            alert: false,
        });
        t.append_row(RowSpec {
            cells: vec!["r2".into(), "Yes".into()],
            alert: true,
        });
        t
    }

    #[test]
    fn alert_row_drawn_red() {
        let table = sample();
        let mut term = Terminal::new(TestBackend::new(40, 8)).unwrap();
        term.draw(|f| draw_table(f, f.area(), &table, 0)).unwrap();
        let buf = term.backend().buffer();
        // inner area starts at (1,1): header on y=1, rows on y=2 and y=3
        assert_eq!(buf[(1, 2)].symbol(), "r");
        assert_ne!(buf[(1, 2)].fg, ALERT_FG);
        assert_eq!(buf[(1, 3)].symbol(), "r");
        assert_eq!(buf[(1, 3)].fg, ALERT_FG);
    }

    #[test]
    fn empty_table_has_no_header() {
        let table = TuiTable::new();
        let mut term = Terminal::new(TestBackend::new(40, 6)).unwrap();
        term.draw(|f| draw_table(f, f.area(), &table, 0)).unwrap();
        let buf = term.backend().buffer();
        let line: String = (1..8).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert_eq!(line, "No data");
    }
}
