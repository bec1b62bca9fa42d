//! Search box: the free-text filter input.

use ratatui::{
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::theme::MUTED_FG;

pub fn draw_search(f: &mut ratatui::Frame<'_>, area: Rect, query: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Search (agent, target, command)");
    let line = if query.is_empty() {
        Line::from(Span::styled(
            "type to filter, Ctrl-U to clear",
            Style::default().fg(MUTED_FG),
        ))
    } else {
        Line::from(query.to_string())
    };
    f.render_widget(Paragraph::new(line).block(block), area);

    // caret after the query text, kept inside the borders
    if area.width > 2 && area.height > 2 {
        let max_x = area.x + area.width - 2;
        let x = (area.x + 1).saturating_add(query.chars().count() as u16).min(max_x);
        f.set_cursor_position(Position::new(x, area.y + 1));
    }
}
