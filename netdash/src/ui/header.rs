//! Top header with the server and record counts.

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
};

use crate::ui::util::truncate_middle;

/// Counts shown in the header once the task list has arrived.
pub struct Counts {
    pub shown: usize,
    pub total: usize,
    pub alerts: usize,
}

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, server: &str, counts: Option<Counts>) {
    let server = truncate_middle(server, (area.width as usize / 3).max(12));
    let title = header_title(&server, counts);
    f.render_widget(Block::default().title(title).borders(Borders::BOTTOM), area);
}

fn header_title(server: &str, counts: Option<Counts>) -> String {
    match counts {
        Some(c) if c.shown == c.total => format!(
            "netdash - {server} | {} records, {} alerts  (Esc to quit)",
            c.total, c.alerts
        ),
        Some(c) => format!(
            "netdash - {server} | showing {} of {} records, {} alerts  (Esc to quit)",
            c.shown, c.total, c.alerts
        ),
        None => format!("netdash - {server} | loading...  (Esc to quit)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_plain_ascii() {
        let loading = header_title("http://h:8000", None);
        let full = header_title(
            "http://h:8000",
            Some(Counts {
                shown: 3,
                total: 3,
                alerts: 1,
            }),
        );
        let filtered = header_title(
            "http://h:8000",
            Some(Counts {
                shown: 1,
                total: 3,
                alerts: 1,
            }),
        );
        assert_eq!(full, "netdash - http://h:8000 | 3 records, 1 alerts  (Esc to quit)");
        assert!(filtered.contains("showing 1 of 3 records"));
        for t in [loading, full, filtered] {
            assert!(t.is_ascii(), "{t}");
        }
    }
}
