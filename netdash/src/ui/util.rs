//! Small UI helpers: scrolling and truncation.

use crossterm::event::{KeyCode, KeyEvent};

/// Apply Up/Down/PageUp/PageDown/Home/End to a scroll offset.
/// Returns false for keys that are not scroll keys.
pub fn scroll_by_key(offset: &mut usize, key: KeyEvent, page: usize) -> bool {
    let page = page.max(1);
    match key.code {
        KeyCode::Up => *offset = offset.saturating_sub(1),
        KeyCode::Down => *offset = offset.saturating_add(1),
        KeyCode::PageUp => *offset = offset.saturating_sub(page),
        KeyCode::PageDown => *offset = offset.saturating_add(page),
        KeyCode::Home => *offset = 0,
        KeyCode::End => *offset = usize::MAX,
        _ => return false,
    }
    true
}

pub fn clamp_scroll(offset: &mut usize, total: usize, view: usize) {
    *offset = (*offset).min(total.saturating_sub(view));
}

pub fn truncate_middle(s: &str, max: usize) -> String {
    let n = s.chars().count();
    if n <= max {
        return s.to_string();
    }
    if max <= 3 {
        return "...".into();
    }
    let keep = max - 3;
    let left: String = s.chars().take(keep / 2).collect();
    let right: String = s.chars().skip(n - (keep - keep / 2)).collect();
    format!("{left}...{right}")
}
