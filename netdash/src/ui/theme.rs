//! Shared UI colors.

use ratatui::style::Color;

pub const ALERT_FG: Color = Color::Red;
pub const HEADER_FG: Color = Color::Cyan;
pub const MUTED_FG: Color = Color::DarkGray;

// Scrollbar
pub const SB_ARROW: Color = Color::Rgb(170, 170, 180);
pub const SB_TRACK: Color = Color::Rgb(170, 170, 180);
pub const SB_THUMB: Color = Color::Rgb(170, 170, 180);
