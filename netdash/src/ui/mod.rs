//! UI module root: exposes drawing functions for individual panels.

pub mod header;
pub mod search;
pub mod table;
pub mod theme;
pub mod util;
