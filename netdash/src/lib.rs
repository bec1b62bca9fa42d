//! netdash: fetches network monitoring task results and shows them as a
//! filterable table, either in the terminal or as a static HTML page.

pub mod app;
pub mod fetch;
pub mod filter;
pub mod html;
pub mod logging;
pub mod profiles;
pub mod render;
pub mod state;
pub mod types;
pub mod ui;
