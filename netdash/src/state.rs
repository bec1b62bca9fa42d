//! Dashboard state: the fetched records, the current query and the render
//! target they are drawn into.

use tracing::debug;

use crate::filter::filter_records;
use crate::render::{populate_table, RenderTarget};
use crate::types::Record;

pub struct Dashboard<T: RenderTarget> {
    records: Vec<Record>,
    query: String,
    shown: usize,
    target: T,
}

impl<T: RenderTarget> Dashboard<T> {
    pub fn new(target: T) -> Self {
        Self {
            records: Vec::new(),
            query: String::new(),
            shown: 0,
            target,
        }
    }

    /// Start with a query already typed; nothing is drawn until `load`.
    pub fn with_query(target: T, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::new(target)
        }
    }

    /// Replace the record set wholesale and redraw.
    pub fn load(&mut self, records: Vec<Record>) {
        debug!(count = records.len(), "records loaded");
        self.records = records;
        self.render();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.render();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.render();
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.render();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.render();
    }

    /// Redraw the target from the records matching the current query.
    pub fn render(&mut self) {
        let visible = filter_records(&self.records, &self.query);
        self.shown = visible.len();
        populate_table(&mut self.target, visible);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_filtered(&self) -> bool {
        !self.query.is_empty()
    }

    /// Number of records currently displayed.
    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn alert_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_alert).count()
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }
}
