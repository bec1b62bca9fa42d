//! Free-text filtering over agent, target and command type.

use crate::types::Record;

/// `needle` must already be lower-cased.
pub fn matches_query(r: &Record, needle: &str) -> bool {
    r.agent().to_lowercase().contains(needle)
        || r.target().to_lowercase().contains(needle)
        || r.command_type().to_lowercase().contains(needle)
}

/// Records whose agent, target or command type contains `query`,
/// case-insensitively. Order is preserved and `records` is untouched;
/// an empty query selects everything.
pub fn filter_records<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| matches_query(r, &needle))
        .collect()
}
