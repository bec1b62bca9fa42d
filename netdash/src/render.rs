//! Table rendering: fixed column schema and the render target seam.
//!
//! `populate_table` always clears the target first, so rendering the same
//! records twice leaves the target in the same state.

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::types::{CellValue, Record};

/// Header labels, in display order.
pub const COLUMNS: [&str; 18] = [
    "Command Type",
    "Agent",
    "Target",
    "Alert",
    "Interface",
    "Connectivity",
    "CPU",
    "Memory",
    "Avg Latency",
    "Stdev Latency",
    "Jitter",
    "Bandwidth",
    "Loss",
    "TX Bytes",
    "TX Packets",
    "RX Bytes",
    "RX Packets",
    "Timestamp",
];

/// Placeholder for absent or blank values.
pub const MISSING: &str = "-";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One body row: one string per column plus the alert marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSpec {
    pub cells: Vec<String>,
    pub alert: bool,
}

/// Anything that can display the dashboard table.
pub trait RenderTarget {
    /// Drop all header cells and body rows.
    fn clear(&mut self);
    fn append_header_cell(&mut self, text: &str);
    fn append_row(&mut self, row: RowSpec);
}

/// Clear `target` and fill it with the header and one row per record.
/// With no records the target is left empty, header included.
pub fn populate_table<'a, T, I>(target: &mut T, records: I)
where
    T: RenderTarget + ?Sized,
    I: IntoIterator<Item = &'a Record>,
{
    target.clear();

    let mut records = records.into_iter().peekable();
    if records.peek().is_none() {
        warn!("No data available to populate.");
        return;
    }

    for name in COLUMNS {
        target.append_header_cell(name);
    }

    let mut n = 0usize;
    for record in records {
        target.append_row(row_for(record));
        n += 1;
    }
    debug!(rows = n, "table populated");
}

/// Build the display row for a single record.
pub fn row_for(r: &Record) -> RowSpec {
    let cells = vec![
        text_cell(r.command_type.as_deref()),
        text_cell(r.agent.as_deref()),
        text_cell(r.target.as_deref()),
        if r.is_alert { "Yes" } else { "No" }.to_string(),
        value_cell(r.interface_name.as_ref()),
        value_cell(r.connectivity.as_ref()),
        value_cell(r.cpu.as_ref()),
        value_cell(r.memory.as_ref()),
        value_cell(r.avg_latency.as_ref()),
        value_cell(r.stdev_latency.as_ref()),
        value_cell(r.jitter.as_ref()),
        value_cell(r.bandwidth.as_ref()),
        value_cell(r.loss.as_ref()),
        value_cell(r.tx_bytes.as_ref()),
        value_cell(r.tx_packets.as_ref()),
        value_cell(r.rx_bytes.as_ref()),
        value_cell(r.rx_packets.as_ref()),
        format_timestamp(r.epoch_secs()),
    ];
    RowSpec {
        cells,
        alert: r.is_alert,
    }
}

fn text_cell(v: Option<&str>) -> String {
    match v {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => MISSING.to_string(),
    }
}

fn value_cell(v: Option<&CellValue>) -> String {
    match v {
        Some(v) if !v.is_blank() => v.to_string(),
        _ => MISSING.to_string(),
    }
}

/// Render epoch seconds as local date-time. The value is scaled to
/// milliseconds first so fractional seconds survive.
pub fn format_timestamp(secs: Option<f64>) -> String {
    let Some(secs) = secs.filter(|s| s.is_finite()) else {
        return MISSING.to_string();
    };
    let millis = (secs * 1000.0) as i64;
    match DateTime::from_timestamp_millis(millis) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
        None => MISSING.to_string(),
    }
}
