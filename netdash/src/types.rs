//! Types that mirror the `/tasks` JSON schema.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A scalar cell as reported by the server. The server stores integers, reals
/// and text in the same columns depending on the command type, so every
/// optional column accepts any of them. Arrays and objects are kept as their
/// JSON text; decoding a cell never fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Blank values render as the missing marker. Numeric zero is a real
    /// reading and is not blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Bool(b) => !b,
            CellValue::Int(_) => false,
            CellValue::Float(f) => f.is_nan(),
            CellValue::Text(s) => s.is_empty(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Bool(b) => *b,
            CellValue::Int(n) => *n != 0,
            CellValue::Float(f) => *f != 0.0 && !f.is_nan(),
            CellValue::Text(s) => !s.is_empty(),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D>(de: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(de)? {
            Value::Null => CellValue::Text(String::new()),
            Value::Bool(b) => CellValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => CellValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => CellValue::Text(s),
            other => CellValue::Text(other.to_string()),
        })
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(n) => write!(f, "{n}"),
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// One monitoring data point reported by an agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub command_type: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub is_alert: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_name: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connectivity: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_latency: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdev_latency: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jitter: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_bytes: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_packets: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx_bytes: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx_packets: Option<CellValue>,

    // seconds since the epoch, possibly fractional; see `epoch_secs`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<CellValue>,
}

impl Record {
    pub fn command_type(&self) -> &str {
        self.command_type.as_deref().unwrap_or("")
    }

    pub fn agent(&self) -> &str {
        self.agent.as_deref().unwrap_or("")
    }

    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or("")
    }

    /// The timestamp as epoch seconds. Numeric strings are accepted; any
    /// other text (e.g. a formatted date) has no epoch value.
    pub fn epoch_secs(&self) -> Option<f64> {
        match self.timestamp.as_ref()? {
            CellValue::Int(n) => Some(*n as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::Text(s) => s.trim().parse().ok(),
            CellValue::Bool(_) => None,
        }
    }
}

// Identity columns are strings, but a numeric agent id is still shown.
fn text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<CellValue>::deserialize(de)?.map(|v| match v {
        CellValue::Text(s) => s,
        other => other.to_string(),
    }))
}

// Alert flags arrive as booleans from newer servers and as 0/1 from the
// sqlite-backed one; null means "no alert".
fn truthy<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<CellValue>::deserialize(de)?;
    Ok(v.is_some_and(|v| v.is_truthy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default() {
        let r: Record = serde_json::from_str(r#"{"agent":"a1"}"#).unwrap();
        assert_eq!(r.agent(), "a1");
        assert_eq!(r.target(), "");
        assert!(!r.is_alert);
        assert!(r.cpu.is_none());
        assert!(r.timestamp.is_none());
    }

    #[test]
    fn mixed_scalar_columns() {
        let r: Record = serde_json::from_str(
            r#"{"cpu":12.5,"tx_bytes":4096,"connectivity":"up","loss":0,"memory":null}"#,
        )
        .unwrap();
        assert_eq!(r.cpu, Some(CellValue::Float(12.5)));
        assert_eq!(r.tx_bytes, Some(CellValue::Int(4096)));
        assert_eq!(r.connectivity, Some(CellValue::Text("up".into())));
        assert_eq!(r.loss, Some(CellValue::Int(0)));
        assert!(r.memory.is_none());
    }

    #[test]
    fn alert_flag_accepts_ints_and_null() {
        let on: Record = serde_json::from_str(r#"{"is_alert":1}"#).unwrap();
        let off: Record = serde_json::from_str(r#"{"is_alert":0}"#).unwrap();
        let null: Record = serde_json::from_str(r#"{"is_alert":null}"#).unwrap();
        assert!(on.is_alert);
        assert!(!off.is_alert);
        assert!(!null.is_alert);
    }

    #[test]
    fn odd_field_types_do_not_fail_decode() {
        let r: Record = serde_json::from_str(
            r#"{"agent":7,"target":null,"command_type":"ping","cpu":[1,2],"timestamp":"2024-01-01 10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(r.agent(), "7");
        assert_eq!(r.target(), "");
        assert_eq!(r.cpu, Some(CellValue::Text("[1,2]".into())));
        assert_eq!(r.epoch_secs(), None);
    }

    #[test]
    fn numeric_string_timestamp() {
        let r: Record = serde_json::from_str(r#"{"timestamp":" 1000000000.5 "}"#).unwrap();
        assert_eq!(r.epoch_secs(), Some(1_000_000_000.5));
        let r: Record = serde_json::from_str(r#"{"timestamp":1000000000}"#).unwrap();
        assert_eq!(r.epoch_secs(), Some(1_000_000_000.0));
    }

    #[test]
    fn blank_values() {
        assert!(CellValue::Text(String::new()).is_blank());
        assert!(CellValue::Bool(false).is_blank());
        assert!(!CellValue::Int(0).is_blank());
        assert!(!CellValue::Float(0.0).is_blank());
        assert_eq!(CellValue::Float(3.0).to_string(), "3");
    }
}
