//! Telemetry values and label maps

use core::fmt;
use heapless::{String, Vec};

/// Longest text value kept
pub const TEXT_LEN: usize = 32;

/// Entries per section
pub const MAX_ENTRIES: usize = 16;

/// One telemetry value
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String<TEXT_LEN>),
}

impl TelemetryValue {
    /// Text value, truncated to [`TEXT_LEN`] bytes on a char boundary
    pub fn text(s: &str) -> Self {
        let mut text = String::new();
        for c in s.chars() {
            if text.push(c).is_err() {
                break;
            }
        }
        TelemetryValue::Text(text)
    }

    /// Text value built from format arguments, truncated like [`Self::text`]
    pub fn formatted(args: fmt::Arguments<'_>) -> Self {
        let mut text = Truncating(String::new());
        let _ = fmt::write(&mut text, args);
        TelemetryValue::Text(text.0)
    }
}

struct Truncating(String<TEXT_LEN>);

impl fmt::Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

impl fmt::Display for TelemetryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryValue::Bool(v) => write!(f, "{}", v),
            TelemetryValue::Int(v) => write!(f, "{}", v),
            TelemetryValue::Float(v) => write!(f, "{}", v),
            TelemetryValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for TelemetryValue {
    fn from(v: bool) -> Self {
        TelemetryValue::Bool(v)
    }
}

impl From<i32> for TelemetryValue {
    fn from(v: i32) -> Self {
        TelemetryValue::Int(v as i64)
    }
}

impl From<i64> for TelemetryValue {
    fn from(v: i64) -> Self {
        TelemetryValue::Int(v)
    }
}

impl From<usize> for TelemetryValue {
    fn from(v: usize) -> Self {
        TelemetryValue::Int(v as i64)
    }
}

impl From<f32> for TelemetryValue {
    fn from(v: f32) -> Self {
        TelemetryValue::Float(v as f64)
    }
}

impl From<f64> for TelemetryValue {
    fn from(v: f64) -> Self {
        TelemetryValue::Float(v)
    }
}

impl From<&str> for TelemetryValue {
    fn from(v: &str) -> Self {
        TelemetryValue::text(v)
    }
}

/// Ordered label -> value map for one section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryMap {
    entries: Vec<(&'static str, TelemetryValue), MAX_ENTRIES>,
}

impl TelemetryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `label`, replacing an existing entry in place
    ///
    /// Returns `false` if the map is full and the entry was dropped.
    pub fn put(&mut self, label: &'static str, value: impl Into<TelemetryValue>) -> bool {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(l, _)| *l == label) {
            entry.1 = value;
            return true;
        }
        self.entries.push((label, value)).is_ok()
    }

    pub fn get(&self, label: &str) -> Option<&TelemetryValue> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &TelemetryValue)> {
        self.entries.iter().map(|(l, v)| (*l, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
