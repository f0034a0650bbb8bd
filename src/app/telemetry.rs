//! Per-tick telemetry snapshot.
//!
//! Each subsystem writes its state name, error terms and sensor
//! readings into a [`TelemetrySink`].  [`TelemetrySnapshot`] is the
//! fixed-capacity in-memory sink the dashboard adapter reads from;
//! entries past capacity are dropped rather than allocated.

use core::fmt;

use heapless::Vec;
use serde::Serialize;

use super::ports::TelemetrySink;

/// Maximum number of entries in one snapshot.
pub const SNAPSHOT_CAPACITY: usize = 64;

/// Maximum key length, e.g. `"HatchDeploy/targetPosition"`.
pub const KEY_CAPACITY: usize = 40;

type Key = heapless::String<KEY_CAPACITY>;

/// A single telemetry value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    Bool(bool),
    Number(f64),
    Text(&'static str),
}

impl fmt::Display for TelemetryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n:.4}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for TelemetryValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for TelemetryValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&'static str> for TelemetryValue {
    fn from(s: &'static str) -> Self {
        Self::Text(s)
    }
}

/// Anything that publishes a per-tick snapshot.  Publishing must not
/// affect control.
pub trait TelemetrySource {
    fn log(&self, sink: &mut dyn TelemetrySink);
}

#[derive(Debug, Clone, Serialize)]
pub struct TelemetryEntry {
    pub key: Key,
    pub value: TelemetryValue,
}

/// An ordered key/value snapshot.  Writing an existing key overwrites it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TelemetrySnapshot {
    entries: Vec<TelemetryEntry, SNAPSHOT_CAPACITY>,
    #[serde(skip)]
    dropped: usize,
}

impl TelemetrySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<TelemetryValue> {
        self.entries
            .iter()
            .find(|e| e.key.as_str() == key)
            .map(|e| e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries rejected because the snapshot or the key was too large.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TelemetryValue)> {
        self.entries.iter().map(|e| (e.key.as_str(), e.value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.dropped = 0;
    }

    /// Render as a JSON array of `{ "key": ..., "value": ... }` objects.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }
}

impl TelemetrySink for TelemetrySnapshot {
    fn put(&mut self, key: &str, value: TelemetryValue) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key.as_str() == key) {
            entry.value = value;
            return;
        }
        let mut k = Key::new();
        if k.push_str(key).is_err() {
            self.dropped += 1;
            return;
        }
        if self.entries.push(TelemetryEntry { key: k, value }).is_err() {
            self.dropped += 1;
        }
    }
}
