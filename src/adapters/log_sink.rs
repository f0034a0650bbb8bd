//! Log-based telemetry sink adapter.
//!
//! Implements [`TelemetrySink`] by writing one `key = value` line per
//! entry at debug level.  Useful on a bench with no dashboard attached;
//! a network adapter would implement the same trait.

use log::debug;

use crate::app::ports::TelemetrySink;
use crate::app::telemetry::TelemetryValue;

#[derive(Debug, Default)]
pub struct LogTelemetrySink {
    written: u64,
}

impl LogTelemetrySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries written since construction.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl TelemetrySink for LogTelemetrySink {
    fn put(&mut self, key: &str, value: TelemetryValue) {
        debug!("TELEM | {key} = {value}");
        self.written += 1;
    }
}
