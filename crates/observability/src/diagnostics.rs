//! Diagnostic collector for one request cycle.
//!
//! The dispatcher logs why a cycle failed (missing action, rejected nonce,
//! unknown source) into a `DiagnosticLog` owned by that cycle. The collector is
//! passed down explicitly and drained by the output layer when it builds an
//! error payload. Every record is mirrored to `tracing` at `warn` level.

use serde::Serialize;
use serde_json::Value;

/// One logged diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRecord {
    pub message: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticLog {
    records: Vec<DiagnosticRecord>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message with structured details (`Value::Null` for none).
    pub fn log(&mut self, message: impl Into<String>, details: Value) {
        let message = message.into();
        ::tracing::warn!(%message, details = %details, "diagnostic");
        self.records.push(DiagnosticRecord { message, details });
    }

    /// All messages joined with `". "`, or `None` when nothing was logged.
    pub fn all(&self) -> Option<String> {
        if self.records.is_empty() {
            return None;
        }
        Some(
            self.records
                .iter()
                .map(|r| r.message.as_str())
                .collect::<Vec<_>>()
                .join(". "),
        )
    }

    /// Detail records, serialized for the `details` field of error payloads.
    pub fn details(&self) -> Vec<Value> {
        self.records
            .iter()
            .filter_map(|r| serde_json::to_value(r).ok())
            .collect()
    }

    pub fn records(&self) -> &[DiagnosticRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take every record, leaving the log empty.
    pub fn drain(&mut self) -> Vec<DiagnosticRecord> {
        std::mem::take(&mut self.records)
    }
}
