//! Tracing setup and per-cycle diagnostics (shared).

/// Initialize process-wide observability.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(options: &TracingOptions) {
    tracing::init(options);
}

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Per-request diagnostic collector surfaced in error payloads.
pub mod diagnostics;

pub use self::diagnostics::{DiagnosticLog, DiagnosticRecord};
pub use self::tracing::TracingOptions;
