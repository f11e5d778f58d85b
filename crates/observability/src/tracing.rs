//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Subscriber options; `RUST_LOG` always wins over `default_filter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingOptions {
    pub default_filter: String,
    /// JSON lines when true, human-readable text otherwise.
    pub json: bool,
}

impl Default for TracingOptions {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            json: true,
        }
    }
}

impl TracingOptions {
    /// Options for a gateway running in debug mode: verbose, plain text.
    pub fn debug() -> Self {
        Self {
            default_filter: "debug".to_string(),
            json: false,
        }
    }
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(options: &TracingOptions) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    let _ = if options.json {
        builder.json().with_target(false).try_init()
    } else {
        builder.with_target(true).try_init()
    };
}
