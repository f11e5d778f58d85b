//! Per-cycle mode of an accepted AJAX request.

use std::fmt::Display;

/// Flags downstream code reads to behave as on a native AJAX request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CompatFlags {
    pub ajax_request_call: bool,
    pub doing_ajax: bool,
}

impl CompatFlags {
    /// Both flags raised: the request came through the AJAX gateway.
    pub const NATIVE: Self = Self {
        ajax_request_call: true,
        doing_ajax: true,
    };
}

/// How much of an internal error may reach the client.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorReporting {
    /// Generic messages only (non-debug mode).
    Suppressed,
    /// Include the underlying error text.
    Verbose,
}

impl ErrorReporting {
    pub fn client_message(&self, summary: &str, error: &dyn Display) -> String {
        match self {
            Self::Suppressed => summary.to_string(),
            Self::Verbose => format!("{summary}: {error}"),
        }
    }
}

/// An accepted AJAX request cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AjaxCycle {
    pub compat: CompatFlags,
    pub error_reporting: ErrorReporting,
}

impl AjaxCycle {
    pub const fn new(debug: bool) -> Self {
        Self {
            compat: CompatFlags::NATIVE,
            error_reporting: if debug {
                ErrorReporting::Verbose
            } else {
                ErrorReporting::Suppressed
            },
        }
    }

    /// Verbose error text is allowed only in debug mode.
    pub fn is_debug(&self) -> bool {
        self.error_reporting == ErrorReporting::Verbose
    }
}
