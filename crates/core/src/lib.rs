//! `ajaxgate-core` — request and dispatch building blocks.
//!
//! This crate contains **pure** request-cycle primitives (no IO, no HTTP).

pub mod action;
pub mod context;
pub mod cycle;
pub mod error;
pub mod id;
pub mod outcome;
pub mod request;
pub mod value_object;

pub use action::{ActionName, NonceTier};
pub use context::{DispatchContext, SourceEntity};
pub use cycle::{AjaxCycle, CompatFlags, ErrorReporting};
pub use error::{GateError, GateResult};
pub use id::SourceId;
pub use outcome::ResponderOutcome;
pub use request::RequestParams;
pub use value_object::ValueObject;

/// Well-known request field names.
pub mod fields {
    /// Marker field: its presence flags the request as an AJAX call.
    pub const AJAX_MARKER: &str = "vcv-ajax";
    /// Action name selecting the responder channel and nonce tier.
    pub const ACTION: &str = "vcv-action";
    /// Nonce token for protected tiers.
    pub const NONCE: &str = "vcv-nonce";
    /// Optional id of the entity the request targets.
    pub const SOURCE_ID: &str = "vcv-source-id";
    /// Optional base64 + deflate encoded JSON object merged into the request.
    pub const ZIP: &str = "vcv-zip";
}
