//! HTTP gateway: AJAX request classification, payload normalization,
//! action dispatch and response rendering.

pub mod app;
pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod output;
pub mod payload;
pub mod responders;
pub mod source;

pub use config::GateConfig;
pub use dispatcher::AjaxDispatcher;
pub use output::AjaxReply;
