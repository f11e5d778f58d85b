//! Built-in responders wired at startup.

use std::sync::Arc;

use serde_json::json;

use ajaxgate_core::{DispatchContext, ResponderOutcome};
use ajaxgate_events::FilterRegistryBuilder;
use ajaxgate_hub::TemplateLibrary;

use crate::dispatcher::AjaxFilters;

/// Liveness check through the full dispatch path (no token).
fn ping(_value: ResponderOutcome, _ctx: &DispatchContext) -> ResponderOutcome {
    ResponderOutcome::success("pong")
}

/// Echo the entity bound through `vcv-source-id`.
fn source_info(value: ResponderOutcome, ctx: &DispatchContext) -> ResponderOutcome {
    if value.is_bad() {
        return value;
    }
    match ctx.source() {
        Some(entity) => ResponderOutcome::success(json!({
            "status": true,
            "source": entity,
        })),
        None => ResponderOutcome::failure("No source entity bound"),
    }
}

/// Every responder the gateway ships with, registered on `scope`.
pub fn build_filters(scope: &str, templates: Arc<TemplateLibrary>) -> AjaxFilters {
    let builder: FilterRegistryBuilder<ResponderOutcome, DispatchContext> =
        FilterRegistryBuilder::new()
            .register(&format!("{scope}:ping"), ping)
            .register(&format!("{scope}:source:info:nonce"), source_info);

    ajaxgate_hub::register(builder, scope, templates).build()
}
