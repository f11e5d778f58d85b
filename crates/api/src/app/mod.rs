//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: nonce service, entity store, template library, record bus
//! - `routes/`: HTTP handlers (`ajax.rs` for the gateway, `system.rs` for the rest)

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::GateConfig;
use crate::dispatcher::AjaxDispatcher;
use crate::responders;

pub mod routes;
pub mod services;

pub use services::{RecordBus, Services, build_services, spawn_dispatch_log};

/// Shared per-process state handed to every handler.
#[derive(Debug)]
pub struct AppState {
    pub config: GateConfig,
    pub dispatcher: AjaxDispatcher<RecordBus>,
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: GateConfig) -> Router {
    let services = build_services(&config);
    build_app_with(config, services)
}

/// Build the router over pre-built services (tests seed entities and mint nonces).
pub fn build_app_with(config: GateConfig, services: Services) -> Router {
    let filters = Arc::new(responders::build_filters(
        &config.scope,
        Arc::clone(&services.templates),
    ));
    tracing::info!(
        scope = %config.scope,
        channels = ?filters.patterns(),
        "ajax responders registered"
    );

    let dispatcher = AjaxDispatcher::new(
        config.scope.clone(),
        filters,
        services.nonces.clone(),
        services.entities.clone(),
        Arc::clone(&services.records),
    );
    let state = Arc::new(AppState { config, dispatcher });

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .fallback(routes::system::not_found)
        .layer(ServiceBuilder::new().layer(Extension(state)))
}
