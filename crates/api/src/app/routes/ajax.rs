use std::sync::Arc;

use axum::extract::{Extension, Form, Query};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tracing::{Instrument, info_span, warn};

use ajaxgate_core::RequestParams;
use ajaxgate_observability::DiagnosticLog;

use crate::app::AppState;
use crate::classifier::classify;
use crate::output::AjaxReply;
use crate::payload;

/// One AJAX request cycle: classify, normalize, dispatch, render.
pub async fn handle(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<Vec<(String, String)>>,
    form: Option<Form<Vec<(String, String)>>>,
) -> Response {
    // Body fields win over query fields of the same name.
    let mut params = RequestParams::from_pairs(query);
    if let Some(Form(body)) = form {
        for (key, value) in body {
            params.insert(key, Value::String(value));
        }
    }

    let Some(cycle) = classify(&params, state.config.debug) else {
        return AjaxReply::not_ajax().into_response();
    };

    let span = info_span!(
        "ajax",
        ajax_request_call = cycle.compat.ajax_request_call,
        doing_ajax = cycle.compat.doing_ajax,
    );

    async move {
        if let Err(err) = payload::normalize(&mut params, state.config.max_payload_bytes) {
            warn!(error = %err, "rejected compressed payload");
            let message = cycle
                .error_reporting
                .client_message("Malformed request payload", &err);
            return AjaxReply::client_error(message).into_response();
        }

        let mut diagnostics = DiagnosticLog::new();
        let outcome = state.dispatcher.dispatch(cycle, &params, &mut diagnostics);
        AjaxReply::from_outcome(&outcome, &diagnostics).into_response()
    }
    .instrument(span)
    .await
}
