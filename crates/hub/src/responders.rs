//! AJAX responders exposing the hub to the gateway.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::warn;

use ajaxgate_core::{DispatchContext, ResponderOutcome};
use ajaxgate_events::{Filter, FilterRegistryBuilder};

use crate::actions::{BundleAction, DownloadAction, HubActionRegistry, hub_action_registry};
use crate::error::HubError;
use crate::templates::{HubTemplatesDownloadAction, TemplateLibrary};

/// Request field carrying the bundle action list (JSON array or JSON text).
pub const BUNDLE_ACTIONS_FIELD: &str = "vcv-bundle-actions";

/// Register the hub responders on the gateway channels of `scope`.
pub fn register(
    builder: FilterRegistryBuilder<ResponderOutcome, DispatchContext>,
    scope: &str,
    library: Arc<TemplateLibrary>,
) -> FilterRegistryBuilder<ResponderOutcome, DispatchContext> {
    let actions: Vec<Arc<dyn DownloadAction>> =
        vec![Arc::new(HubTemplatesDownloadAction::new(Arc::clone(&library)))];

    builder
        .register(
            &format!("{scope}:hub:download:adminNonce"),
            HubActionsResponder::new(hub_action_registry(actions)),
        )
        .register(
            &format!("{scope}:hub:templates:nonce"),
            HubTemplatesListResponder::new(library),
        )
}

/// Runs every bundle action of a download request through the hub registry.
#[derive(Debug)]
pub struct HubActionsResponder {
    actions: HubActionRegistry,
}

impl HubActionsResponder {
    pub fn new(actions: HubActionRegistry) -> Self {
        Self { actions }
    }

    fn bundle_actions(ctx: &DispatchContext) -> Result<Vec<BundleAction>, HubError> {
        let raw = ctx
            .request()
            .input(BUNDLE_ACTIONS_FIELD)
            .ok_or(HubError::ActionsMissing)?;

        // Form bodies carry the list as JSON text.
        let value = match raw {
            Value::String(text) => serde_json::from_str(text)
                .map_err(|e| HubError::InvalidPayload(e.to_string()))?,
            other => other.clone(),
        };

        serde_json::from_value(value).map_err(|e| HubError::InvalidPayload(e.to_string()))
    }

    fn run_one(&self, action: &BundleAction) -> ResponderOutcome {
        if !self.actions.has_filters(&action.action) {
            return HubError::UnknownAction(action.action.clone()).into();
        }
        self.actions
            .apply(&action.action, ResponderOutcome::default(), action)
    }
}

impl Filter<ResponderOutcome, DispatchContext> for HubActionsResponder {
    fn apply(&self, value: ResponderOutcome, ctx: &DispatchContext) -> ResponderOutcome {
        if value.is_bad() {
            return value;
        }

        let actions = match Self::bundle_actions(ctx) {
            Ok(actions) => actions,
            Err(err) => {
                warn!(error = %err, "hub download rejected");
                return err.into();
            }
        };

        let mut results = Vec::with_capacity(actions.len());
        for action in &actions {
            let outcome = self.run_one(action);
            if outcome.is_bad() {
                return outcome;
            }
            results.push(json!({
                "action": action.action,
                "response": outcome.to_json(),
            }));
        }

        ResponderOutcome::success(json!({
            "status": true,
            "actions": results,
        }))
    }
}

/// Lists downloaded templates.
#[derive(Debug)]
pub struct HubTemplatesListResponder {
    library: Arc<TemplateLibrary>,
}

impl HubTemplatesListResponder {
    pub fn new(library: Arc<TemplateLibrary>) -> Self {
        Self { library }
    }
}

impl Filter<ResponderOutcome, DispatchContext> for HubTemplatesListResponder {
    fn apply(&self, value: ResponderOutcome, _ctx: &DispatchContext) -> ResponderOutcome {
        if value.is_bad() {
            return value;
        }
        match self.library.list() {
            Ok(templates) => ResponderOutcome::success(json!({
                "status": true,
                "templates": templates,
            })),
            Err(err) => err.into(),
        }
    }
}
