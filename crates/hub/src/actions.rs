//! Download action contract and the hub-level channel registry.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use ajaxgate_core::ResponderOutcome;
use ajaxgate_events::{Filter, FilterRegistry};

/// One bundle action of a hub download request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BundleAction {
    /// Full action name, e.g. `template/landing-page`.
    pub action: String,
    #[serde(default)]
    pub data: Value,
}

impl BundleAction {
    /// The part after the bundle kind (`landing-page` for `template/landing-page`).
    pub fn tag(&self) -> &str {
        self.action
            .split_once('/')
            .map(|(_, tag)| tag)
            .unwrap_or(self.action.as_str())
    }
}

/// A download action handles every bundle action matching its pattern.
pub trait DownloadAction: Send + Sync {
    /// Registration pattern, e.g. `template/*`.
    fn action_name(&self) -> &str;

    /// Name of the bundle helper doing the work (for logs and diagnostics).
    fn helper_name(&self) -> &str;

    fn run(&self, action: &BundleAction) -> ResponderOutcome;
}

pub type HubActionRegistry = FilterRegistry<ResponderOutcome, BundleAction>;

/// Channel adapter: runs the action unless an earlier filter already failed.
struct DownloadActionFilter(Arc<dyn DownloadAction>);

impl Filter<ResponderOutcome, BundleAction> for DownloadActionFilter {
    fn apply(&self, value: ResponderOutcome, action: &BundleAction) -> ResponderOutcome {
        if value.is_bad() {
            return value;
        }
        debug!(
            action = %action.action,
            helper = self.0.helper_name(),
            "running download action"
        );
        self.0.run(action)
    }
}

/// Build the hub registry from download actions, keyed by their patterns.
pub fn hub_action_registry(actions: Vec<Arc<dyn DownloadAction>>) -> HubActionRegistry {
    actions
        .into_iter()
        .fold(FilterRegistry::builder(), |builder, action| {
            let pattern = action.action_name().to_string();
            builder.register(&pattern, DownloadActionFilter(action))
        })
        .build()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Echo;

    impl DownloadAction for Echo {
        fn action_name(&self) -> &str {
            "element/*"
        }

        fn helper_name(&self) -> &str {
            "Echo"
        }

        fn run(&self, action: &BundleAction) -> ResponderOutcome {
            ResponderOutcome::success(json!({"tag": action.tag()}))
        }
    }

    #[test]
    fn tag_strips_bundle_kind() {
        let action = BundleAction {
            action: "template/landing".to_string(),
            data: Value::Null,
        };
        assert_eq!(action.tag(), "landing");
    }

    #[test]
    fn registry_routes_by_wildcard() {
        let registry = hub_action_registry(vec![Arc::new(Echo)]);
        let action = BundleAction {
            action: "element/button".to_string(),
            data: Value::Null,
        };
        let out = registry.apply(&action.action, ResponderOutcome::default(), &action);
        assert_eq!(out, ResponderOutcome::success(json!({"tag": "button"})));
        assert!(!registry.has_filters("template/x"));
    }

    #[test]
    fn failed_seed_is_passed_through() {
        let registry = hub_action_registry(vec![Arc::new(Echo)]);
        let action = BundleAction {
            action: "element/button".to_string(),
            data: Value::Null,
        };
        let seed = ResponderOutcome::failure("earlier");
        assert_eq!(registry.apply(&action.action, seed.clone(), &action), seed);
    }
}
