//! Template bundles: the `template/*` download action and its storage.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use ajaxgate_core::ResponderOutcome;

use crate::actions::{BundleAction, DownloadAction};
use crate::error::HubError;

/// A downloaded template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    /// Bundle tag it was downloaded under (`landing` for `template/landing`).
    pub bundle: String,
    #[serde(default)]
    pub version: Option<String>,
    pub content: Value,
    pub downloaded_at: DateTime<Utc>,
}

/// In-memory template storage shared across requests.
#[derive(Debug, Default)]
pub struct TemplateLibrary {
    templates: RwLock<BTreeMap<String, Template>>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a template by id. Returns the replaced one, if any.
    pub fn upsert(&self, template: Template) -> Result<Option<Template>, HubError> {
        let mut templates = self.templates.write().map_err(|_| HubError::Poisoned)?;
        Ok(templates.insert(template.id.clone(), template))
    }

    pub fn get(&self, id: &str) -> Result<Option<Template>, HubError> {
        let templates = self.templates.read().map_err(|_| HubError::Poisoned)?;
        Ok(templates.get(id).cloned())
    }

    /// All templates ordered by id.
    pub fn list(&self) -> Result<Vec<Template>, HubError> {
        let templates = self.templates.read().map_err(|_| HubError::Poisoned)?;
        Ok(templates.values().cloned().collect())
    }
}

#[derive(Debug, Deserialize)]
struct TemplatePayload {
    id: Option<String>,
    name: Option<String>,
    version: Option<String>,
    content: Option<Value>,
}

/// Bundle helper storing downloaded templates.
#[derive(Debug, Clone)]
pub struct HubTemplatesBundle {
    library: Arc<TemplateLibrary>,
}

impl HubTemplatesBundle {
    pub const NAME: &'static str = "HubActionsHubTemplatesBundle";

    pub fn new(library: Arc<TemplateLibrary>) -> Self {
        Self { library }
    }

    /// Validate the payload of one `template/<tag>` action and store it.
    pub fn process(&self, action: &BundleAction) -> Result<Template, HubError> {
        let payload: TemplatePayload = serde_json::from_value(action.data.clone())
            .map_err(|e| HubError::InvalidPayload(e.to_string()))?;

        let id = non_empty(payload.id).ok_or(HubError::MissingField("id"))?;
        let name = non_empty(payload.name).ok_or(HubError::MissingField("name"))?;
        let content = payload
            .content
            .filter(|c| !c.is_null())
            .ok_or(HubError::MissingField("content"))?;

        let template = Template {
            id,
            name,
            bundle: action.tag().to_string(),
            version: payload.version,
            content,
            downloaded_at: Utc::now(),
        };

        let replaced = self.library.upsert(template.clone())?;
        info!(
            template = %template.id,
            bundle = %template.bundle,
            replaced = replaced.is_some(),
            "template downloaded"
        );
        Ok(template)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Download action for every `template/*` bundle action.
#[derive(Debug, Clone)]
pub struct HubTemplatesDownloadAction {
    helper: HubTemplatesBundle,
}

impl HubTemplatesDownloadAction {
    pub const ACTION_NAME: &'static str = "template/*";

    pub fn new(library: Arc<TemplateLibrary>) -> Self {
        Self {
            helper: HubTemplatesBundle::new(library),
        }
    }
}

impl DownloadAction for HubTemplatesDownloadAction {
    fn action_name(&self) -> &str {
        Self::ACTION_NAME
    }

    fn helper_name(&self) -> &str {
        HubTemplatesBundle::NAME
    }

    fn run(&self, action: &BundleAction) -> ResponderOutcome {
        match self.helper.process(action) {
            Ok(template) => ResponderOutcome::success(json!({
                "status": true,
                "templates": [template],
            })),
            Err(err) => ResponderOutcome::failure_with(
                err.to_string(),
                vec![json!({"action": action.action, "helper": self.helper_name()})],
            ),
        }
    }
}
