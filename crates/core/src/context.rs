//! Per-cycle context handed to responders.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::{ActionName, NonceTier};
use crate::cycle::{AjaxCycle, CompatFlags, ErrorReporting};
use crate::id::SourceId;
use crate::request::RequestParams;

/// A stored entity a request may be bound to via `vcv-source-id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntity {
    pub id: SourceId,
    /// Entity kind, e.g. `page`, `post`, `template`.
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl SourceEntity {
    pub fn new(id: SourceId, kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            title: title.into(),
            meta: Map::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }
}

/// Read-only view of a validated request cycle.
///
/// Built by the dispatcher after nonce validation and source binding; never
/// mutated while responders run.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    cycle: AjaxCycle,
    request: RequestParams,
    action: ActionName,
    principal: Option<String>,
    source: Option<SourceEntity>,
}

impl DispatchContext {
    pub fn new(
        cycle: AjaxCycle,
        request: RequestParams,
        action: ActionName,
        source: Option<SourceEntity>,
    ) -> Self {
        Self {
            cycle,
            request,
            action,
            principal: None,
            source,
        }
    }

    /// Attach the principal the validated nonce was issued to.
    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = Some(principal.into());
        self
    }

    pub fn cycle(&self) -> &AjaxCycle {
        &self.cycle
    }

    /// Native AJAX flags raised for this request.
    pub fn compat(&self) -> CompatFlags {
        self.cycle.compat
    }

    pub fn error_reporting(&self) -> ErrorReporting {
        self.cycle.error_reporting
    }

    pub fn request(&self) -> &RequestParams {
        &self.request
    }

    pub fn action(&self) -> &ActionName {
        &self.action
    }

    pub fn tier(&self) -> NonceTier {
        self.action.tier()
    }

    /// Principal behind the nonce; `None` for actions without a tier.
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// Entity bound through `vcv-source-id`, if any.
    pub fn source(&self) -> Option<&SourceEntity> {
        self.source.as_ref()
    }
}
