//! AJAX action dispatch.
//!
//! ```text
//! request
//!   ↓
//! 1. require `vcv-action`            → "Action doesn`t set #10074"
//!   ↓
//! 2. verify nonce for the action tier → "Nonce not validated #10075"
//!   ↓
//! 3. bind `vcv-source-id` (never gates dispatch, blank ids are ignored)
//!   ↓
//! 4. apply `<scope>` then `<scope>:<action>` (chained)
//!   ↓
//! 5. publish a `DispatchRecord`
//! ```
//!
//! Refusals return the `false` outcome and leave the reason in the cycle's
//! `DiagnosticLog`; the output layer turns both into the error payload.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};
use tracing::{debug, warn};

use ajaxgate_auth::{NonceClaims, NonceError, NonceVerifier};
use ajaxgate_core::{
    ActionName, AjaxCycle, DispatchContext, NonceTier, RequestParams, ResponderOutcome,
    SourceEntity, SourceId, fields,
};
use ajaxgate_events::{DispatchRecord, EventBus, FilterRegistry};
use ajaxgate_observability::DiagnosticLog;

use crate::source::EntityLookup;

pub const MSG_ACTION_NOT_SET: &str = "Action doesn`t set #10074";
pub const MSG_NONCE_NOT_VALIDATED: &str = "Nonce not validated #10075";

/// Responder channels of the gateway.
pub type AjaxFilters = FilterRegistry<ResponderOutcome, DispatchContext>;

pub struct AjaxDispatcher<B> {
    scope: String,
    filters: Arc<AjaxFilters>,
    nonces: Arc<dyn NonceVerifier>,
    entities: Arc<dyn EntityLookup>,
    records: B,
}

impl<B> core::fmt::Debug for AjaxDispatcher<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AjaxDispatcher")
            .field("scope", &self.scope)
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

impl<B> AjaxDispatcher<B>
where
    B: EventBus<DispatchRecord>,
{
    pub fn new(
        scope: impl Into<String>,
        filters: Arc<AjaxFilters>,
        nonces: Arc<dyn NonceVerifier>,
        entities: Arc<dyn EntityLookup>,
        records: B,
    ) -> Self {
        Self {
            scope: scope.into(),
            filters,
            nonces,
            entities,
            records,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Run one request cycle and return its outcome.
    pub fn dispatch(
        &self,
        cycle: AjaxCycle,
        request: &RequestParams,
        diagnostics: &mut DiagnosticLog,
    ) -> ResponderOutcome {
        let (action, outcome) = self.parse_request(cycle, request, diagnostics);

        let record = DispatchRecord::new(action, outcome.is_bad(), Utc::now());
        if let Err(error) = self.records.publish(record) {
            warn!(?error, "failed to publish dispatch record");
        }

        outcome
    }

    fn parse_request(
        &self,
        cycle: AjaxCycle,
        request: &RequestParams,
        diagnostics: &mut DiagnosticLog,
    ) -> (Option<ActionName>, ResponderOutcome) {
        let action = request
            .input_str(fields::ACTION)
            .and_then(|raw| ActionName::parse(&raw).ok());
        let Some(action) = action else {
            diagnostics.log(MSG_ACTION_NOT_SET, json!({ "request": request.snapshot() }));
            return (None, ResponderOutcome::rejected());
        };

        let claims = match self.validate_nonce(&action, request) {
            Ok(claims) => claims,
            Err(error) => {
                diagnostics.log(
                    MSG_NONCE_NOT_VALIDATED,
                    json!({
                        "request": request.snapshot(),
                        "reason": error.to_string(),
                    }),
                );
                return (Some(action), ResponderOutcome::rejected());
            }
        };

        let source = self.set_source(request, diagnostics);
        let mut ctx = DispatchContext::new(cycle, request.clone(), action.clone(), source);
        if let Some(claims) = claims {
            ctx = ctx.with_principal(claims.sub.to_string());
        }
        let outcome = self.get_response(&ctx);
        (Some(action), outcome)
    }

    /// Check the nonce required by the action's tier.
    ///
    /// Returns the nonce claims for protected tiers, `None` when the action
    /// needs no token.
    pub fn validate_nonce(
        &self,
        action: &ActionName,
        request: &RequestParams,
    ) -> Result<Option<NonceClaims>, NonceError> {
        let tier = action.tier();
        if tier == NonceTier::None {
            return Ok(None);
        }

        let token = request.input_str(fields::NONCE).ok_or(NonceError::Missing)?;
        let claims = self.nonces.verify(&token, tier)?;
        debug!(action = %action, tier = %tier, principal = %claims.sub, "nonce validated");
        Ok(Some(claims))
    }

    /// Resolve `vcv-source-id` to a stored entity. Failures are logged only.
    pub fn set_source(
        &self,
        request: &RequestParams,
        diagnostics: &mut DiagnosticLog,
    ) -> Option<SourceEntity> {
        let raw = request.input(fields::SOURCE_ID)?;
        if is_blank(raw) {
            return None;
        }

        let id = match SourceId::from_value(raw) {
            Ok(id) => id,
            Err(error) => {
                diagnostics.log("Invalid source id", json!({ "error": error.to_string() }));
                return None;
            }
        };

        match self.entities.find(id) {
            Ok(Some(entity)) => Some(entity),
            Ok(None) => {
                diagnostics.log("Source not found", json!({ "source_id": id }));
                None
            }
            Err(error) => {
                diagnostics.log("Source lookup failed", json!({ "error": error.to_string() }));
                None
            }
        }
    }

    /// Apply the generic scope channel, then the action channel seeded with its result.
    pub fn get_response(&self, ctx: &DispatchContext) -> ResponderOutcome {
        let generic = self
            .filters
            .apply(&self.scope, ResponderOutcome::default(), ctx);
        let channel = ctx.action().channel(&self.scope);
        debug!(%channel, responders = self.filters.count(&channel), "dispatching action");
        self.filters.apply(&channel, generic, ctx)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ajaxgate_auth::{Hs256NonceService, NonceIssuer, PrincipalId, Role};
    use ajaxgate_core::{CompatFlags, ErrorReporting};
    use ajaxgate_events::{FilterRegistryBuilder, InMemoryEventBus};

    use super::*;
    use crate::source::InMemoryEntityStore;

    type Bus = Arc<InMemoryEventBus<DispatchRecord>>;
    type Builder = FilterRegistryBuilder<ResponderOutcome, DispatchContext>;

    const CYCLE: AjaxCycle = AjaxCycle::new(false);

    struct Fixture {
        dispatcher: AjaxDispatcher<Bus>,
        nonces: Arc<Hs256NonceService>,
        bus: Bus,
        calls: Arc<AtomicUsize>,
    }

    impl Fixture {
        fn run(&self, params: &RequestParams, log: &mut DiagnosticLog) -> ResponderOutcome {
            self.dispatcher.dispatch(CYCLE, params, log)
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn fixture(register: impl FnOnce(Builder) -> Builder) -> Fixture {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let builder = AjaxFilters::builder().register(
            "ajax",
            move |v: ResponderOutcome, _: &DispatchContext| {
                counter.fetch_add(1, Ordering::SeqCst);
                v
            },
        );
        let filters = Arc::new(register(builder).build());

        let nonces = Arc::new(Hs256NonceService::new(b"secret", chrono::Duration::hours(1)));
        let entities = Arc::new(InMemoryEntityStore::new());
        entities
            .insert(SourceEntity::new(SourceId::new(5).unwrap(), "page", "Home"))
            .unwrap();
        let bus: Bus = Arc::new(InMemoryEventBus::new());

        Fixture {
            dispatcher: AjaxDispatcher::new(
                "ajax",
                filters,
                Arc::clone(&nonces) as Arc<dyn NonceVerifier>,
                entities,
                Arc::clone(&bus),
            ),
            nonces,
            bus,
            calls,
        }
    }

    fn user_nonce(f: &Fixture) -> String {
        f.nonces.issue(PrincipalId::new(), &[], NonceTier::User).unwrap()
    }

    fn admin_nonce(f: &Fixture) -> String {
        f.nonces
            .issue(PrincipalId::new(), &[Role::ADMIN], NonceTier::Admin)
            .unwrap()
    }

    fn title_of_source(_: ResponderOutcome, ctx: &DispatchContext) -> ResponderOutcome {
        match ctx.source() {
            Some(entity) => ResponderOutcome::success(entity.title.clone()),
            None => ResponderOutcome::success("none"),
        }
    }

    #[test]
    fn missing_action_runs_no_channel() {
        let f = fixture(|b| b);
        let mut log = DiagnosticLog::new();

        let out = f.run(&RequestParams::from_pairs([("vcv-ajax", "1")]), &mut log);

        assert_eq!(out, ResponderOutcome::rejected());
        assert_eq!(f.calls(), 0);
        assert_eq!(log.all().as_deref(), Some(MSG_ACTION_NOT_SET));
        assert_eq!(log.details()[0]["details"]["request"]["vcv-ajax"], "1");
    }

    #[test]
    fn user_tier_requires_valid_nonce() {
        let f = fixture(|b| b);
        for nonce in [None, Some("garbage".to_string())] {
            let mut params = RequestParams::from_pairs([("vcv-action", "foo:nonce")]);
            if let Some(nonce) = nonce {
                params.insert("vcv-nonce", Value::String(nonce));
            }
            let mut log = DiagnosticLog::new();

            assert_eq!(f.run(&params, &mut log), ResponderOutcome::rejected());
            assert_eq!(log.all().as_deref(), Some(MSG_NONCE_NOT_VALIDATED));
        }
        assert_eq!(f.calls(), 0);
    }

    #[test]
    fn admin_tier_rejects_user_nonce() {
        let f = fixture(|b| b);
        let params = RequestParams::from_pairs([
            ("vcv-action", "hub:download:adminNonce".to_string()),
            ("vcv-nonce", user_nonce(&f)),
        ]);

        let mut log = DiagnosticLog::new();
        assert!(f.run(&params, &mut log).is_bad());
        assert_eq!(f.calls(), 0);

        let params = RequestParams::from_pairs([
            ("vcv-action", "hub:download:adminNonce".to_string()),
            ("vcv-nonce", admin_nonce(&f)),
        ]);
        let mut log = DiagnosticLog::new();
        f.run(&params, &mut log);
        assert_eq!(f.calls(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn unprotected_action_skips_token_check() {
        let f = fixture(|b| {
            b.register("ajax:ping", |_: ResponderOutcome, _: &DispatchContext| {
                ResponderOutcome::success("pong")
            })
        });
        let mut log = DiagnosticLog::new();
        let out = f.run(&RequestParams::from_pairs([("vcv-action", "ping")]), &mut log);
        assert_eq!(out, ResponderOutcome::success("pong"));
    }

    #[test]
    fn unregistered_action_yields_generic_result() {
        let f = fixture(|b| b);
        let params = RequestParams::from_pairs([
            ("vcv-action", "foo:nonce".to_string()),
            ("vcv-nonce", user_nonce(&f)),
        ]);
        let mut log = DiagnosticLog::new();
        assert_eq!(f.run(&params, &mut log), ResponderOutcome::default());
        assert_eq!(f.calls(), 1);
    }

    #[test]
    fn action_channel_is_seeded_with_generic_result() {
        let f = fixture(|b| {
            b.register("ajax", |_: ResponderOutcome, _: &DispatchContext| {
                ResponderOutcome::success("generic")
            })
            .register("ajax:echo", |v: ResponderOutcome, _: &DispatchContext| {
                let seen = v.as_value().cloned().unwrap_or(Value::Null);
                ResponderOutcome::success(json!({ "seen": seen }))
            })
        });
        let mut log = DiagnosticLog::new();
        let out = f.run(&RequestParams::from_pairs([("vcv-action", "echo")]), &mut log);
        assert_eq!(out, ResponderOutcome::success(json!({ "seen": "generic" })));
    }

    #[test]
    fn responders_observe_cycle_flags_and_principal() {
        let f = fixture(|b| {
            b.register("ajax:mode:nonce", |_: ResponderOutcome, ctx: &DispatchContext| {
                ResponderOutcome::success(json!({
                    "ajax_request_call": ctx.compat().ajax_request_call,
                    "doing_ajax": ctx.compat().doing_ajax,
                    "verbose": ctx.error_reporting() == ErrorReporting::Verbose,
                    "principal": ctx.principal(),
                }))
            })
        });
        let principal = PrincipalId::new();
        let nonce = f.nonces.issue(principal, &[], NonceTier::User).unwrap();
        let params = RequestParams::from_pairs([
            ("vcv-action", "mode:nonce".to_string()),
            ("vcv-nonce", nonce),
        ]);

        let mut log = DiagnosticLog::new();
        let out = f.dispatcher.dispatch(AjaxCycle::new(true), &params, &mut log);
        let value = out.as_value().unwrap();
        assert_eq!(value["ajax_request_call"], true);
        assert_eq!(value["doing_ajax"], true);
        assert_eq!(value["verbose"], true);
        assert_eq!(value["principal"], principal.to_string());

        let out = f.run(&params, &mut log);
        assert_eq!(out.as_value().unwrap()["verbose"], false);
        assert_eq!(CYCLE.compat, CompatFlags::NATIVE);
    }

    #[test]
    fn binds_source_entity_without_gating() {
        let f = fixture(|b| b.register("ajax:title", title_of_source));

        let mut log = DiagnosticLog::new();
        let params = RequestParams::from_pairs([("vcv-action", "title"), ("vcv-source-id", "5")]);
        assert_eq!(f.run(&params, &mut log), ResponderOutcome::success("Home"));

        let mut log = DiagnosticLog::new();
        let params = RequestParams::from_pairs([("vcv-action", "title"), ("vcv-source-id", "99")]);
        assert_eq!(f.run(&params, &mut log), ResponderOutcome::success("none"));
        assert_eq!(log.all().as_deref(), Some("Source not found"));
    }

    #[test]
    fn blank_source_id_is_ignored_silently() {
        let f = fixture(|b| b.register("ajax:title", title_of_source));

        for blank in ["", "  "] {
            let mut log = DiagnosticLog::new();
            let params =
                RequestParams::from_pairs([("vcv-action", "title"), ("vcv-source-id", blank)]);
            assert_eq!(f.run(&params, &mut log), ResponderOutcome::success("none"));
            assert!(log.is_empty());
        }

        let mut log = DiagnosticLog::new();
        let params = RequestParams::from_pairs([("vcv-action", "title"), ("vcv-source-id", "abc")]);
        f.run(&params, &mut log);
        assert_eq!(log.all().as_deref(), Some("Invalid source id"));
    }

    #[test]
    fn publishes_one_record_per_cycle() {
        let f = fixture(|b| b);
        let sub = f.bus.subscribe();
        let mut log = DiagnosticLog::new();

        f.run(&RequestParams::new(), &mut log);
        f.run(&RequestParams::from_pairs([("vcv-action", "ping")]), &mut log);

        let records = sub.drain();
        assert_eq!(records.len(), 2);
        assert!(records[0].bad && records[0].action.is_none());
        assert_eq!(records[1].action.as_ref().map(ActionName::as_str), Some("ping"));
        assert!(!records[1].bad);
    }
}
