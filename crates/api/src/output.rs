//! Response rendering: exactly one body per request cycle.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value, json};

use ajaxgate_core::ResponderOutcome;
use ajaxgate_observability::DiagnosticLog;

const JSON: &str = "application/json";
const HTML: &str = "text/html; charset=UTF-8";

/// Render a successful outcome: strings verbatim, everything else as JSON.
pub fn render_response(outcome: &ResponderOutcome) -> String {
    match outcome {
        ResponderOutcome::Success(Value::String(text)) => text.clone(),
        other => other.to_json().to_string(),
    }
}

/// The single reply of a request cycle. Consumed when turned into a response.
#[derive(Debug, Clone, PartialEq)]
pub struct AjaxReply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl AjaxReply {
    /// Reply for a dispatched cycle, taking the error path for bad outcomes.
    pub fn from_outcome(outcome: &ResponderOutcome, diagnostics: &DiagnosticLog) -> Self {
        if !outcome.is_bad() {
            let content_type = match outcome {
                ResponderOutcome::Success(Value::String(_)) => HTML,
                _ => JSON,
            };
            return Self {
                status: StatusCode::OK,
                content_type,
                body: render_response(outcome),
            };
        }

        let mut messages = outcome.messages();
        if let Some(logged) = diagnostics.all().filter(|m| !m.is_empty()) {
            messages.push(logged);
        }
        let mut details = outcome.details().to_vec();
        details.extend(diagnostics.details());

        let mut body = Map::new();
        body.insert("status".to_string(), Value::Bool(false));
        body.insert("response".to_string(), outcome.to_json());
        if !messages.is_empty() {
            body.insert("message".to_string(), Value::String(messages.join(". ")));
        }
        if !details.is_empty() {
            body.insert("details".to_string(), Value::Array(details));
        }

        Self::json(StatusCode::OK, Value::Object(body))
    }

    /// Malformed request input (e.g. an undecodable `vcv-zip`).
    pub fn client_error(message: impl Into<String>) -> Self {
        Self::json(
            StatusCode::BAD_REQUEST,
            json!({
                "status": false,
                "response": false,
                "message": message.into(),
            }),
        )
    }

    /// The request is not an AJAX call; nothing here handles it.
    pub fn not_ajax() -> Self {
        Self::json(
            StatusCode::NOT_FOUND,
            json!({
                "error": "not_found",
                "message": "not an ajax request",
            }),
        )
    }

    fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            content_type: JSON,
            body: body.to_string(),
        }
    }
}

impl IntoResponse for AjaxReply {
    fn into_response(self) -> Response {
        (self.status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn body(reply: &AjaxReply) -> Value {
        serde_json::from_str(&reply.body).unwrap()
    }

    #[test]
    fn strings_are_emitted_verbatim() {
        let log = DiagnosticLog::new();
        let reply = AjaxReply::from_outcome(&ResponderOutcome::success("<p>hi</p>"), &log);
        assert_eq!(reply.body, "<p>hi</p>");
        assert_eq!(reply.content_type, HTML);

        let reply = AjaxReply::from_outcome(&ResponderOutcome::default(), &log);
        assert_eq!(reply.body, "");
        assert_eq!(reply.status, StatusCode::OK);
    }

    #[test]
    fn values_are_serialized() {
        let reply = AjaxReply::from_outcome(
            &ResponderOutcome::success(json!({"status": true, "n": 1})),
            &DiagnosticLog::new(),
        );
        assert_eq!(reply.content_type, JSON);
        assert_eq!(body(&reply), json!({"status": true, "n": 1}));
    }

    #[test]
    fn missing_action_shape() {
        let mut log = DiagnosticLog::new();
        log.log("Action doesn`t set #10074", json!({"request": {}}));

        let reply = AjaxReply::from_outcome(&ResponderOutcome::rejected(), &log);
        let body = body(&reply);
        assert_eq!(body["status"], false);
        assert_eq!(body["response"], false);
        assert_eq!(body["message"], "Action doesn`t set #10074");
        assert_eq!(body["details"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn omits_empty_message_and_details() {
        let reply = AjaxReply::from_outcome(&ResponderOutcome::rejected(), &DiagnosticLog::new());
        assert_eq!(body(&reply), json!({"status": false, "response": false}));
    }

    #[test]
    fn combines_outcome_and_logged_messages() {
        let mut log = DiagnosticLog::new();
        log.log("Source not found", Value::Null);
        let outcome = ResponderOutcome::success(json!({"status": false, "message": "remote down"}));

        let body = body(&AjaxReply::from_outcome(&outcome, &log));
        assert_eq!(body["message"], "remote down. Source not found");
        assert_eq!(body["response"]["message"], "remote down");
    }

    #[test]
    fn message_carrying_objects_take_the_error_path() {
        let outcome = ResponderOutcome::success(json!({"body": "Forbidden"}));
        let forbidden = body(&AjaxReply::from_outcome(&outcome, &DiagnosticLog::new()));
        assert_eq!(forbidden["status"], false);
        assert_eq!(forbidden["response"], json!({"body": "Forbidden"}));
        assert_eq!(forbidden["message"], "Forbidden");

        let empty = body(&AjaxReply::from_outcome(
            &ResponderOutcome::success(json!([])),
            &DiagnosticLog::new(),
        ));
        assert_eq!(empty, json!({"status": false, "response": []}));
    }

    #[test]
    fn failure_details_come_first() {
        let mut log = DiagnosticLog::new();
        log.log("later", Value::Null);
        let outcome =
            ResponderOutcome::failure_with("broken", vec![json!({"action": "template/x"})]);

        let body = body(&AjaxReply::from_outcome(&outcome, &log));
        assert_eq!(body["message"], "broken. later");
        assert_eq!(body["details"][0]["action"], "template/x");
        assert_eq!(body["details"][1]["message"], "later");
    }

    proptest! {
        #[test]
        fn error_body_is_always_valid_json(message in ".*", logged in ".*") {
            let mut log = DiagnosticLog::new();
            log.log(logged.clone(), Value::Null);
            let reply =
                AjaxReply::from_outcome(&ResponderOutcome::failure(message.clone()), &log);

            let body = body(&reply);
            prop_assert_eq!(&body["status"], &Value::Bool(false));
            let expected = [message, logged]
                .into_iter()
                .filter(|m| !m.is_empty())
                .collect::<Vec<_>>()
                .join(". ");
            if expected.is_empty() {
                prop_assert!(body.get("message").is_none());
            } else {
                prop_assert_eq!(body["message"].as_str(), Some(expected.as_str()));
            }
        }
    }
}
