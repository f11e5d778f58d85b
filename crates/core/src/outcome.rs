//! Responder outcome: the value threaded through a responder channel.

use serde_json::{Value, json};

/// Result carried through a responder channel.
///
/// Responders receive the previous outcome and return the next one. The last
/// outcome of the action channel is what the caller gets back.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponderOutcome {
    /// A usable value: strings are emitted verbatim, anything else as JSON.
    Success(Value),
    /// A reported failure with optional structured details.
    Failure {
        message: String,
        details: Vec<Value>,
    },
}

impl Default for ResponderOutcome {
    /// Seed value of the generic scope channel: an empty string.
    fn default() -> Self {
        Self::Success(Value::String(String::new()))
    }
}

impl ResponderOutcome {
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success(value.into())
    }

    /// The "false" result returned when dispatch is refused before any responder runs.
    pub fn rejected() -> Self {
        Self::Success(Value::Bool(false))
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn failure_with(message: impl Into<String>, details: Vec<Value>) -> Self {
        Self::Failure {
            message: message.into(),
            details,
        }
    }

    /// Whether this outcome must be rendered through the error path.
    ///
    /// Bad outcomes: any `Failure`; empty or falsy values (`null`, `false`,
    /// `0`, `[]`, `{}`); objects carrying a `body` or `message` key; objects
    /// whose `status` is `false`. An empty string is a valid (empty) success
    /// body: it is what an action without responders renders.
    pub fn is_bad(&self) -> bool {
        match self {
            Self::Failure { .. } => true,
            Self::Success(Value::Null) | Self::Success(Value::Bool(false)) => true,
            Self::Success(Value::Number(n)) => n.as_f64() == Some(0.0),
            Self::Success(Value::Array(items)) => items.is_empty(),
            Self::Success(Value::Object(map)) => {
                map.is_empty()
                    || map.contains_key("body")
                    || map.contains_key("message")
                    || matches!(map.get("status"), Some(Value::Bool(false)))
            }
            Self::Success(_) => false,
        }
    }

    /// Human-readable messages carried by the outcome.
    ///
    /// For object values this reads `body` then `message`; message arrays are
    /// joined with `". "`.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Failure { message, .. } if !message.is_empty() => vec![message.clone()],
            Self::Failure { .. } => Vec::new(),
            Self::Success(Value::Object(map)) => {
                let mut out = Vec::new();
                if let Some(body) = map.get("body") {
                    out.push(text_of(body));
                }
                match map.get("message") {
                    Some(Value::Array(items)) => out.push(
                        items.iter().map(text_of).collect::<Vec<_>>().join(". "),
                    ),
                    Some(other) => out.push(text_of(other)),
                    None => {}
                }
                out.retain(|m| !m.is_empty());
                out
            }
            Self::Success(_) => Vec::new(),
        }
    }

    /// Details attached to a failure (empty for successes).
    pub fn details(&self) -> &[Value] {
        match self {
            Self::Failure { details, .. } => details,
            Self::Success(_) => &[],
        }
    }

    /// JSON form used as the `response` field of error payloads.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success(value) => value.clone(),
            Self::Failure { message, details } => json!({
                "message": message,
                "details": details,
            }),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure { .. } => None,
        }
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
