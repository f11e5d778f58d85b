//! Strongly-typed identifiers used across the request layer.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GateError, GateResult};

/// Identifier of a stored entity a request can be bound to (`vcv-source-id`).
///
/// Always positive: `0` is the "no entity" sentinel of the wire format and is
/// rejected at parse time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(u64);

impl SourceId {
    pub fn new(raw: u64) -> GateResult<Self> {
        if raw == 0 {
            return Err(GateError::invalid_id("SourceId: must be positive"));
        }
        Ok(Self(raw))
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Parse a request value: either a JSON number or a numeric string.
    pub fn from_value(value: &Value) -> GateResult<Self> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| GateError::invalid_id(format!("SourceId: {n}")))
                .and_then(Self::new),
            Value::String(s) => s.parse(),
            other => Err(GateError::invalid_id(format!("SourceId: {other}"))),
        }
    }
}

impl core::fmt::Display for SourceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<SourceId> for u64 {
    fn from(value: SourceId) -> Self {
        value.0
    }
}

impl FromStr for SourceId {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<u64>()
            .map_err(|e| GateError::invalid_id(format!("SourceId: {e}")))?;
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_numeric_strings_and_numbers() {
        assert_eq!(SourceId::from_value(&json!("42")).unwrap().get(), 42);
        assert_eq!(SourceId::from_value(&json!(" 7 ")).unwrap().get(), 7);
        assert_eq!(SourceId::from_value(&json!(9)).unwrap().get(), 9);
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(SourceId::from_value(&json!("0")).is_err());
        assert!(SourceId::from_value(&json!(0)).is_err());
        assert!(SourceId::from_value(&json!("abc")).is_err());
        assert!(SourceId::from_value(&json!(-3)).is_err());
        assert!(SourceId::from_value(&json!(null)).is_err());
    }
}
