use thiserror::Error;

use ajaxgate_core::ResponderOutcome;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error("bundle actions not set")]
    ActionsMissing,

    #[error("invalid bundle payload: {0}")]
    InvalidPayload(String),

    #[error("bundle payload is missing '{0}'")]
    MissingField(&'static str),

    #[error("no download action registered for '{0}'")]
    UnknownAction(String),

    #[error("template library lock poisoned")]
    Poisoned,
}

impl From<HubError> for ResponderOutcome {
    fn from(err: HubError) -> Self {
        ResponderOutcome::failure(err.to_string())
    }
}
