//! Action names and the nonce tier they imply.

use serde::{Deserialize, Serialize};

use crate::error::{GateError, GateResult};
use crate::value_object::ValueObject;

/// Marker substring requiring a user-level nonce.
pub const USER_NONCE_MARKER: &str = ":nonce";
/// Marker substring requiring an admin-level nonce.
pub const ADMIN_NONCE_MARKER: &str = ":adminNonce";

/// Sensitivity tier of an action, derived from its name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonceTier {
    /// No token required.
    None,
    /// A valid user-level token is required.
    User,
    /// A valid admin-level token is required.
    Admin,
}

impl NonceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    pub fn requires_token(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl core::fmt::Display for NonceTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a requested action (`vcv-action`), e.g. `hub:download:adminNonce`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionName(String);

impl ValueObject for ActionName {}

impl ActionName {
    /// Build an action name; surrounding whitespace is dropped, empty names are rejected.
    pub fn parse(raw: &str) -> GateResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GateError::missing(crate::fields::ACTION));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Token tier required by this action.
    ///
    /// `:nonce` is checked before `:adminNonce`; a name carrying both markers
    /// is treated as user tier.
    pub fn tier(&self) -> NonceTier {
        if self.0.contains(USER_NONCE_MARKER) {
            NonceTier::User
        } else if self.0.contains(ADMIN_NONCE_MARKER) {
            NonceTier::Admin
        } else {
            NonceTier::None
        }
    }

    /// Channel name for this action within `scope` (`<scope>:<action>`).
    pub fn channel(&self, scope: &str) -> String {
        format!("{scope}:{}", self.0)
    }
}

impl core::fmt::Display for ActionName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_tiers_from_markers() {
        assert_eq!(ActionName::parse("foo:nonce").unwrap().tier(), NonceTier::User);
        assert_eq!(
            ActionName::parse("hub:download:adminNonce").unwrap().tier(),
            NonceTier::Admin
        );
        assert_eq!(ActionName::parse("ping").unwrap().tier(), NonceTier::None);
    }

    #[test]
    fn marker_match_is_case_sensitive() {
        assert_eq!(ActionName::parse("foo:Nonce").unwrap().tier(), NonceTier::None);
        assert_eq!(ActionName::parse("foo:adminnonce").unwrap().tier(), NonceTier::None);
    }

    #[test]
    fn rejects_blank_names() {
        assert_eq!(
            ActionName::parse("   "),
            Err(GateError::MissingParameter("vcv-action".to_string()))
        );
    }

    #[test]
    fn channel_is_scoped() {
        let action = ActionName::parse(" settings:save:nonce ").unwrap();
        assert_eq!(action.channel("ajax"), "ajax:settings:save:nonce");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: names without either marker never require a token.
            #[test]
            fn unmarked_names_need_no_token(name in "[a-z][a-z0-9/_-]{0,30}") {
                let action = ActionName::parse(&name).unwrap();
                prop_assert_eq!(action.tier(), NonceTier::None);
            }

            /// Property: appending `:adminNonce` always yields the admin tier.
            #[test]
            fn admin_suffix_yields_admin(name in "[a-z][a-z0-9/_-]{0,30}") {
                let action = ActionName::parse(&format!("{name}{ADMIN_NONCE_MARKER}")).unwrap();
                prop_assert_eq!(action.tier(), NonceTier::Admin);
            }

            /// Property: appending `:nonce` always yields the user tier.
            #[test]
            fn user_suffix_yields_user(name in "[a-z][a-z0-9/_-]{0,30}") {
                let action = ActionName::parse(&format!("{name}{USER_NONCE_MARKER}")).unwrap();
                prop_assert_eq!(action.tier(), NonceTier::User);
            }
        }
    }
}
