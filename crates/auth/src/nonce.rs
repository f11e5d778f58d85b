//! Nonce tokens: issuance and tier-aware verification.
//!
//! A nonce is an HS256-signed token whose claims name the principal, the tier
//! it grants and its validity window. Tiers are exact: an admin-tier nonce
//! does not satisfy a user-tier action and a user-tier nonce never satisfies an
//! admin-tier action.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tracing::debug;

use ajaxgate_core::NonceTier;

use crate::{NonceClaims, PrincipalId, Role, TokenValidationError, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NonceError {
    #[error("nonce missing")]
    Missing,

    #[error("malformed nonce: {0}")]
    Malformed(String),

    #[error(transparent)]
    Validation(#[from] TokenValidationError),

    #[error("nonce issued for tier '{actual}' but '{expected}' is required")]
    TierMismatch {
        expected: NonceTier,
        actual: NonceTier,
    },

    #[error("no nonce is issued for tier 'none'")]
    NoTier,

    #[error("principal lacks the admin role required for admin nonces")]
    NotPermitted,

    #[error("failed to sign nonce: {0}")]
    Signing(String),
}

/// Verifies nonces presented with protected actions.
pub trait NonceVerifier: Send + Sync {
    /// Verify `token` for `tier` at instant `now`.
    fn verify_at(
        &self,
        token: &str,
        tier: NonceTier,
        now: DateTime<Utc>,
    ) -> Result<NonceClaims, NonceError>;

    fn verify(&self, token: &str, tier: NonceTier) -> Result<NonceClaims, NonceError> {
        self.verify_at(token, tier, Utc::now())
    }

    fn verify_user(&self, token: &str) -> Result<NonceClaims, NonceError> {
        self.verify(token, NonceTier::User)
    }

    fn verify_admin(&self, token: &str) -> Result<NonceClaims, NonceError> {
        self.verify(token, NonceTier::Admin)
    }
}

/// Issues nonces to principals (embedded in pages, handed to clients).
pub trait NonceIssuer: Send + Sync {
    fn issue_at(
        &self,
        principal: PrincipalId,
        roles: &[Role],
        tier: NonceTier,
        now: DateTime<Utc>,
    ) -> Result<String, NonceError>;

    fn issue(
        &self,
        principal: PrincipalId,
        roles: &[Role],
        tier: NonceTier,
    ) -> Result<String, NonceError> {
        self.issue_at(principal, roles, tier, Utc::now())
    }
}

/// HS256 nonce service sharing one secret for issuing and verifying.
#[derive(Clone)]
pub struct Hs256NonceService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl core::fmt::Debug for Hs256NonceService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256NonceService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl Hs256NonceService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn validation() -> Validation {
        // The window lives in our own claims; `validate_claims` checks it.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation
    }
}

impl NonceVerifier for Hs256NonceService {
    fn verify_at(
        &self,
        token: &str,
        tier: NonceTier,
        now: DateTime<Utc>,
    ) -> Result<NonceClaims, NonceError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(NonceError::Missing);
        }

        let data = jsonwebtoken::decode::<NonceClaims>(token, &self.decoding, &Self::validation())
            .map_err(|e| NonceError::Malformed(e.to_string()))?;
        let claims = data.claims;

        validate_claims(&claims, now)?;

        if claims.tier != tier {
            debug!(expected = %tier, actual = %claims.tier, "nonce tier mismatch");
            return Err(NonceError::TierMismatch {
                expected: tier,
                actual: claims.tier,
            });
        }

        Ok(claims)
    }
}

impl NonceIssuer for Hs256NonceService {
    fn issue_at(
        &self,
        principal: PrincipalId,
        roles: &[Role],
        tier: NonceTier,
        now: DateTime<Utc>,
    ) -> Result<String, NonceError> {
        match tier {
            NonceTier::None => return Err(NonceError::NoTier),
            NonceTier::Admin if !roles.iter().any(Role::is_admin) => {
                return Err(NonceError::NotPermitted);
            }
            _ => {}
        }

        let claims = NonceClaims {
            sub: principal,
            tier,
            issued_at: now,
            expires_at: now + self.ttl,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| NonceError::Signing(e.to_string()))
    }
}
