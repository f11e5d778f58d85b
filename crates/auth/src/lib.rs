//! `ajaxgate-auth` — nonce issuance and verification.
//!
//! This crate is intentionally decoupled from HTTP: callers pass the raw token
//! and the tier an action requires.

pub mod claims;
pub mod nonce;
pub mod principal;
pub mod roles;

pub use claims::{NonceClaims, TokenValidationError, validate_claims};
pub use nonce::{Hs256NonceService, NonceError, NonceIssuer, NonceVerifier};
pub use principal::PrincipalId;
pub use roles::Role;
