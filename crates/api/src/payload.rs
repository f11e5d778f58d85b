//! Compressed request payloads (`vcv-zip`).
//!
//! Clients may pack a large parameter set into one field: JSON object →
//! deflate (zlib, gzip or raw) → base64. The decoded keys are merged into the
//! request and override same-named fields.

use std::io::Read;

use base64::prelude::*;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use ajaxgate_core::{RequestParams, fields};

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload field must be a string")]
    NotText,

    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("inflate failed: {0}")]
    Inflate(#[source] std::io::Error),

    #[error("inflated payload exceeds {max} bytes")]
    TooLarge { max: usize },

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("payload must decode to a JSON object")]
    NotAnObject,
}

/// Decode `vcv-zip` (if present) and merge it into `params`.
///
/// Returns the number of merged keys (0 when the field is absent).
pub fn normalize(params: &mut RequestParams, max_bytes: usize) -> Result<usize, PayloadError> {
    let Some(raw) = params.input(fields::ZIP) else {
        return Ok(0);
    };
    let Value::String(encoded) = raw else {
        return Err(PayloadError::NotText);
    };

    let decoded = decode(encoded, max_bytes)?;
    let merged = decoded.len();
    params.merge(decoded);
    debug!(keys = merged, "merged compressed payload");
    Ok(merged)
}

/// base64 → inflate → JSON object.
pub fn decode(encoded: &str, max_bytes: usize) -> Result<Map<String, Value>, PayloadError> {
    // Form decoding turns an unescaped '+' into a space.
    let cleaned: String = encoded
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .map(|c| if c == ' ' { '+' } else { c })
        .collect();

    let compressed = BASE64_STANDARD
        .decode(cleaned.as_bytes())
        .or_else(|_| BASE64_STANDARD_NO_PAD.decode(cleaned.as_bytes()))?;
    let inflated = inflate(&compressed, max_bytes)?;

    match serde_json::from_slice::<Value>(&inflated)? {
        Value::Object(map) => Ok(map),
        _ => Err(PayloadError::NotAnObject),
    }
}

/// Inflate zlib, gzip or raw deflate data, detected from the header.
pub fn inflate(data: &[u8], max_bytes: usize) -> Result<Vec<u8>, PayloadError> {
    let reader: Box<dyn Read + '_> = if is_gzip(data) {
        Box::new(GzDecoder::new(data))
    } else if is_zlib(data) {
        Box::new(ZlibDecoder::new(data))
    } else {
        Box::new(DeflateDecoder::new(data))
    };

    let mut out = Vec::new();
    reader
        .take(max_bytes as u64 + 1)
        .read_to_end(&mut out)
        .map_err(PayloadError::Inflate)?;

    if out.len() > max_bytes {
        return Err(PayloadError::TooLarge { max: max_bytes });
    }
    Ok(out)
}

#[inline]
fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

#[inline]
fn is_zlib(data: &[u8]) -> bool {
    data.len() >= 2
        && data[0] & 0x0f == 8
        && (u16::from(data[0]) << 8 | u16::from(data[1])) % 31 == 0
}
