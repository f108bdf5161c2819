//! Canonical credential-id codec.
//!
//! Storage form is standard GUID text. On the wire a credential id is either
//! the GUID's raw 16-byte layout, or an opaque payload stored with a fixed
//! `b64.` prefix for ids that are not GUID-shaped.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use uuid::Uuid;

const B64_PREFIX: &str = "b64.";

/// Decode a stored credential id into its raw wire bytes.
///
/// Returns `None` on any decode failure; callers treat that as "no match",
/// never as an error to propagate.
pub fn parse_credential_id(encoded: &str) -> Option<Vec<u8>> {
    if let Some(payload) = encoded.strip_prefix(B64_PREFIX) {
        return URL_SAFE_NO_PAD.decode(payload).ok();
    }
    Uuid::try_parse(encoded).ok().map(|g| g.as_bytes().to_vec())
}

/// Encode raw wire bytes into the canonical storage form: GUID text for
/// 16-byte ids, `b64.`-prefixed base64url otherwise.
pub fn encode_credential_id(raw: &[u8]) -> String {
    match Uuid::from_slice(raw) {
        Ok(guid) => guid.hyphenated().to_string(),
        Err(_) => format!("{B64_PREFIX}{}", URL_SAFE_NO_PAD.encode(raw)),
    }
}

/// GUID text form of a raw 16-byte id, or `None` when the id is not
/// GUID-shaped.
pub fn guid_to_standard_format(raw: &[u8]) -> Option<String> {
    Uuid::from_slice(raw).ok().map(|g| g.hyphenated().to_string())
}

/// Null-safe credential id equality: length first, then bytes.
/// Not constant-time; acceptable for a local single-user vault.
pub fn compare_credential_ids(a: Option<&[u8]>, b: Option<&[u8]>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.len() == b.len() && a == b,
        _ => false,
    }
}
