use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A vault-resident FIDO2 credential, decrypted before use.
///
/// `credential_id` is the canonical text id (GUID or `b64.`-prefixed form),
/// `key_value` the base64url PKCS#8 private key, `user_handle` the base64url
/// user entity id. The counter is mutated on successful assertions and
/// persisted by the vault collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fido2CredentialView {
    pub credential_id: String,
    pub key_type: String,
    pub key_algorithm: String,
    pub key_curve: String,
    pub key_value: String,
    pub rp_id: String,
    pub user_handle: String,
    pub user_name: Option<String>,
    pub counter: u32,
    pub rp_name: Option<String>,
    pub user_display_name: Option<String>,
    pub discoverable: bool,
    pub creation_date: DateTime<Utc>,
}
