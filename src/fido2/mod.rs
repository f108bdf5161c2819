//! The authenticator protocol engine: credential creation (MakeCredential),
//! assertion (GetAssertion), and vault-side credential discovery.

pub mod credential_id;
pub mod domain;
pub mod types;

mod attestation;
mod auth_data;
mod get_assertion;
mod keys;
mod make_credential;
mod resolver;

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{Fido2Error, Fido2ErrorCode};
use crate::vault::credential::Fido2CredentialView;
use crate::vault::CipherService;
use credential_id::guid_to_standard_format;

/// Virtual FIDO2 authenticator backed by a credential vault.
///
/// Key material lives inside vault entries read through [`CipherService`];
/// this service never persists anything itself. After a successful
/// MakeCredential the caller saves the returned credential, after a
/// successful GetAssertion the mutated counter.
pub struct Fido2Authenticator {
    ciphers: Arc<dyn CipherService>,
}

impl Fido2Authenticator {
    pub fn new(ciphers: Arc<dyn CipherService>) -> Self {
        Self { ciphers }
    }

    /// Non-mutating browse of discoverable-or-allow-listed credentials for
    /// an rpId; no signing, no counter mutation. `allowed_credential_ids`
    /// are base64url-encoded raw credential ids; undecodable entries are
    /// ignored.
    pub async fn silent_credential_discovery(
        &self,
        rp_id: &str,
        allowed_credential_ids: Option<&[String]>,
    ) -> Result<Vec<Fido2CredentialView>, Fido2Error> {
        let ciphers = self.find_credentials_by_rp(rp_id).await.map_err(|e| {
            tracing::error!(error = %e, "vault read failed during credential discovery");
            Fido2ErrorCode::Unknown
        })?;

        let allowed: Vec<String> = allowed_credential_ids
            .unwrap_or_default()
            .iter()
            .filter_map(|id| {
                URL_SAFE_NO_PAD
                    .decode(id)
                    .ok()
                    .and_then(|raw| guid_to_standard_format(&raw))
            })
            .collect();

        let mut found = Vec::new();
        for cipher in &ciphers {
            let Some(login) = &cipher.login else { continue };
            for credential in &login.fido2_credentials {
                if credential.rp_id != rp_id {
                    continue;
                }
                if allowed.is_empty() || allowed.contains(&credential.credential_id) {
                    found.push(credential.clone());
                }
            }
        }
        Ok(found)
    }
}

/// User-verification stub. Always reports verified; interactive
/// verification is a future extension point.
pub(crate) fn evaluate_user_verification() -> bool {
    true
}
