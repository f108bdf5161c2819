//! Vault-side credential matching: exclusion sets, allow lists and
//! discoverable lookup. All lookups are restricted to non-deleted login
//! entries; only the first FIDO2 credential of an entry is authoritative.

use super::credential_id::{compare_credential_ids, guid_to_standard_format, parse_credential_id};
use super::types::PublicKeyCredentialDescriptor;
use super::Fido2Authenticator;
use crate::error::{Fido2Error, Fido2ErrorCode};
use crate::vault::credential::Fido2CredentialView;
use crate::vault::{CipherView, VaultError};

impl Fido2Authenticator {
    /// Stored credentials whose canonical id matches one of the given
    /// descriptors. Descriptor ids that fail to canonicalize are discarded.
    /// Used for MakeCredential exclusion and for duplicate-detection UI.
    pub async fn find_excluded_credentials(
        &self,
        descriptors: &[PublicKeyCredentialDescriptor],
    ) -> Result<Vec<Fido2CredentialView>, Fido2Error> {
        let ids: Vec<String> = descriptors
            .iter()
            .filter_map(|descriptor| guid_to_standard_format(&descriptor.id))
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ciphers = self.ciphers.get_all_decrypted().await.map_err(|e| {
            tracing::error!(error = %e, "vault read failed during exclusion lookup");
            Fido2ErrorCode::Unknown
        })?;
        Ok(ciphers
            .iter()
            .filter_map(CipherView::fido2_credential)
            .filter(|credential| ids.iter().any(|id| *id == credential.credential_id))
            .cloned()
            .collect())
    }

    /// Vault entries whose first credential is scoped to `rp_id` and named
    /// by one of the allow-list descriptors.
    pub(crate) async fn find_credentials_by_id(
        &self,
        descriptors: &[PublicKeyCredentialDescriptor],
        rp_id: &str,
    ) -> Result<Vec<CipherView>, VaultError> {
        if descriptors.is_empty() {
            return Ok(Vec::new());
        }

        let ciphers = self.ciphers.get_all_decrypted().await?;
        Ok(ciphers
            .into_iter()
            .filter(|cipher| match cipher.fido2_credential() {
                Some(credential) => {
                    credential.rp_id == rp_id
                        && descriptors.iter().any(|descriptor| {
                            compare_credential_ids(
                                Some(&descriptor.id),
                                parse_credential_id(&credential.credential_id).as_deref(),
                            )
                        })
                }
                None => false,
            })
            .collect())
    }

    /// Vault entries holding a discoverable credential for `rp_id`.
    pub(crate) async fn find_credentials_by_rp(
        &self,
        rp_id: &str,
    ) -> Result<Vec<CipherView>, VaultError> {
        let ciphers = self.ciphers.get_all_decrypted().await?;
        Ok(ciphers
            .into_iter()
            .filter(|cipher| {
                if cipher.fido2_credential().is_none() {
                    return false;
                }
                cipher
                    .login
                    .as_ref()
                    .map(|login| {
                        login
                            .fido2_credentials
                            .iter()
                            .any(|c| c.rp_id == rp_id && c.discoverable)
                    })
                    .unwrap_or(false)
            })
            .collect())
    }
}
