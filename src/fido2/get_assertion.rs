use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::auth_data::{generate_auth_data, AuthDataParams};
use super::credential_id::{guid_to_standard_format, parse_credential_id};
use super::keys::{self, KeyError};
use super::types::{
    GetAssertionOutcome, GetAssertionParams, GetAssertionResult, SelectedCredential,
};
use super::{evaluate_user_verification, Fido2Authenticator};
use crate::abort::{check_for_abort, AbortSignal};
use crate::error::{Fido2Error, Fido2ErrorCode};
use crate::vault::credential::Fido2CredentialView;

#[derive(Debug, thiserror::Error)]
enum AssertionError {
    #[error("credential id is not decodable")]
    BadCredentialId,
    #[error("user handle is not base64url")]
    BadUserHandle,
    #[error("stored key material is not base64url")]
    BadKeyValue,
    #[error(transparent)]
    Key(#[from] KeyError),
}

impl Fido2Authenticator {
    /// Produce an assertion for a vault-resident credential scoped to the
    /// request's rpId.
    ///
    /// The returned outcome carries the credential view with the
    /// post-increment counter; persisting it is the caller's job.
    pub async fn get_assertion(
        &self,
        params: GetAssertionParams,
        abort: Option<&AbortSignal>,
    ) -> Result<GetAssertionOutcome, Fido2Error> {
        check_for_abort(abort)?;

        // Resolve candidate vault entries: allow-list match when a list is
        // supplied, discoverable credentials otherwise.
        let allow_list = params
            .allow_credential_descriptor_list
            .as_deref()
            .filter(|list| !list.is_empty());
        let cipher_options = match allow_list {
            Some(descriptors) => self.find_credentials_by_id(descriptors, &params.rp_id).await,
            None => self.find_credentials_by_rp(&params.rp_id).await,
        }
        .map_err(|e| {
            tracing::error!(error = %e, "vault read failed during credential lookup");
            Fido2ErrorCode::Unknown
        })?;

        if cipher_options.is_empty() {
            tracing::info!(
                rp_id = %params.rp_id,
                "aborting because no matching credentials were found in the vault"
            );
            return Err(Fido2ErrorCode::NoCredentials.into());
        }

        // Flatten to credential views scoped to the rpId, keeping the owning
        // entry's id for counter persistence.
        let mut credentials: Vec<(String, Fido2CredentialView)> = Vec::new();
        for cipher in &cipher_options {
            let Some(login) = &cipher.login else { continue };
            for credential in &login.fido2_credentials {
                if credential.rp_id == params.rp_id {
                    credentials.push((cipher.id.clone(), credential.clone()));
                }
            }
        }

        // Soft filter: narrowing by allow-list id never empties the set on
        // its own; a fruitless narrowing falls back to the rpId-scoped set.
        if let Some(descriptors) = allow_list {
            let filtered: Vec<(String, Fido2CredentialView)> = credentials
                .iter()
                .filter(|(_, credential)| {
                    descriptors.iter().any(|descriptor| {
                        guid_to_standard_format(&descriptor.id).as_deref()
                            == Some(credential.credential_id.as_str())
                    })
                })
                .cloned()
                .collect();
            if !filtered.is_empty() {
                credentials = filtered;
            }
        }

        if credentials.is_empty() {
            tracing::warn!(rp_id = %params.rp_id, "no credentials found, aborting assertion");
            return Err(Fido2ErrorCode::NoCredentials.into());
        }

        let user_verified = evaluate_user_verification();
        if !user_verified && params.require_user_verification {
            tracing::warn!("aborting because user verification was unsuccessful");
            return Err(Fido2ErrorCode::NotAllowed.into());
        }

        // No interactive disambiguation: the first candidate in resolver
        // order is selected.
        let (cipher_id, mut credential) = credentials.swap_remove(0);

        // Quirk kept from the observed behavior: a counter already past zero
        // advances, a fresh credential stays at zero.
        if credential.counter > 0 {
            credential.counter = match credential.counter.checked_add(1) {
                Some(counter) => counter,
                None => {
                    tracing::error!(
                        credential_id = %credential.credential_id,
                        "credential counter overflow"
                    );
                    return Err(Fido2ErrorCode::Unknown.into());
                }
            };
        }

        check_for_abort(abort)?;

        let (authenticator_data, signature, selected) =
            match build_assertion(&credential, &params.hash, user_verified) {
                Ok(parts) => parts,
                Err(e) => {
                    tracing::error!(error = %e, "unknown error when asserting credential");
                    return Err(Fido2ErrorCode::Unknown.into());
                }
            };

        Ok(GetAssertionOutcome {
            response: GetAssertionResult {
                authenticator_data,
                selected_credential: selected,
                signature,
            },
            credential,
            cipher_id,
        })
    }
}

fn build_assertion(
    credential: &Fido2CredentialView,
    client_data_hash: &[u8],
    user_verified: bool,
) -> Result<(Vec<u8>, Vec<u8>, SelectedCredential), AssertionError> {
    let raw_credential_id =
        parse_credential_id(&credential.credential_id).ok_or(AssertionError::BadCredentialId)?;
    let user_handle = URL_SAFE_NO_PAD
        .decode(&credential.user_handle)
        .map_err(|_| AssertionError::BadUserHandle)?;

    let authenticator_data = generate_auth_data(AuthDataParams {
        rp_id: &credential.rp_id,
        credential_id: &raw_credential_id,
        counter: credential.counter,
        user_presence: true,
        user_verification: user_verified,
        key_pair: None,
    })?;

    let key_der = URL_SAFE_NO_PAD
        .decode(&credential.key_value)
        .map_err(|_| AssertionError::BadKeyValue)?;
    let private_key = keys::import_private_key_pkcs8(&key_der)?;
    let signature = keys::sign(&authenticator_data, client_data_hash, &private_key);

    Ok((
        authenticator_data,
        signature,
        SelectedCredential {
            id: raw_credential_id,
            user_handle,
        },
    ))
}
