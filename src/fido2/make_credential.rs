use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use p256::ecdsa::SigningKey;
use uuid::Uuid;

use super::attestation::build_attestation_object;
use super::auth_data::{generate_auth_data, AuthDataParams};
use super::credential_id::parse_credential_id;
use super::keys::{self, KeyError};
use super::types::{MakeCredentialOutcome, MakeCredentialParams, MakeCredentialResult};
use super::{evaluate_user_verification, Fido2Authenticator};
use crate::abort::{check_for_abort, AbortSignal};
use crate::config::COSE_ALG_ES256;
use crate::error::{Fido2Error, Fido2ErrorCode};
use crate::vault::credential::Fido2CredentialView;

impl Fido2Authenticator {
    /// Create a new vault-resident credential for a relying party.
    ///
    /// Returns the wire response and the stored credential the caller must
    /// persist into a vault entry.
    pub async fn make_credential(
        &self,
        params: MakeCredentialParams,
        abort: Option<&AbortSignal>,
    ) -> Result<MakeCredentialOutcome, Fido2Error> {
        // ES256 is the only supported algorithm; at least one requested
        // parameter must be compatible with it.
        if params
            .cred_types_and_pub_key_algs
            .iter()
            .all(|p| p.alg != COSE_ALG_ES256)
        {
            let requested: Vec<String> = params
                .cred_types_and_pub_key_algs
                .iter()
                .map(|p| p.alg.to_string())
                .collect();
            tracing::warn!(
                requested = requested.join(", "),
                "no compatible algorithms found"
            );
            return Err(Fido2ErrorCode::NotSupported.into());
        }

        check_for_abort(abort)?;

        // Refuse to create a duplicate for any excluded credential already
        // resident in the vault.
        let existing = self
            .find_excluded_credentials(&params.exclude_credential_descriptor_list)
            .await?;
        if !existing.is_empty() {
            tracing::info!("aborting due to excluded credential found in vault");
            return Err(Fido2ErrorCode::CredentialExcluded.into());
        }

        check_for_abort(abort)?;

        let (key_pair, public_key) = match create_wire_key_pair() {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(error = %e, "unknown error when creating key pair");
                return Err(Fido2ErrorCode::Unknown.into());
            }
        };

        let user_verified = evaluate_user_verification();
        if !user_verified && params.require_user_verification {
            tracing::warn!("aborting because user verification was unsuccessful");
            return Err(Fido2ErrorCode::NotAllowed.into());
        }

        let credential = match build_credential_view(&params, &key_pair) {
            Ok(credential) => credential,
            Err(e) => {
                tracing::error!(error = %e, "unknown error when creating credential");
                return Err(Fido2ErrorCode::Unknown.into());
            }
        };

        check_for_abort(abort)?;

        let raw_credential_id = parse_credential_id(&credential.credential_id)
            .ok_or(Fido2ErrorCode::Unknown)?;
        let auth_data = generate_auth_data(AuthDataParams {
            rp_id: &params.rp.id,
            credential_id: &raw_credential_id,
            counter: credential.counter,
            user_presence: true,
            user_verification: user_verified,
            key_pair: Some(&key_pair),
        })
        .map_err(|e| {
            tracing::error!(error = %e, "unknown error when encoding authenticator data");
            Fido2ErrorCode::Unknown
        })?;
        let attestation_object = build_attestation_object(&auth_data).map_err(|e| {
            tracing::error!(error = %e, "unknown error when encoding attestation object");
            Fido2ErrorCode::Unknown
        })?;

        Ok(MakeCredentialOutcome {
            response: MakeCredentialResult {
                credential_id: raw_credential_id,
                attestation_object,
                auth_data,
                public_key,
                public_key_algorithm: COSE_ALG_ES256,
            },
            credential,
        })
    }
}

/// Generate the ECDSA P-256 pair and its SPKI export for the wire response.
fn create_wire_key_pair() -> Result<(SigningKey, Vec<u8>), KeyError> {
    let key_pair = keys::create_key_pair();
    let public_key = keys::export_public_key_spki(&key_pair)?;
    Ok((key_pair, public_key))
}

/// Assemble the stored credential: fresh random canonical id, fixed labels,
/// exported private key, counter 0, discoverability from the resident-key
/// requirement.
fn build_credential_view(
    params: &MakeCredentialParams,
    key_pair: &SigningKey,
) -> Result<Fido2CredentialView, KeyError> {
    let key_value = URL_SAFE_NO_PAD.encode(keys::export_private_key_pkcs8(key_pair)?);
    Ok(Fido2CredentialView {
        credential_id: Uuid::new_v4().hyphenated().to_string(),
        key_type: "public-key".to_string(),
        key_algorithm: "ECDSA".to_string(),
        key_curve: "P-256".to_string(),
        key_value,
        rp_id: params.rp.id.clone(),
        user_handle: URL_SAFE_NO_PAD.encode(&params.user.id),
        user_name: params.user.name.clone(),
        counter: 0,
        rp_name: params.rp.name.clone(),
        user_display_name: params.user.display_name.clone(),
        discoverable: params.require_resident_key,
        creation_date: Utc::now(),
    })
}
