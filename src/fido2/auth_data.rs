//! Authenticator-data encoder.
//!
//! Fixed binary layout carried by every response:
//! 32-byte SHA-256(rpId), 1 flags byte, 4-byte big-endian counter, then an
//! optional attested-credential block (16-byte AAGUID, 2-byte big-endian
//! credential-id length, raw credential id, 77-byte COSE public key).

use p256::ecdsa::SigningKey;
use sha2::{Digest, Sha256};

use super::keys::{self, KeyError};
use crate::config::AAGUID;

pub(crate) struct AuthDataParams<'a> {
    pub rp_id: &'a str,
    pub credential_id: &'a [u8],
    pub counter: u32,
    pub user_presence: bool,
    pub user_verification: bool,
    /// Present only when the attested-credential block is included
    /// (credential creation).
    pub key_pair: Option<&'a SigningKey>,
}

struct Flags {
    extension_data: bool,
    attestation_data: bool,
    backup_eligibility: bool,
    backup_state: bool,
    user_verification: bool,
    user_presence: bool,
}

impl Flags {
    fn byte(&self) -> u8 {
        let mut flags = 0u8;
        if self.extension_data {
            flags |= 0b1000_0000;
        }
        if self.attestation_data {
            flags |= 0b0100_0000;
        }
        if self.backup_state {
            flags |= 0b0001_0000;
        }
        if self.backup_eligibility {
            flags |= 0b0000_1000;
        }
        if self.user_verification {
            flags |= 0b0000_0100;
        }
        if self.user_presence {
            flags |= 0b0000_0001;
        }
        flags
    }
}

pub(crate) fn generate_auth_data(params: AuthDataParams<'_>) -> Result<Vec<u8>, KeyError> {
    let mut auth_data = Vec::with_capacity(37);

    let rp_id_hash = Sha256::digest(params.rp_id.as_bytes());
    auth_data.extend_from_slice(&rp_id_hash);

    let flags = Flags {
        extension_data: false,
        attestation_data: params.key_pair.is_some(),
        // Credentials are vault-synced, so backup eligibility and state are
        // always asserted.
        backup_eligibility: true,
        backup_state: true,
        user_verification: params.user_verification,
        user_presence: params.user_presence,
    };
    auth_data.push(flags.byte());

    auth_data.extend_from_slice(&params.counter.to_be_bytes());

    if let Some(key_pair) = params.key_pair {
        auth_data.extend_from_slice(&AAGUID);
        auth_data.extend_from_slice(&(params.credential_id.len() as u16).to_be_bytes());
        auth_data.extend_from_slice(params.credential_id);
        auth_data.extend_from_slice(&keys::export_public_key_cose(key_pair)?);
    }

    Ok(auth_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params<'a>(key_pair: Option<&'a SigningKey>, credential_id: &'a [u8]) -> AuthDataParams<'a> {
        AuthDataParams {
            rp_id: "example.com",
            credential_id,
            counter: 0,
            user_presence: true,
            user_verification: true,
            key_pair,
        }
    }

    #[test]
    fn test_assertion_auth_data_layout() {
        let auth_data = generate_auth_data(AuthDataParams {
            counter: 42,
            ..params(None, &[])
        })
        .unwrap();

        assert_eq!(auth_data.len(), 37, "header-only authData must be 37 bytes");
        let rp_id_hash: [u8; 32] = Sha256::digest(b"example.com").into();
        assert_eq!(&auth_data[..32], &rp_id_hash, "first 32 bytes must be SHA-256(rpId)");
        assert_eq!(auth_data[32], 0x1D, "flags must be UP|UV|BE|BS");
        assert_eq!(&auth_data[33..37], &42u32.to_be_bytes(), "counter must be big-endian");
    }

    #[test]
    fn test_attested_auth_data_layout() {
        let key = keys::create_key_pair();
        let cred_id = [0x77u8; 16];
        let auth_data = generate_auth_data(params(Some(&key), &cred_id)).unwrap();

        // 37 header + 16 AAGUID + 2 length + id + 77 COSE
        assert_eq!(auth_data.len(), 37 + 18 + cred_id.len() + 77);
        assert_eq!(auth_data[32], 0x5D, "flags must be UP|UV|BE|BS|AT");
        assert_eq!(&auth_data[37..53], &AAGUID, "AAGUID mismatch");
        let len = u16::from_be_bytes([auth_data[53], auth_data[54]]) as usize;
        assert_eq!(len, cred_id.len());
        assert_eq!(&auth_data[55..71], &cred_id);
        assert_eq!(auth_data[71], 0xa5, "COSE key must follow the credential id");
    }

    #[test]
    fn test_attested_length_for_arbitrary_id_sizes() {
        let key = keys::create_key_pair();
        for n in [1usize, 16, 32, 64] {
            let cred_id = vec![0xABu8; n];
            let auth_data = generate_auth_data(params(Some(&key), &cred_id)).unwrap();
            assert_eq!(auth_data.len(), 37 + 18 + n + 77, "length wrong for id of {n} bytes");
        }
    }

    #[test]
    fn test_flag_bits_follow_inputs() {
        let base = generate_auth_data(AuthDataParams {
            user_presence: false,
            user_verification: false,
            ..params(None, &[])
        })
        .unwrap();
        assert_eq!(base[32], 0x18, "BE|BS are always set, extension bit never");

        let up_only = generate_auth_data(AuthDataParams {
            user_verification: false,
            ..params(None, &[])
        })
        .unwrap();
        assert_eq!(up_only[32], 0x19);
    }
}
