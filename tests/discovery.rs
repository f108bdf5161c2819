use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use fidovault::fido2::types::{
    MakeCredentialParams, PublicKeyCredentialDescriptor, PublicKeyCredentialParam,
    PublicKeyCredentialRpEntity, PublicKeyCredentialUserEntity,
};
use fidovault::vault::memory::MemoryCipherService;
use fidovault::vault::{CipherType, CipherView, LoginView};
use fidovault::{Fido2Authenticator, Fido2CredentialView};

fn make_params(rp_id: &str, user: &[u8], resident_key: bool) -> MakeCredentialParams {
    MakeCredentialParams {
        rp: PublicKeyCredentialRpEntity {
            id: rp_id.to_string(),
            name: None,
        },
        user: PublicKeyCredentialUserEntity {
            id: user.to_vec(),
            name: None,
            display_name: None,
        },
        cred_types_and_pub_key_algs: vec![PublicKeyCredentialParam {
            cred_type: "public-key".into(),
            alg: -7,
        }],
        exclude_credential_descriptor_list: Vec::new(),
        require_resident_key: resident_key,
        require_user_verification: false,
    }
}

fn login_cipher(id: &str, credential: Fido2CredentialView) -> CipherView {
    CipherView {
        id: id.to_string(),
        name: None,
        cipher_type: CipherType::Login,
        is_deleted: false,
        login: Some(LoginView {
            fido2_credentials: vec![credential],
        }),
    }
}

async fn seed(
    authenticator: &Fido2Authenticator,
    vault: &MemoryCipherService,
    cipher_id: &str,
    rp_id: &str,
    user: &[u8],
    resident_key: bool,
) -> (Fido2CredentialView, Vec<u8>) {
    let outcome = authenticator
        .make_credential(make_params(rp_id, user, resident_key), None)
        .await
        .unwrap();
    vault
        .upsert(login_cipher(cipher_id, outcome.credential.clone()))
        .await;
    (outcome.credential, outcome.response.credential_id)
}

#[tokio::test]
async fn test_discovery_lists_discoverable_credentials_for_rp() {
    let vault = Arc::new(MemoryCipherService::new());
    let authenticator = Fido2Authenticator::new(vault.clone());
    seed(&authenticator, &vault, "c1", "example.com", b"u1", true).await;
    seed(&authenticator, &vault, "c2", "example.com", b"u2", true).await;
    seed(&authenticator, &vault, "c3", "example.org", b"u3", true).await;
    seed(&authenticator, &vault, "c4", "example.com", b"u4", false).await;

    let found = authenticator
        .silent_credential_discovery("example.com", None)
        .await
        .unwrap();
    assert_eq!(found.len(), 2, "only discoverable example.com credentials");
    assert!(found.iter().all(|c| c.rp_id == "example.com" && c.discoverable));
    assert!(
        found.iter().all(|c| c.counter == 0),
        "discovery must not mutate counters"
    );
}

#[tokio::test]
async fn test_discovery_filters_by_allowed_ids() {
    let vault = Arc::new(MemoryCipherService::new());
    let authenticator = Fido2Authenticator::new(vault.clone());
    let (_, raw_id1) = seed(&authenticator, &vault, "c1", "example.com", b"u1", true).await;
    seed(&authenticator, &vault, "c2", "example.com", b"u2", true).await;

    let allowed = vec![URL_SAFE_NO_PAD.encode(&raw_id1)];
    let found = authenticator
        .silent_credential_discovery("example.com", Some(&allowed))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(
        fidovault::fido2::credential_id::parse_credential_id(&found[0].credential_id).unwrap(),
        raw_id1
    );
}

#[tokio::test]
async fn test_discovery_ignores_undecodable_allowed_ids() {
    let vault = Arc::new(MemoryCipherService::new());
    let authenticator = Fido2Authenticator::new(vault.clone());
    seed(&authenticator, &vault, "c1", "example.com", b"u1", true).await;

    // All entries undecodable: the filter set stays empty and everything
    // for the rp is returned.
    let allowed = vec!["!!not-base64!!".to_string()];
    let found = authenticator
        .silent_credential_discovery("example.com", Some(&allowed))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn test_find_excluded_credentials_empty_for_unmatched_descriptors() {
    // Scenario: descriptor ids match none of the vault's credentials.
    let vault = Arc::new(MemoryCipherService::new());
    let authenticator = Fido2Authenticator::new(vault.clone());
    seed(&authenticator, &vault, "c1", "example.com", b"u1", true).await;

    let descriptors = vec![PublicKeyCredentialDescriptor {
        cred_type: "public-key".into(),
        id: vec![0x99u8; 16],
    }];
    let found = authenticator
        .find_excluded_credentials(&descriptors)
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_find_excluded_credentials_matches_stored_credential() {
    let vault = Arc::new(MemoryCipherService::new());
    let authenticator = Fido2Authenticator::new(vault.clone());
    let (credential, raw_id) = seed(&authenticator, &vault, "c1", "example.com", b"u1", true).await;

    let descriptors = vec![
        PublicKeyCredentialDescriptor {
            cred_type: "public-key".into(),
            id: raw_id,
        },
        // Non-canonicalizable id, silently discarded.
        PublicKeyCredentialDescriptor {
            cred_type: "public-key".into(),
            id: vec![0x01, 0x02],
        },
    ];
    let found = authenticator
        .find_excluded_credentials(&descriptors)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].credential_id, credential.credential_id);
}

#[tokio::test]
async fn test_find_excluded_credentials_skips_deleted_entries() {
    let vault = Arc::new(MemoryCipherService::new());
    let authenticator = Fido2Authenticator::new(vault.clone());
    let (credential, raw_id) = seed(&authenticator, &vault, "c1", "example.com", b"u1", true).await;

    let mut cipher = login_cipher("c1", credential);
    cipher.is_deleted = true;
    vault.upsert(cipher).await;

    let descriptors = vec![PublicKeyCredentialDescriptor {
        cred_type: "public-key".into(),
        id: raw_id,
    }];
    let found = authenticator
        .find_excluded_credentials(&descriptors)
        .await
        .unwrap();
    assert!(found.is_empty(), "deleted entries are never matched");
}
