use crate::vault::credential::Fido2CredentialView;

/// Relying-party entity supplied by the platform.
#[derive(Debug, Clone)]
pub struct PublicKeyCredentialRpEntity {
    pub id: String,
    pub name: Option<String>,
}

/// User account entity supplied by the platform.
#[derive(Debug, Clone)]
pub struct PublicKeyCredentialUserEntity {
    /// Opaque byte handle, unique per user on this RP.
    pub id: Vec<u8>,
    pub name: Option<String>,
    pub display_name: Option<String>,
}

/// A requested credential type / COSE algorithm pair.
#[derive(Debug, Clone)]
pub struct PublicKeyCredentialParam {
    pub cred_type: String,
    pub alg: i64,
}

/// A (type, id) pair naming a specific credential in allow/exclude lists.
#[derive(Debug, Clone)]
pub struct PublicKeyCredentialDescriptor {
    pub cred_type: String,
    pub id: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct MakeCredentialParams {
    pub rp: PublicKeyCredentialRpEntity,
    pub user: PublicKeyCredentialUserEntity,
    pub cred_types_and_pub_key_algs: Vec<PublicKeyCredentialParam>,
    pub exclude_credential_descriptor_list: Vec<PublicKeyCredentialDescriptor>,
    pub require_resident_key: bool,
    pub require_user_verification: bool,
}

#[derive(Debug, Clone)]
pub struct MakeCredentialResult {
    /// Raw wire form of the new credential id.
    pub credential_id: Vec<u8>,
    /// CBOR attestation object (`fmt = "none"`).
    pub attestation_object: Vec<u8>,
    pub auth_data: Vec<u8>,
    /// SubjectPublicKeyInfo DER of the new public key.
    pub public_key: Vec<u8>,
    pub public_key_algorithm: i64,
}

/// Wire result plus the stored credential the vault collaborator must
/// persist.
#[derive(Debug, Clone)]
pub struct MakeCredentialOutcome {
    pub response: MakeCredentialResult,
    pub credential: Fido2CredentialView,
}

#[derive(Debug, Clone)]
pub struct GetAssertionParams {
    pub rp_id: String,
    /// SHA-256 hash of the serialized client data.
    pub hash: Vec<u8>,
    pub allow_credential_descriptor_list: Option<Vec<PublicKeyCredentialDescriptor>>,
    pub require_user_verification: bool,
}

#[derive(Debug, Clone)]
pub struct SelectedCredential {
    pub id: Vec<u8>,
    pub user_handle: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct GetAssertionResult {
    pub authenticator_data: Vec<u8>,
    pub selected_credential: SelectedCredential,
    /// ASN.1 DER ECDSA signature over `authenticatorData || clientDataHash`.
    pub signature: Vec<u8>,
}

/// Wire result plus the credential view carrying the post-increment counter
/// and the id of the vault entry owning it, for the caller to persist.
#[derive(Debug, Clone)]
pub struct GetAssertionOutcome {
    pub response: GetAssertionResult,
    pub credential: Fido2CredentialView,
    pub cipher_id: String,
}
