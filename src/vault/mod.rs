//! Boundary to the encrypted vault collaborator.
//!
//! The authenticator engine only ever reads decrypted cipher views through
//! [`CipherService`]; persistence of new credentials and mutated counters is
//! the caller's responsibility.

pub mod credential;
pub mod memory;

use async_trait::async_trait;

use self::credential::Fido2CredentialView;

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("storage: {0}")]
    Storage(String),
    #[error("decryption: {0}")]
    Decryption(String),
}

/// Closed set of cipher categories known to the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherType {
    Login,
    SecureNote,
    Card,
    Identity,
}

/// Login payload of a cipher entry. Only the first FIDO2 credential is
/// ever consulted; one credential per login is supported.
#[derive(Debug, Clone, Default)]
pub struct LoginView {
    pub fido2_credentials: Vec<Fido2CredentialView>,
}

impl LoginView {
    pub fn has_fido2_credentials(&self) -> bool {
        !self.fido2_credentials.is_empty()
    }
}

/// A decrypted vault entry as exposed by the vault collaborator.
#[derive(Debug, Clone)]
pub struct CipherView {
    pub id: String,
    pub name: Option<String>,
    pub cipher_type: CipherType,
    pub is_deleted: bool,
    pub login: Option<LoginView>,
}

impl CipherView {
    /// First FIDO2 credential of a live login entry, if any.
    pub fn fido2_credential(&self) -> Option<&Fido2CredentialView> {
        if self.is_deleted || self.cipher_type != CipherType::Login {
            return None;
        }
        self.login.as_ref()?.fido2_credentials.first()
    }
}

/// Read access to the vault's decrypted entries.
#[async_trait]
pub trait CipherService: Send + Sync {
    async fn get_all_decrypted(&self) -> Result<Vec<CipherView>, VaultError>;
}
