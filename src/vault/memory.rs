use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CipherService, CipherView, VaultError};

/// In-memory [`CipherService`] for tests and embedding without a real vault.
#[derive(Default)]
pub struct MemoryCipherService {
    ciphers: RwLock<Vec<CipherView>>,
}

impl MemoryCipherService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a cipher by id. This stands in for the vault's
    /// save path, which the authenticator engine itself never calls.
    pub async fn upsert(&self, cipher: CipherView) {
        let mut guard = self.ciphers.write().await;
        match guard.iter_mut().find(|c| c.id == cipher.id) {
            Some(existing) => *existing = cipher,
            None => guard.push(cipher),
        }
    }

    pub async fn cipher_count(&self) -> usize {
        self.ciphers.read().await.len()
    }
}

#[async_trait]
impl CipherService for MemoryCipherService {
    async fn get_all_decrypted(&self) -> Result<Vec<CipherView>, VaultError> {
        Ok(self.ciphers.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::CipherType;

    fn cipher(id: &str) -> CipherView {
        CipherView {
            id: id.to_string(),
            name: None,
            cipher_type: CipherType::Login,
            is_deleted: false,
            login: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_replaces() {
        let store = MemoryCipherService::new();
        store.upsert(cipher("a")).await;
        store.upsert(cipher("b")).await;
        assert_eq!(store.cipher_count().await, 2);

        let mut updated = cipher("a");
        updated.is_deleted = true;
        store.upsert(updated).await;
        assert_eq!(store.cipher_count().await, 2);

        let all = store.get_all_decrypted().await.unwrap();
        let a = all.iter().find(|c| c.id == "a").unwrap();
        assert!(a.is_deleted);
    }
}
