use serde::{Deserialize, Serialize};
use smilepet_common::ClientId;

/// Stable client identity, created once per installation and reused
/// across reconnects. Persisting it is the embedder's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub client_id: ClientId,
    pub nickname: String,
}

impl ClientIdentity {
    /// Mint a fresh identity with a random client id.
    pub fn generate(nickname: &str) -> Self {
        Self {
            client_id: ClientId::new(),
            nickname: nickname.to_string(),
        }
    }

    /// Rebuild an identity loaded from durable storage.
    pub fn restore(client_id: String, nickname: String) -> Self {
        Self {
            client_id: ClientId::from_string(client_id),
            nickname,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_mints_unique_ids() {
        let a = ClientIdentity::generate("alice");
        let b = ClientIdentity::generate("alice");
        assert_ne!(a.client_id, b.client_id);
        assert_eq!(a.nickname, "alice");
    }

    #[test]
    fn restore_keeps_stored_id() {
        let identity = ClientIdentity::restore("stored-id".into(), "bob".into());
        assert_eq!(identity.client_id.as_str(), "stored-id");
        assert_eq!(identity.nickname, "bob");
    }
}
