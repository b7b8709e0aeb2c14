use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for API key; only the hash of the secret is stored
#[derive(Debug, Clone, FromRow)]
pub struct ApiKey {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub prefix: String,
    pub key_hash: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// Freshly generated key material
#[derive(Debug, Clone)]
pub struct GeneratedKey {
    /// Shown to the caller exactly once
    pub plaintext: String,
    pub prefix: String,
    pub hash: String,
}

impl GeneratedKey {
    pub const SCHEME: &'static str = "rop_";
    const PREFIX_LEN: usize = 8;

    /// `rop_` followed by 32 random bytes as lowercase hex
    pub fn generate() -> Self {
        let mut secret = [0u8; 32];
        // v4 UUIDs carry OS randomness
        secret[..16].copy_from_slice(Uuid::new_v4().as_bytes());
        secret[16..].copy_from_slice(Uuid::new_v4().as_bytes());

        let body = hex::encode(secret);
        let plaintext = format!("{}{}", Self::SCHEME, body);
        Self {
            prefix: body[..Self::PREFIX_LEN].to_string(),
            hash: Self::hash(&plaintext),
            plaintext,
        }
    }

    /// sha256 of the full plaintext key, lowercase hex
    pub fn hash(plaintext: &str) -> String {
        hex::encode(Sha256::digest(plaintext.as_bytes()))
    }
}
