/// Durable record types: users and scores.
///
/// These are the fixed-shape rows the snapshot file holds. Salt and
/// hash travel as hex strings on disk; `progress` defaults to empty so
/// snapshots written before the progress feature still load.

use serde::{Deserialize, Serialize};

use crate::domain::credentials::{HASH_LEN, SALT_LEN};

// ── User ──

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(with = "hex_bytes")]
    pub salt: [u8; SALT_LEN],
    #[serde(with = "hex_bytes")]
    pub pw_hash: [u8; HASH_LEN],
    /// Unix seconds at account creation.
    pub created_at: u64,
    /// Completed countries, in completion order, duplicate-free.
    #[serde(default)]
    pub progress: Vec<String>,
}

impl User {
    pub fn new(
        id: u64,
        username: String,
        salt: [u8; SALT_LEN],
        pw_hash: [u8; HASH_LEN],
        created_at: u64,
    ) -> Self {
        User { id, username, salt, pw_hash, created_at, progress: Vec::new() }
    }

    /// Has this user completed the given country?
    pub fn has_completed(&self, country: &str) -> bool {
        self.progress.iter().any(|c| c == country)
    }

    /// Record a completed country. Returns false if already present.
    pub fn add_progress(&mut self, country: &str) -> bool {
        if self.has_completed(country) {
            return false;
        }
        self.progress.push(country.to_string());
        true
    }

    /// Forget a completed country. Returns false if it was not there.
    pub fn remove_progress(&mut self, country: &str) -> bool {
        let before = self.progress.len();
        self.progress.retain(|c| c != country);
        self.progress.len() != before
    }
}

// ── Score ──

/// One finished run. Append-only; a user may hold many rows per level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub id: u64,
    pub user_id: u64,
    /// Difficulty tier as stored (1, 2, 3).
    pub level: u32,
    pub time_sec: u32,
    pub created_at: u64,
}

// ── Hex serde for fixed-size byte fields ──

mod hex_bytes {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S, const N: usize>(bytes: &[u8; N], ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ser.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D, const N: usize>(de: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(de)?;
        let raw = hex::decode(&text).map_err(D::Error::custom)?;
        raw.try_into()
            .map_err(|_| D::Error::custom(format!("expected {} hex bytes", N)))
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
