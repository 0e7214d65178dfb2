/// Password hashing — PBKDF2-HMAC-SHA256.
///
/// 100,000 rounds over a per-user 16-byte salt, producing a 32-byte
/// key. Hashing is pure; salt generation is the only entropy source.
/// Field trimming and length rules live in the store, not here.

use pbkdf2::pbkdf2_hmac_array;
use rand::RngCore;
use sha2::Sha256;

pub const SALT_LEN: usize = 16;
pub const HASH_LEN: usize = 32;
pub const KDF_ROUNDS: u32 = 100_000;

/// Derive the stored hash for a password + salt pair.
/// Password bytes are the UTF-8 encoding, untrimmed.
pub fn hash_password(password: &str, salt: &[u8; SALT_LEN]) -> [u8; HASH_LEN] {
    pbkdf2_hmac_array::<Sha256, HASH_LEN>(password.as_bytes(), salt, KDF_ROUNDS)
}

/// Fresh random salt for a new account.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Login-time check: does `password` reproduce the stored hash?
pub fn verify_password(password: &str, salt: &[u8; SALT_LEN], stored: &[u8; HASH_LEN]) -> bool {
    hash_password(password, salt) == *stored
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic() {
        let salt = [7u8; SALT_LEN];
        let a = hash_password("hunter2", &salt);
        let b = hash_password("hunter2", &salt);
        assert_eq!(a, b);
    }

    #[test]
    fn different_salts_give_different_hashes() {
        let a = hash_password("hunter2", &[1u8; SALT_LEN]);
        let b = hash_password("hunter2", &[2u8; SALT_LEN]);
        assert_ne!(a, b);
    }

    #[test]
    fn different_passwords_give_different_hashes() {
        let salt = [7u8; SALT_LEN];
        let a = hash_password("hunter2", &salt);
        let b = hash_password("hunter3", &salt);
        assert_ne!(a, b);
    }

    #[test]
    fn verify_accepts_the_right_password_only() {
        let salt = [9u8; SALT_LEN];
        let stored = hash_password("open sesame", &salt);
        assert!(verify_password("open sesame", &salt, &stored));
        assert!(!verify_password("open sesame ", &salt, &stored));
        assert!(!verify_password("Open sesame", &salt, &stored));
    }

    #[test]
    fn generated_salts_vary() {
        // 16 random bytes; a collision here means the RNG is broken.
        assert_ne!(generate_salt(), generate_salt());
    }
}
