//! One-time tokens for workspace invitations.
//!
//! Only the SHA-256 digest of a token is stored; the plain token is handed to
//! the inviter once and must be presented to accept the invitation.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 32;

/// Generates a random hex token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hex-encoded SHA-256 digest of a token, as persisted.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.trim().as_bytes()))
}

/// Expiry timestamp for a token issued at `issued_at`.
pub fn expiry_from(issued_at: DateTime<Utc>, ttl_hours: i64) -> DateTime<Utc> {
    issued_at + Duration::hours(ttl_hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_hex_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_stable_and_ignores_surrounding_whitespace() {
        let token = generate_token();
        let hash = hash_token(&token);
        assert_eq!(hash, hash_token(&format!("  {}\n", token)));
        assert_ne!(hash, hash_token("something-else"));
    }

    #[test]
    fn known_digest() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn expiry_adds_hours() {
        let now = Utc::now();
        assert_eq!(expiry_from(now, 48) - now, Duration::hours(48));
    }
}
