//! Cryptographic utilities

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Random token rendered as lowercase hex (`2 * bytes` characters)
pub fn generate_hex_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Hash a string using SHA-256
pub fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a hash matches the input
pub fn verify_hash(input: &str, hash: &str) -> bool {
    hash_string(input) == hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_hex_token() {
        let token1 = generate_hex_token(32);
        let token2 = generate_hex_token(32);

        assert_eq!(token1.len(), 64);
        assert!(token1.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_hash_string() {
        assert_eq!(hash_string("test"), hash_string("test"));
        assert_ne!(hash_string("test"), hash_string("different"));
        assert_eq!(hash_string("x").len(), 64);
    }

    #[test]
    fn test_verify_hash() {
        let hash = hash_string("invite-token");

        assert!(verify_hash("invite-token", &hash));
        assert!(!verify_hash("other-token", &hash));
    }
}
