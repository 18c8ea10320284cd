//! API key secret generation and digest computation
//!
//! Pure transforms: no I/O, no storage access.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Fixed prefix on generated secrets, for recognizability in logs and support
/// tickets. Carries no entropy; the digest covers the whole string.
pub const SECRET_PREFIX: &str = "dk_";

/// Number of random bytes in a generated secret (256 bits)
const SECRET_BYTES: usize = 32;

/// Generates raw API key secrets and computes the one-way digest used for
/// storage and lookup.
///
/// Secrets are high-entropy random values, not user-chosen passwords, so the
/// digest is unsalted: uniqueness of the secret substitutes for salting.
#[derive(Debug, Clone, Default)]
pub struct KeyCodec;

impl KeyCodec {
    pub fn new() -> Self {
        Self
    }

    /// Generate a new raw secret: 32 bytes from the OS-seeded CSPRNG,
    /// URL-safe base64 without padding. Safe to carry in headers and query
    /// strings without escaping.
    pub fn generate_secret(&self) -> String {
        let mut random_bytes = [0u8; SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        format!("{}{}", SECRET_PREFIX, URL_SAFE_NO_PAD.encode(random_bytes))
    }

    /// Compute the storage digest of a secret: SHA-256, lowercase hex.
    /// Deterministic and one-way; the secret is not recoverable from it.
    pub fn digest(&self, secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Constant-time string comparison to prevent timing attacks when matching
/// digests outside the database
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut result = 0u8;

    for i in 0..a.len() {
        result |= a_bytes[i] ^ b_bytes[i];
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret_format() {
        let codec = KeyCodec::new();
        let secret = codec.generate_secret();

        assert!(secret.starts_with("dk_"));
        // 32 bytes base64-encoded without padding = 43 chars
        assert_eq!(secret.len(), SECRET_PREFIX.len() + 43);
    }

    #[test]
    fn test_secret_is_url_safe() {
        let codec = KeyCodec::new();

        for _ in 0..50 {
            let secret = codec.generate_secret();
            assert!(
                secret
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "unexpected character in secret: {secret}"
            );
        }
    }

    #[test]
    fn test_secret_uniqueness() {
        let codec = KeyCodec::new();
        let a = codec.generate_secret();
        let b = codec.generate_secret();

        assert_ne!(a, b);
        assert_ne!(codec.digest(&a), codec.digest(&b));
    }

    #[test]
    fn test_digest_deterministic() {
        let codec = KeyCodec::new();
        let secret = codec.generate_secret();

        assert_eq!(codec.digest(&secret), codec.digest(&secret));
    }

    #[test]
    fn test_digest_is_lowercase_hex() {
        let codec = KeyCodec::new();
        let digest = codec.digest("dk_fixed-input");

        assert_eq!(digest.len(), 64);
        assert!(digest
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_digest_known_value() {
        let codec = KeyCodec::new();

        // SHA-256 of the ASCII string "abc"
        assert_eq!(
            codec.digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("hello", "hello"));
        assert!(!constant_time_eq("hello", "world"));
        assert!(!constant_time_eq("hello", "hell"));
        assert!(constant_time_eq("", ""));
    }
}
