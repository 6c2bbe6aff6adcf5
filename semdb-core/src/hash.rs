//! Content-addressed naming.
//!
//! Fixed-property table names and inline query identifiers both replace an
//! unbounded natural key with a fixed-width digest. Both use SHA-256, rendered
//! as lowercase hex and truncated to [`NAME_HASH_LEN`] characters.

use sha2::Digest;

/// Hex characters kept from the digest (128 bits)
pub const NAME_HASH_LEN: usize = 32;

/// Compute the full SHA-256 hex digest of some bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    hex::encode(digest)
}

/// Fixed-width name hash of a key
pub fn name_hash(key: &str) -> String {
    let mut hex = sha256_hex(key.as_bytes());
    hex.truncate(NAME_HASH_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_name_hash_fixed_width() {
        let short = name_hash("Foo");
        let long = name_hash(&"x".repeat(10_000));
        assert_eq!(short.len(), NAME_HASH_LEN);
        assert_eq!(long.len(), NAME_HASH_LEN);
        assert_eq!(short, name_hash("Foo"));
        assert_ne!(short, name_hash("Bar"));
        assert!(short.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
