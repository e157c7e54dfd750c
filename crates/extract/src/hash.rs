use std::fmt::Write;

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a document's raw bytes (64 chars).
pub fn fingerprint(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// First 12 hex chars of a fingerprint, enough to tell uploads apart in logs.
pub fn short_fingerprint(hash_hex: &str) -> &str {
    hash_hex.get(..12).unwrap_or(hash_hex)
}
