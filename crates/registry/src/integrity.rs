//! Content digests for downloaded registry files.

use sha2::{Digest, Sha256};

/// Name of the digest algorithm, as it appears in the manifest wire format.
///
/// Every published manifest is tied to this algorithm; changing it is a
/// format version bump, not a configuration option.
pub const HASH_ALGORITHM: &str = "sha256";

/// Length of a hex-encoded digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 of `bytes`.
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Whether `bytes` hash to `expected_hex`. Hex case is ignored.
pub fn verify(bytes: &[u8], expected_hex: &str) -> bool {
    digest(bytes).eq_ignore_ascii_case(expected_hex)
}

/// Whether `value` looks like a hex digest produced by [`digest`].
pub fn is_digest_hex(value: &str) -> bool {
    value.len() == DIGEST_HEX_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}
