//! Content fingerprints of language definitions.
//!
//! A fingerprint is the SHA-256 digest of a definition's canonical JSON
//! form. Two descriptors loaded from structurally identical definitions
//! share a fingerprint regardless of TOML formatting or comments.

use sha2::{Digest, Sha256};

/// A SHA-256 hex digest identifying descriptor content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    /// Compute the fingerprint of raw bytes.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Fingerprint(hex_encode(&hasher.finalize()))
    }

    /// Get the hex string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first 12 hex digits, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_and_distinct() {
        assert_eq!(Fingerprint::compute(b"a"), Fingerprint::compute(b"a"));
        assert_ne!(Fingerprint::compute(b"a"), Fingerprint::compute(b"b"));
    }

    #[test]
    fn known_digest() {
        let fp = Fingerprint::compute(b"");
        assert_eq!(
            fp.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(fp.short(), "e3b0c44298fc");
    }
}
