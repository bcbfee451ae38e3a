//! SHA-256 digests and digest verification

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::{fs::File, io::AsyncReadExt};
use tracing::{debug, instrument};

use crate::error::Result;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Result of comparing a document against a reference digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResponse {
    pub matches: bool,
    pub computed_digest: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegrityHasher;

impl IntegrityHasher {
    pub fn new() -> Self {
        Self
    }

    /// Lowercase hex SHA-256 of `bytes`.
    pub fn digest(&self, bytes: &[u8]) -> String {
        hex::encode(Sha256::digest(bytes))
    }

    /// Recomputes the digest of `bytes` and compares it with `reference`.
    /// Surrounding whitespace and hex case in `reference` are ignored.
    pub fn verify(&self, bytes: &[u8], reference: &str) -> VerificationResponse {
        let computed_digest = self.digest(bytes);
        let matches = computed_digest.eq_ignore_ascii_case(reference.trim());
        debug!("Digest {} vs reference {}: {}", computed_digest, reference.trim(), matches);
        VerificationResponse { matches, computed_digest }
    }

    /// Streams a file through the hasher without loading it whole.
    #[instrument(skip(self, path), fields(file = %path.as_ref().display()))]
    pub async fn digest_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let mut file = File::open(path.as_ref()).await?;
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        let mut total = 0u64;

        loop {
            let n = file.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
            total += n as u64;
        }

        debug!("Hashed {} bytes", total);
        Ok(hex::encode(hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            IntegrityHasher::new().digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_is_stable_and_sensitive() {
        let hasher = IntegrityHasher::new();
        let a = b"%PDF-1.7 sample".to_vec();
        let mut b = a.clone();
        b[5] ^= 0x01;

        assert_eq!(hasher.digest(&a), hasher.digest(&a));
        assert_ne!(hasher.digest(&a), hasher.digest(&b));
        assert_eq!(hasher.digest(&a).len(), 64);
        assert!(hasher.digest(&a).chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_verify_ignores_case_and_whitespace() {
        let hasher = IntegrityHasher::new();
        let reference = format!("  {}\n", hasher.digest(b"doc").to_uppercase());

        let outcome = hasher.verify(b"doc", &reference);
        assert!(outcome.matches);
        assert_eq!(outcome.computed_digest, hasher.digest(b"doc"));

        assert!(!hasher.verify(b"doc!", &reference).matches);
    }
}
