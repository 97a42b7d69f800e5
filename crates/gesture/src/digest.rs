//! Digest backends used to compress the canonical trace.

use sha2::{Digest, Sha256};
use thiserror::Error;

use inkpass_config::DIGEST_LEN;

/// Fixed-size digest output
pub type DigestBytes = [u8; DIGEST_LEN];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    /// The host cannot run the digest primitive.
    #[error("Digest primitive unavailable: {0}")]
    Unavailable(String),
}

/// Trait for digest backends.
///
/// The digest is the only step of a derivation that may suspend. The future
/// must be `Send` so derivations can run on a multi-threaded runtime.
pub trait DigestBackend: Send + Sync {
    /// Hash `data` into 32 bytes.
    fn digest(&self, data: &[u8]) -> impl Future<Output = Result<DigestBytes, DigestError>> + Send;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// SHA-256 computed in-process with the `sha2` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl Sha256Digest {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous SHA-256 over `data`.
    pub fn digest_now(data: &[u8]) -> DigestBytes {
        Sha256::digest(data).into()
    }
}

impl DigestBackend for Sha256Digest {
    async fn digest(&self, data: &[u8]) -> Result<DigestBytes, DigestError> {
        Ok(Self::digest_now(data))
    }

    fn name(&self) -> &'static str {
        "sha256"
    }
}
