//! Password derivation engine: serialize → hash → map.
//!
//! The engine is a pure function of (trace snapshot, color, config). It keeps
//! no state between calls; every derivation rehashes the whole trace.

use thiserror::Error;
use tracing::debug;

use inkpass_config::{ConfigError, DerivationConfig};

use crate::canonical::canonical_string;
use crate::charset::Charset;
use crate::digest::{DigestBackend, DigestError, Sha256Digest};
use crate::types::CapturePoint;

/// Error type for a single derivation.
///
/// A failed derivation never touches the trace or the published password.
#[derive(Debug, Error)]
pub enum DeriveError {
    #[error(transparent)]
    DigestUnavailable(#[from] DigestError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("Failed to serialize trace: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DeriveError {
    /// Stable machine-readable code for IPC error reporting
    pub fn code(&self) -> &'static str {
        match self {
            Self::DigestUnavailable(_) => "digest_unavailable",
            Self::InvalidConfig(err) => err.code(),
            Self::Serialize(_) => "serialize_failed",
        }
    }
}

/// Canonical input and character set for one derivation, before hashing.
#[derive(Debug, Clone)]
struct Prepared {
    canonical: String,
    charset: Charset,
    length: usize,
}

/// Validate the config and build the canonical string.
///
/// Returns `Ok(None)` for an empty trace.
fn prepare(points: &[CapturePoint], config: &DerivationConfig) -> Result<Option<Prepared>, DeriveError> {
    if points.is_empty() {
        debug!("derive: empty trace, nothing to do");
        return Ok(None);
    }

    config.validate()?;
    let charset = Charset::for_config(config)?;
    let canonical = canonical_string(points, &config.active_color)?;

    Ok(Some(Prepared {
        canonical,
        charset,
        length: config.length(),
    }))
}

/// Derivation engine over a digest backend.
#[derive(Debug, Clone, Default)]
pub struct DerivationEngine<D = Sha256Digest> {
    backend: D,
}

impl DerivationEngine<Sha256Digest> {
    /// Engine using in-process SHA-256.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: DigestBackend> DerivationEngine<D> {
    pub fn with_backend(backend: D) -> Self {
        Self { backend }
    }

    /// Derive the password for `points` under `config`.
    ///
    /// Returns `Ok(None)` when the trace is empty. Identical inputs always
    /// produce identical output.
    pub async fn derive(
        &self,
        points: &[CapturePoint],
        config: &DerivationConfig,
    ) -> Result<Option<String>, DeriveError> {
        let Some(prepared) = prepare(points, config)? else {
            return Ok(None);
        };

        let digest = self.backend.digest(prepared.canonical.as_bytes()).await?;
        let password = prepared.charset.map_digest(&digest, prepared.length);

        debug!(
            points = points.len(),
            length = prepared.length,
            charset = prepared.charset.len(),
            backend = self.backend.name(),
            "derived password"
        );

        Ok(Some(password))
    }
}

/// Synchronous derivation with SHA-256, for callers without an executor.
pub fn derive_password(
    points: &[CapturePoint],
    config: &DerivationConfig,
) -> Result<Option<String>, DeriveError> {
    let Some(prepared) = prepare(points, config)? else {
        return Ok(None);
    };
    let digest = Sha256Digest::digest_now(prepared.canonical.as_bytes());
    Ok(Some(prepared.charset.map_digest(&digest, prepared.length)))
}
