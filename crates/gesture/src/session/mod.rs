//! Password session controller
//!
//! This module provides the session object that connects:
//! - Input handling (captures, resets, config changes from UI collaborators)
//! - Trace recording ([`GestureRecorder`])
//! - Derivation ([`DerivationEngine`])
//! - The published output slot read by the display
//!
//! Mutations and derivations are separate steps. Each mutation returns a
//! [`DerivationRequest`] carrying its own trace snapshot and config; running
//! it may suspend on the digest while further captures keep arriving. Within
//! a gesture session a result is only published if no newer request has
//! published yet, so the settled output always matches the final trace.
//! Anything computed for a session that has since been reset is dropped.

mod capture;
mod config;
mod derive;

use std::sync::atomic::AtomicU64;
use std::sync::{Mutex, RwLock};

use inkpass_config::DerivationConfig;

use crate::digest::Sha256Digest;
use crate::engine::DerivationEngine;
use crate::recorder::GestureRecorder;
use crate::types::CapturePoint;

/// Everything needed to run one derivation, captured at request time.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivationRequest {
    /// Gesture session the snapshot belongs to
    pub epoch: u64,
    /// Monotonic request id; publishes never go backwards in it
    pub sequence: u64,
    pub points: Vec<CapturePoint>,
    pub config: DerivationConfig,
}

/// A derivation result tagged with the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPassword {
    pub password: String,
    /// Length of the trace snapshot the password was derived from
    pub point_count: usize,
    pub epoch: u64,
    pub sequence: u64,
}

/// Most recently published output.
#[derive(Debug, Default)]
pub(crate) struct OutputSlot {
    pub(crate) password: String,
    /// Session the slot currently accepts results for
    pub(crate) epoch: u64,
    /// Sequence of the request that wrote `password`
    pub(crate) sequence: Option<u64>,
}

/// Session controller for one canvas.
///
/// Owns the trace, the active configuration, the engine and the output.
/// All methods take `&self`; share the session behind an `Arc` to drive it
/// from several tasks.
pub struct PasswordSession<D = Sha256Digest> {
    pub(crate) recorder: GestureRecorder,
    pub(crate) config: RwLock<DerivationConfig>,
    pub(crate) engine: DerivationEngine<D>,
    pub(crate) output: Mutex<OutputSlot>,
    pub(crate) next_sequence: AtomicU64,
}

impl<D> std::fmt::Debug for PasswordSession<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordSession")
            .field("recorder", &self.recorder)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PasswordSession<Sha256Digest> {
    /// Session using in-process SHA-256.
    pub fn new(config: DerivationConfig) -> Self {
        Self::with_engine(DerivationEngine::new(), config)
    }
}

impl Default for PasswordSession<Sha256Digest> {
    fn default() -> Self {
        Self::new(DerivationConfig::default())
    }
}

impl<D> PasswordSession<D> {
    /// Session over a custom engine.
    pub fn with_engine(engine: DerivationEngine<D>, config: DerivationConfig) -> Self {
        Self {
            recorder: GestureRecorder::new(),
            config: RwLock::new(config),
            engine,
            output: Mutex::new(OutputSlot::default()),
            next_sequence: AtomicU64::new(0),
        }
    }

    /// The underlying recorder (for event listeners and snapshots)
    pub fn recorder(&self) -> &GestureRecorder {
        &self.recorder
    }

    /// Copy of the active configuration
    pub fn config(&self) -> DerivationConfig {
        self.config
            .read()
            .expect("PasswordSession config lock poisoned")
            .clone()
    }

    /// Latest published password; empty when nothing has been derived this session.
    pub fn current_password(&self) -> String {
        self.output
            .lock()
            .expect("PasswordSession output lock poisoned")
            .password
            .clone()
    }

    /// Current trace length
    pub fn point_count(&self) -> usize {
        self.recorder.point_count()
    }

    /// Current gesture session id
    pub fn epoch(&self) -> u64 {
        self.recorder.epoch()
    }
}
