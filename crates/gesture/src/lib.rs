//! Inkpass gesture core - trace capture and password derivation
//!
//! This crate turns a freehand drawing gesture into a reproducible password:
//! - [`types::CapturePoint`] - A single (x, y, timestamp) sample of the gesture
//! - [`recorder`] - Append-only trace storage with atomic reset and event hooks
//! - [`canonical`] - Lossless, order-preserving serialization of a trace
//! - [`ink`] - Color salt normalization
//! - [`digest`] - Pluggable SHA-256 digest backend
//! - [`charset`] - Active character set and byte-to-character mapping
//! - [`engine`] - Serialize → hash → map derivation
//! - [`session`] - Controller owning recorder, config, engine and output
//!
//! The derivation is deterministic, not secret: drawing the same gesture with
//! the same ink and settings always reproduces the same password.

pub mod canonical;
pub mod charset;
pub mod constants;
pub mod digest;
pub mod engine;
pub mod ink;
pub mod recorder;
pub mod session;
pub mod types;

pub use canonical::*;
pub use charset::*;
pub use constants::*;
pub use digest::*;
pub use engine::*;
pub use ink::*;
pub use recorder::*;
pub use session::*;
pub use types::*;

pub use inkpass_config::{ConfigError, DerivationConfig};
pub use inkpass_ipc::ConfigUpdate;
