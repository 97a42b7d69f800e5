//! Gesture recording for the Inkpass derivation core.
//!
//! This module provides:
//! - [`GestureRecorder`] - Thread-safe append-only trace with atomic reset
//! - [`RecorderEvent`] - Events for collaborators following the trace
//!
//! The recorder never derives anything itself. The session controller calls
//! the engine explicitly after each accepted mutation, which keeps recording
//! and derivation independently testable.

mod events;
mod trace;

pub use events::RecorderEvent;
pub use trace::GestureRecorder;
