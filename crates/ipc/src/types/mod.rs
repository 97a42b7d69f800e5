//! Type definitions for IPC messages.

mod settings;

pub use settings::*;
