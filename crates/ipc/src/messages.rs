//! Main IPC message enums for communication between the UI and the derivation core.

use inkpass_config::DerivationConfig;
use serde::{Deserialize, Serialize};

use crate::types::ConfigUpdate;

/// Messages from the UI collaborators to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToCore {
    /// Pointer sample in canvas-intrinsic coordinates.
    ///
    /// Scaling from display pixels to the canvas grid is the sender's job.
    /// Without a timestamp the core stamps the point when it is appended.
    Capture {
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<u64>,
    },

    /// User cleared the canvas
    Reset,

    /// Any subset of the derivation settings changed
    ConfigChange(ConfigUpdate),

    /// Ask the core to re-send its current state
    Query,
}

/// Messages from the core to the UI collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CoreToUi {
    /// Trace length changed (the "points" counter)
    PointCount { count: usize },

    /// A derivation was published
    PasswordUpdated { password: String, point_count: usize },

    /// Trace and password were cleared
    Cleared,

    /// A configuration change was accepted
    ConfigApplied { config: DerivationConfig },

    /// Error notification
    Error { code: String, message: String },
}

impl CoreToUi {
    /// Build an error message from any error exposing a machine code
    pub fn error(code: &str, message: impl std::fmt::Display) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}
