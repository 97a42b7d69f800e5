//! Derivation settings carried over IPC.

use inkpass_config::DerivationConfig;
use serde::{Deserialize, Serialize};

/// Partial update of the derivation settings.
///
/// Every field is optional; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_numbers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_special: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_color: Option<String>,
}

impl ConfigUpdate {
    /// True if the update carries no field at all
    pub fn is_empty(&self) -> bool {
        self.password_length.is_none()
            && self.include_numbers.is_none()
            && self.include_special.is_none()
            && self.active_color.is_none()
    }

    /// Merge this update over `base`, returning the resulting config.
    ///
    /// The result is not validated here.
    pub fn apply_to(&self, base: &DerivationConfig) -> DerivationConfig {
        DerivationConfig {
            password_length: self.password_length.unwrap_or(base.password_length),
            include_numbers: self.include_numbers.unwrap_or(base.include_numbers),
            include_special: self.include_special.unwrap_or(base.include_special),
            active_color: self
                .active_color
                .clone()
                .unwrap_or_else(|| base.active_color.clone()),
        }
    }
}
