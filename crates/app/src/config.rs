//! Application configuration and derivation scheduling mode

use inkpass_config::{parse_flag, DerivationConfig};

/// How derivation requests are scheduled onto the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeriveMode {
    /// Single-slot worker: only the latest pending request is kept and
    /// derivations run one at a time (default)
    #[default]
    Coalesce,
    /// One task per request; results race and the last to finish wins
    Concurrent,
}

impl DeriveMode {
    /// Parse from environment variable INKPASS_COALESCE
    pub fn from_env() -> Self {
        Self::from_value(std::env::var("INKPASS_COALESCE").ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        match value.and_then(parse_flag) {
            Some(false) => Self::Concurrent,
            Some(true) | None => Self::Coalesce,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct InkpassConfig {
    pub derive_mode: DeriveMode,
    /// Enable debug logging (INKPASS_DEBUG)
    pub debug: bool,
    /// Initial derivation settings
    pub derivation: DerivationConfig,
}

impl Default for InkpassConfig {
    fn default() -> Self {
        Self {
            derive_mode: DeriveMode::from_env(),
            debug: std::env::var("INKPASS_DEBUG")
                .ok()
                .and_then(|raw| parse_flag(&raw))
                .unwrap_or(false),
            derivation: DerivationConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_mode_parsing() {
        assert_eq!(DeriveMode::from_value(None), DeriveMode::Coalesce);
        assert_eq!(DeriveMode::from_value(Some("1")), DeriveMode::Coalesce);
        assert_eq!(DeriveMode::from_value(Some("off")), DeriveMode::Concurrent);
        assert_eq!(DeriveMode::from_value(Some("nonsense")), DeriveMode::Coalesce);
    }
}
