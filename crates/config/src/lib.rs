//! Shared configuration for Inkpass
//!
//! This crate is the single source of truth for the settings that shape a
//! derived password: output length, optional character classes and the ink
//! color used as salt. The UI collaborators mutate a [`DerivationConfig`];
//! the derivation engine only ever reads it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of bytes produced by the digest (SHA-256)
pub const DIGEST_LEN: usize = 32;

/// Default password length in characters
pub const DEFAULT_PASSWORD_LENGTH: u32 = 16;

/// Shortest accepted password
pub const MIN_PASSWORD_LENGTH: u32 = 1;

/// Longest accepted password.
///
/// Anything past [`DIGEST_LEN`] characters reuses digest bytes cyclically, so
/// longer passwords repeat with period 32 rather than gaining entropy.
pub const MAX_PASSWORD_LENGTH: u32 = 128;

/// Default ink color
pub const DEFAULT_COLOR: &str = "black";

/// Errors produced when a configuration cannot be used for derivation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Password length must be at least {}", MIN_PASSWORD_LENGTH)]
    ZeroLength,
    #[error("Password length {length} exceeds maximum of {max}")]
    LengthOutOfRange { length: u32, max: u32 },
    #[error("Character set is empty")]
    EmptyCharset,
}

impl ConfigError {
    /// Stable machine-readable code for IPC error reporting
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZeroLength | Self::LengthOutOfRange { .. } => "invalid_length",
            Self::EmptyCharset => "empty_charset",
        }
    }
}

/// Settings affecting derivation output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationConfig {
    /// Number of characters in the derived password
    pub password_length: u32,
    /// Append the ten decimal digits to the character set
    pub include_numbers: bool,
    /// Append the special symbols to the character set
    pub include_special: bool,
    /// Ink color identifier, hashed as salt after the trace
    pub active_color: String,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            password_length: DEFAULT_PASSWORD_LENGTH,
            include_numbers: false,
            include_special: false,
            active_color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl DerivationConfig {
    /// Build a config from defaults overridden by `INKPASS_*` environment variables.
    ///
    /// Recognized: `INKPASS_LENGTH`, `INKPASS_NUMBERS`, `INKPASS_SPECIAL`,
    /// `INKPASS_COLOR`. Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("INKPASS_LENGTH") {
            match raw.trim().parse::<u32>() {
                Ok(length) => config.password_length = length,
                Err(_) => tracing::warn!("Ignoring INKPASS_LENGTH={:?}: not a number", raw),
            }
        }
        if let Some(flag) = lookup("INKPASS_NUMBERS").and_then(|raw| parse_flag(&raw)) {
            config.include_numbers = flag;
        }
        if let Some(flag) = lookup("INKPASS_SPECIAL").and_then(|raw| parse_flag(&raw)) {
            config.include_special = flag;
        }
        if let Some(color) = lookup("INKPASS_COLOR") {
            if !color.trim().is_empty() {
                config.active_color = color;
            }
        }

        config
    }

    /// Check the length bounds.
    ///
    /// Character-set emptiness is checked by the engine when the set is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_length(self.password_length)
    }

    /// Password length as a `usize` for indexing
    pub fn length(&self) -> usize {
        self.password_length as usize
    }
}

/// Validate a password length against [`MIN_PASSWORD_LENGTH`]..=[`MAX_PASSWORD_LENGTH`]
pub fn validate_length(length: u32) -> Result<(), ConfigError> {
    if length < MIN_PASSWORD_LENGTH {
        return Err(ConfigError::ZeroLength);
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(ConfigError::LengthOutOfRange {
            length,
            max: MAX_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Parse a boolean environment flag (`1/0`, `true/false`, `yes/no`, `on/off`)
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            tracing::warn!("Ignoring unrecognized flag value {:?}", other);
            None
        }
    }
}
