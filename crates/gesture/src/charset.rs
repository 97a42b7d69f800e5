//! Active character set and digest-to-password mapping.
//!
//! The set is built in a fixed order: `A-Z`, `a-z`, then optionally the
//! digits and then optionally the special symbols. Its length is 52, 62, 76
//! or 86 depending on the flags.
//!
//! ## Mapping bias
//!
//! Each output character is `charset[byte % len]` with no rejection sampling.
//! When `len` does not divide 256 the first `256 % len` symbols are picked
//! slightly more often than the rest (for 62 symbols: 5/256 vs 4/256). This is
//! kept as-is so existing gestures keep deriving the same passwords.
//!
//! ## Periodicity
//!
//! Output position `i` uses digest byte `i % 32`. Passwords longer than the
//! digest repeat every 32 characters; length past 32 adds no entropy.

use inkpass_config::{ConfigError, DerivationConfig};

use crate::constants::{LOWER_CHARS, NUMBER_CHARS, SPECIAL_CHARS, UPPER_CHARS};

/// Ordered pool of symbols passwords are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    symbols: Vec<char>,
}

impl Charset {
    /// Build a set from an explicit symbol pool, preserving order.
    ///
    /// Returns [`ConfigError::EmptyCharset`] for an empty pool.
    pub fn from_symbols(symbols: &str) -> Result<Self, ConfigError> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty() {
            return Err(ConfigError::EmptyCharset);
        }
        Ok(Self { symbols })
    }

    /// Build the set selected by the character-class flags.
    pub fn for_flags(include_numbers: bool, include_special: bool) -> Result<Self, ConfigError> {
        let mut pool = String::with_capacity(
            UPPER_CHARS.len() + LOWER_CHARS.len() + NUMBER_CHARS.len() + SPECIAL_CHARS.len(),
        );
        pool.push_str(UPPER_CHARS);
        pool.push_str(LOWER_CHARS);
        if include_numbers {
            pool.push_str(NUMBER_CHARS);
        }
        if include_special {
            pool.push_str(SPECIAL_CHARS);
        }
        Self::from_symbols(&pool)
    }

    /// Build the set for a derivation config.
    pub fn for_config(config: &DerivationConfig) -> Result<Self, ConfigError> {
        Self::for_flags(config.include_numbers, config.include_special)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; an empty set cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.symbols.contains(&c)
    }

    /// Symbol selected by a single digest byte.
    pub fn symbol_for(&self, byte: u8) -> char {
        self.symbols[byte as usize % self.symbols.len()]
    }

    /// Map digest bytes onto a password of `length` characters.
    ///
    /// Position `i` uses `digest[i % digest.len()]`. An empty digest yields
    /// an empty string.
    pub fn map_digest(&self, digest: &[u8], length: usize) -> String {
        if digest.is_empty() {
            return String::new();
        }
        (0..length)
            .map(|i| self.symbol_for(digest[i % digest.len()]))
            .collect()
    }
}
