//! Configuration changes for the password session

use tracing::{info, warn};

use inkpass_config::{ConfigError, DerivationConfig};
use inkpass_ipc::ConfigUpdate;

use crate::charset::Charset;
use crate::ink::{is_known_color, normalize_color};

use super::{DerivationRequest, PasswordSession};

impl<D> PasswordSession<D> {
    /// Apply a partial configuration change.
    ///
    /// The merged config is validated before it is committed; on error the
    /// previous config stays in force. Returns the re-derivation to run, or
    /// `None` when the trace is empty.
    pub fn on_config_change(
        &self,
        update: &ConfigUpdate,
    ) -> Result<Option<DerivationRequest>, ConfigError> {
        {
            let mut config = self
                .config
                .write()
                .expect("PasswordSession config lock poisoned");
            let merged = update.apply_to(&config);
            merged.validate()?;
            Charset::for_config(&merged)?;
            log_changes(&config, &merged);
            *config = merged;
        }

        Ok(self.request())
    }

    /// Replace the whole configuration (validated like a partial change).
    pub fn set_config(
        &self,
        config: DerivationConfig,
    ) -> Result<Option<DerivationRequest>, ConfigError> {
        self.on_config_change(&ConfigUpdate {
            password_length: Some(config.password_length),
            include_numbers: Some(config.include_numbers),
            include_special: Some(config.include_special),
            active_color: Some(config.active_color),
        })
    }
}

fn log_changes(old: &DerivationConfig, new: &DerivationConfig) {
    if old.password_length != new.password_length {
        info!("Changed password_length to: {}", new.password_length);
    }
    if old.include_numbers != new.include_numbers {
        info!("Changed include_numbers to: {}", new.include_numbers);
    }
    if old.include_special != new.include_special {
        info!("Changed include_special to: {}", new.include_special);
    }
    if old.active_color != new.active_color {
        info!(
            "Changed color to: {} (salt {})",
            new.active_color,
            normalize_color(&new.active_color)
        );
        if !is_known_color(&new.active_color) {
            warn!(
                "Color {:?} is not a known name or hex value; using it verbatim as salt",
                new.active_color
            );
        }
    }
}
