//! Capture and reset handling for the password session

use tracing::info;

use super::{DerivationRequest, PasswordSession};

impl<D> PasswordSession<D> {
    /// Append a pointer sample and return the derivation to run for it.
    ///
    /// The request is returned even if a reset races in right after the
    /// append; publishing will then drop its result.
    pub fn on_capture(&self, x: f64, y: f64, timestamp: u64) -> DerivationRequest {
        self.recorder.append_point(x, y, timestamp);
        self.snapshot_request()
    }

    /// Append a pointer sample stamped with the current time.
    pub fn on_capture_now(&self, x: f64, y: f64) -> DerivationRequest {
        self.recorder.append_now(x, y);
        self.snapshot_request()
    }

    /// Clear the trace and the published password, starting a new session.
    ///
    /// The output lock is held across the trace reset so no result from the
    /// previous session can be published in between.
    pub fn on_reset(&self) {
        let mut output = self
            .output
            .lock()
            .expect("PasswordSession output lock poisoned");
        let discarded = self.recorder.point_count();
        let epoch = self.recorder.reset();
        output.password.clear();
        output.epoch = epoch;
        output.sequence = None;
        info!(epoch, discarded, "cleared canvas");
    }
}
