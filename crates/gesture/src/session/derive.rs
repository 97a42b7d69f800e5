//! Running derivations and publishing their results

use std::sync::atomic::Ordering;

use tracing::{debug, warn};

use inkpass_ipc::ConfigUpdate;

use crate::digest::DigestBackend;
use crate::engine::DeriveError;

use super::{DerivationRequest, DerivedPassword, PasswordSession};

impl<D> PasswordSession<D> {
    pub(crate) fn snapshot_request(&self) -> DerivationRequest {
        // Taken before the snapshot so the highest sequence always carries
        // every point appended before it
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.recorder.snapshot();
        let config = self.config();
        DerivationRequest {
            epoch: snapshot.epoch,
            sequence,
            points: snapshot.points,
            config,
        }
    }

    /// Derivation request for the current trace, or `None` if it is empty.
    pub fn request(&self) -> Option<DerivationRequest> {
        let request = self.snapshot_request();
        (!request.points.is_empty()).then_some(request)
    }

    /// Publish a derivation result.
    ///
    /// Returns whether the result was accepted.
    pub fn publish(&self, derived: DerivedPassword) -> bool {
        self.publish_with(derived, |_| {})
    }

    /// Publish a derivation result, calling `on_publish` while the output is
    /// still locked so notifications go out in publish order.
    ///
    /// A result is dropped if it belongs to a cleared session or if a newer
    /// request has already been published.
    pub fn publish_with(
        &self,
        derived: DerivedPassword,
        on_publish: impl FnOnce(&DerivedPassword),
    ) -> bool {
        let mut output = self
            .output
            .lock()
            .expect("PasswordSession output lock poisoned");
        if derived.epoch != output.epoch {
            debug!(
                stale_epoch = derived.epoch,
                epoch = output.epoch,
                sequence = derived.sequence,
                "dropping result from a cleared session"
            );
            return false;
        }
        if output.sequence.is_some_and(|last| last > derived.sequence) {
            debug!(
                sequence = derived.sequence,
                previous = output.sequence,
                "dropping result superseded by a newer request"
            );
            return false;
        }
        output.password.clone_from(&derived.password);
        output.sequence = Some(derived.sequence);
        on_publish(&derived);
        true
    }
}

impl<D: DigestBackend> PasswordSession<D> {
    /// Run a request through the engine and publish the result.
    ///
    /// Returns the published result, or `None` for an empty trace or a
    /// result that was dropped on publish.
    pub async fn run(
        &self,
        request: DerivationRequest,
    ) -> Result<Option<DerivedPassword>, DeriveError> {
        self.run_with(request, |_| {}).await
    }

    /// Like [`run`](Self::run), with a hook called under the output lock
    /// when the result is published.
    pub async fn run_with(
        &self,
        request: DerivationRequest,
        on_publish: impl FnOnce(&DerivedPassword),
    ) -> Result<Option<DerivedPassword>, DeriveError> {
        let DerivationRequest {
            epoch,
            sequence,
            points,
            config,
        } = request;

        match self.engine.derive(&points, &config).await {
            Ok(Some(password)) => {
                let derived = DerivedPassword {
                    password,
                    point_count: points.len(),
                    epoch,
                    sequence,
                };
                Ok(self
                    .publish_with(derived.clone(), on_publish)
                    .then_some(derived))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                warn!(sequence, code = err.code(), "derivation failed: {}", err);
                Err(err)
            }
        }
    }

    /// Append a sample and re-derive inline.
    pub async fn capture(
        &self,
        x: f64,
        y: f64,
        timestamp: u64,
    ) -> Result<Option<DerivedPassword>, DeriveError> {
        let request = self.on_capture(x, y, timestamp);
        self.run(request).await
    }

    /// Append a sample stamped now and re-derive inline.
    pub async fn capture_now(&self, x: f64, y: f64) -> Result<Option<DerivedPassword>, DeriveError> {
        let request = self.on_capture_now(x, y);
        self.run(request).await
    }

    /// Apply a configuration change and re-derive inline.
    pub async fn configure(
        &self,
        update: &ConfigUpdate,
    ) -> Result<Option<DerivedPassword>, DeriveError> {
        match self.on_config_change(update)? {
            Some(request) => self.run(request).await,
            None => Ok(None),
        }
    }
}
