//! Session controller - turns UI messages into session mutations and
//! schedules the resulting derivations.
//!
//! In [`DeriveMode::Coalesce`] requests go through a `watch` slot read by a
//! single worker task: bursts of captures collapse to the newest request and
//! results are published in order. In [`DeriveMode::Concurrent`] each request
//! is spawned on its own; a result that finishes after a newer one has been
//! published is dropped.

use std::sync::Arc;

use gesture::{DerivationRequest, PasswordSession, RecorderEvent};
use inkpass_ipc::{CoreToUi, UiToCore};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::DeriveMode;

/// Sender half of the outgoing message stream
pub type Outbox = mpsc::UnboundedSender<CoreToUi>;

pub struct Controller {
    session: Arc<PasswordSession>,
    mode: DeriveMode,
    requests: watch::Sender<Option<DerivationRequest>>,
    outbox: Outbox,
}

impl Controller {
    /// Create a controller and, in coalescing mode, start its worker.
    ///
    /// Point counter updates are pushed to the outbox from the recorder's
    /// event hooks. Must be called from within a tokio runtime.
    pub fn spawn(
        session: Arc<PasswordSession>,
        mode: DeriveMode,
        outbox: Outbox,
    ) -> (Self, Option<JoinHandle<()>>) {
        let counter = outbox.clone();
        session.recorder().add_event_listener(move |event| {
            let count = match event {
                RecorderEvent::PointAppended { index, .. } => index + 1,
                RecorderEvent::TraceReset { .. } => 0,
            };
            let _ = counter.send(CoreToUi::PointCount { count });
        });

        let (requests, slot) = watch::channel(None);
        let worker = match mode {
            DeriveMode::Coalesce => Some(tokio::spawn(derive_worker(
                Arc::clone(&session),
                slot,
                outbox.clone(),
            ))),
            DeriveMode::Concurrent => None,
        };

        info!("Controller started in {:?} mode", mode);

        (
            Self {
                session,
                mode,
                requests,
                outbox,
            },
            worker,
        )
    }

    pub fn session(&self) -> &Arc<PasswordSession> {
        &self.session
    }

    /// Handle one message from the UI.
    pub fn handle(&self, message: UiToCore) {
        match message {
            UiToCore::Capture { x, y, timestamp } => {
                let request = match timestamp {
                    Some(timestamp) => self.session.on_capture(x, y, timestamp),
                    None => self.session.on_capture_now(x, y),
                };
                self.dispatch(request);
            }
            UiToCore::Reset => {
                self.session.on_reset();
                // Anything still queued belongs to the old gesture
                self.requests.send_replace(None);
                self.send(CoreToUi::Cleared);
            }
            UiToCore::ConfigChange(update) => match self.session.on_config_change(&update) {
                Ok(request) => {
                    self.send(CoreToUi::ConfigApplied {
                        config: self.session.config(),
                    });
                    if let Some(request) = request {
                        self.dispatch(request);
                    }
                }
                Err(err) => self.send(CoreToUi::error(err.code(), &err)),
            },
            UiToCore::Query => {
                self.send(CoreToUi::PointCount {
                    count: self.session.point_count(),
                });
                self.send(CoreToUi::PasswordUpdated {
                    password: self.session.current_password(),
                    point_count: self.session.point_count(),
                });
            }
        }
    }

    /// Report a message that could not be decoded.
    pub fn report(&self, message: CoreToUi) {
        self.send(message);
    }

    fn dispatch(&self, request: DerivationRequest) {
        debug!(sequence = request.sequence, points = request.points.len(), "dispatch");
        match self.mode {
            DeriveMode::Coalesce => {
                self.requests.send_replace(Some(request));
            }
            DeriveMode::Concurrent => {
                let session = Arc::clone(&self.session);
                let outbox = self.outbox.clone();
                tokio::spawn(async move {
                    run_and_report(&session, &outbox, request).await;
                });
            }
        }
    }

    fn send(&self, message: CoreToUi) {
        let _ = self.outbox.send(message);
    }
}

/// Single-slot worker: always runs the newest pending request.
async fn derive_worker(
    session: Arc<PasswordSession>,
    mut slot: watch::Receiver<Option<DerivationRequest>>,
    outbox: Outbox,
) {
    while slot.changed().await.is_ok() {
        let request = slot.borrow_and_update().clone();
        if let Some(request) = request {
            run_and_report(&session, &outbox, request).await;
        }
    }
    debug!("derive worker stopped");
}

async fn run_and_report(session: &PasswordSession, outbox: &Outbox, request: DerivationRequest) {
    // Sent under the session's output lock so updates leave in publish order
    let published = session.run_with(request, |derived| {
        let _ = outbox.send(CoreToUi::PasswordUpdated {
            password: derived.password.clone(),
            point_count: derived.point_count,
        });
    });
    if let Err(err) = published.await {
        let _ = outbox.send(CoreToUi::error(err.code(), &err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesture::DerivationConfig;
    use inkpass_ipc::ConfigUpdate;
    use std::time::Duration;

    fn session(length: u32) -> Arc<PasswordSession> {
        Arc::new(PasswordSession::new(DerivationConfig {
            password_length: length,
            ..Default::default()
        }))
    }

    /// Read messages until one matches, failing after a timeout.
    async fn expect_message(
        rx: &mut mpsc::UnboundedReceiver<CoreToUi>,
        mut matches: impl FnMut(&CoreToUi) -> bool,
    ) -> CoreToUi {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let message = rx.recv().await.expect("outbox closed");
                if matches(&message) {
                    return message;
                }
            }
        })
        .await
        .expect("timed out waiting for message")
    }

    fn capture(x: f64, y: f64, timestamp: u64) -> UiToCore {
        UiToCore::Capture {
            x,
            y,
            timestamp: Some(timestamp),
        }
    }

    #[tokio::test]
    async fn test_coalesced_captures_settle_on_final_trace() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (controller, _worker) = Controller::spawn(session(8), DeriveMode::Coalesce, tx);

        controller.handle(capture(0.0, 0.0, 1000));
        controller.handle(capture(12.5, 3.0, 1016));

        let message = expect_message(&mut rx, |m| {
            matches!(m, CoreToUi::PasswordUpdated { point_count: 2, .. })
        })
        .await;
        assert_eq!(
            message,
            CoreToUi::PasswordUpdated {
                password: "HcUBccnl".to_string(),
                point_count: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_concurrent_mode_publishes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (controller, worker) = Controller::spawn(session(8), DeriveMode::Concurrent, tx);
        assert!(worker.is_none());

        controller.handle(capture(0.0, 0.0, 1000));
        let message =
            expect_message(&mut rx, |m| matches!(m, CoreToUi::PasswordUpdated { .. })).await;
        assert_eq!(
            message,
            CoreToUi::PasswordUpdated {
                password: "mrtlDszD".to_string(),
                point_count: 1,
            }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_mode_settles_on_final_trace() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (controller, _worker) = Controller::spawn(session(8), DeriveMode::Concurrent, tx);

        controller.handle(capture(0.0, 0.0, 1000));
        controller.handle(capture(12.5, 3.0, 1016));

        expect_message(&mut rx, |m| {
            matches!(m, CoreToUi::PasswordUpdated { point_count: 2, .. })
        })
        .await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Nothing older may be reported once the final trace has published
        while let Ok(message) = rx.try_recv() {
            assert!(
                !matches!(message, CoreToUi::PasswordUpdated { point_count: 1, .. }),
                "stale update after final: {:?}",
                message
            );
        }
        assert_eq!(controller.session().current_password(), "HcUBccnl");
    }

    #[tokio::test]
    async fn test_point_counter_follows_trace() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (controller, _worker) = Controller::spawn(session(8), DeriveMode::Coalesce, tx);

        controller.handle(capture(1.0, 1.0, 1));
        assert_eq!(
            expect_message(&mut rx, |m| matches!(m, CoreToUi::PointCount { .. })).await,
            CoreToUi::PointCount { count: 1 }
        );

        controller.handle(UiToCore::Reset);
        assert_eq!(
            expect_message(&mut rx, |m| matches!(m, CoreToUi::PointCount { count: 0 })).await,
            CoreToUi::PointCount { count: 0 }
        );
        expect_message(&mut rx, |m| matches!(m, CoreToUi::Cleared)).await;
        assert_eq!(controller.session().current_password(), "");
    }

    #[tokio::test]
    async fn test_config_change_rederives() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (controller, _worker) = Controller::spawn(session(8), DeriveMode::Coalesce, tx);

        controller.handle(capture(0.0, 0.0, 1000));
        expect_message(&mut rx, |m| matches!(m, CoreToUi::PasswordUpdated { .. })).await;

        controller.handle(UiToCore::ConfigChange(ConfigUpdate {
            include_numbers: Some(true),
            ..Default::default()
        }));
        match expect_message(&mut rx, |m| matches!(m, CoreToUi::ConfigApplied { .. })).await {
            CoreToUi::ConfigApplied { config } => assert!(config.include_numbers),
            other => panic!("Expected ConfigApplied, got {:?}", other),
        }
        assert_eq!(
            expect_message(&mut rx, |m| matches!(m, CoreToUi::PasswordUpdated { .. })).await,
            CoreToUi::PasswordUpdated {
                password: "8hZ7jOz3".to_string(),
                point_count: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_config_reports_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (controller, _worker) = Controller::spawn(session(8), DeriveMode::Coalesce, tx);

        controller.handle(UiToCore::ConfigChange(ConfigUpdate {
            password_length: Some(0),
            ..Default::default()
        }));
        match expect_message(&mut rx, |m| matches!(m, CoreToUi::Error { .. })).await {
            CoreToUi::Error { code, .. } => assert_eq!(code, "invalid_length"),
            other => panic!("Expected Error, got {:?}", other),
        }
        assert_eq!(controller.session().config().password_length, 8);
    }

    #[tokio::test]
    async fn test_query_reports_current_state() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (controller, _worker) = Controller::spawn(session(8), DeriveMode::Coalesce, tx);

        controller.handle(UiToCore::Query);
        assert_eq!(
            expect_message(&mut rx, |m| matches!(m, CoreToUi::PasswordUpdated { .. })).await,
            CoreToUi::PasswordUpdated {
                password: String::new(),
                point_count: 0,
            }
        );
    }
}
