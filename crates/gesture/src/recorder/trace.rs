//! Thread-safe append-only trace storage.

use std::sync::RwLock;

use tracing::{debug, trace};

use crate::types::{now_ms, CapturePoint, TraceSnapshot};

use super::events::RecorderEvent;

#[derive(Debug, Default)]
struct TraceState {
    points: Vec<CapturePoint>,
    /// Incremented on every reset
    epoch: u64,
}

/// Ordered trace of the active gesture.
///
/// Points and the session epoch live behind a single RwLock, so append and
/// reset are mutually exclusive: a snapshot never observes a half-applied
/// reset, and an append either lands before a reset (and is discarded by it)
/// or after it (and belongs to the new session).
///
/// The trace has no length cap. It grows for as long as a gesture session
/// keeps producing samples and is only released by [`reset`](Self::reset).
pub struct GestureRecorder {
    state: RwLock<TraceState>,
    /// Listeners receive cloned events after the trace lock is released.
    #[allow(clippy::type_complexity)]
    event_listeners: RwLock<Vec<Box<dyn Fn(RecorderEvent) + Send + Sync>>>,
}

impl std::fmt::Debug for GestureRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (point_count, epoch) = self
            .state
            .read()
            .map(|s| (s.points.len(), s.epoch))
            .unwrap_or((0, 0));
        let listener_count = self
            .event_listeners
            .read()
            .map(|l| l.len())
            .unwrap_or(0);
        f.debug_struct("GestureRecorder")
            .field("point_count", &point_count)
            .field("epoch", &epoch)
            .field("listener_count", &listener_count)
            .finish()
    }
}

impl Default for GestureRecorder {
    fn default() -> Self {
        Self {
            state: RwLock::new(TraceState::default()),
            event_listeners: RwLock::new(Vec::new()),
        }
    }
}

impl GestureRecorder {
    /// Create a recorder with an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point with an explicit timestamp.
    ///
    /// Returns the index of the new point. Any value is accepted.
    pub fn append_point(&self, x: f64, y: f64, timestamp: u64) -> usize {
        self.append_with(|_| CapturePoint::new(x, y, timestamp))
    }

    /// Append a point stamped with the current time.
    ///
    /// The stamp never goes backwards within a session, even if the wall
    /// clock does.
    pub fn append_now(&self, x: f64, y: f64) -> usize {
        self.append_with(|last| {
            let now = now_ms();
            let timestamp = last.map_or(now, |prev| now.max(prev.timestamp));
            CapturePoint::new(x, y, timestamp)
        })
    }

    fn append_with(&self, make: impl FnOnce(Option<&CapturePoint>) -> CapturePoint) -> usize {
        let (epoch, index, point) = {
            let mut state = self.state.write().expect("GestureRecorder lock poisoned");
            let point = make(state.points.last());
            state.points.push(point);
            (state.epoch, state.points.len() - 1, point)
        };

        trace!(epoch, index, x = point.x, y = point.y, "point appended");
        self.emit_event(RecorderEvent::PointAppended {
            epoch,
            index,
            point,
        });

        index
    }

    /// Clear the trace and start a new session.
    ///
    /// Returns the new epoch.
    pub fn reset(&self) -> u64 {
        let (epoch, discarded) = {
            let mut state = self.state.write().expect("GestureRecorder lock poisoned");
            let discarded = state.points.len();
            state.points = Vec::new();
            state.epoch += 1;
            (state.epoch, discarded)
        };

        debug!(epoch, discarded, "trace reset");
        self.emit_event(RecorderEvent::TraceReset { epoch, discarded });

        epoch
    }

    /// Copy of the current trace together with its epoch.
    pub fn snapshot(&self) -> TraceSnapshot {
        let state = self.state.read().expect("GestureRecorder lock poisoned");
        TraceSnapshot {
            epoch: state.epoch,
            points: state.points.clone(),
        }
    }

    /// Number of points in the current trace.
    pub fn point_count(&self) -> usize {
        self.state.read().expect("GestureRecorder lock poisoned").points.len()
    }

    /// Current session epoch.
    pub fn epoch(&self) -> u64 {
        self.state.read().expect("GestureRecorder lock poisoned").epoch
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Register an event listener.
    ///
    /// The listener will receive cloned events for:
    /// - `PointAppended` - after every append
    /// - `TraceReset` - after every reset
    pub fn add_event_listener<F>(&self, listener: F)
    where
        F: Fn(RecorderEvent) + Send + Sync + 'static,
    {
        let mut listeners = self
            .event_listeners
            .write()
            .expect("GestureRecorder lock poisoned");
        listeners.push(Box::new(listener));
    }

    fn emit_event(&self, event: RecorderEvent) {
        let listeners = self
            .event_listeners
            .read()
            .expect("GestureRecorder lock poisoned");
        for listener in listeners.iter() {
            listener(event.clone());
        }
    }
}
