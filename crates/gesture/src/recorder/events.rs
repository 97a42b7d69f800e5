//! Events emitted by the gesture recorder.

use crate::types::CapturePoint;

/// Events emitted as the trace changes.
///
/// These let collaborators (point counters, debug overlays, loggers) follow
/// the trace without reaching into the recorder's storage.
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderEvent {
    /// A point was appended at `index` in the session identified by `epoch`.
    PointAppended {
        epoch: u64,
        index: usize,
        point: CapturePoint,
    },
    /// The trace was cleared; `epoch` is the new session id.
    TraceReset { epoch: u64, discarded: usize },
}
