use serde::{Deserialize, Serialize};

/// One recorded instant of the gesture.
///
/// Coordinates are canvas-local and already scaled to the canvas pixel grid.
/// Points are never clamped, so a collaborator may report positions outside
/// the visible canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapturePoint {
    pub x: f64,
    pub y: f64,
    /// Milliseconds since an arbitrary monotonic epoch
    pub timestamp: u64,
}

impl CapturePoint {
    pub fn new(x: f64, y: f64, timestamp: u64) -> Self {
        Self { x, y, timestamp }
    }
}

/// Immutable copy of the trace taken at a single instant.
///
/// `epoch` identifies the gesture session the points belong to; it changes
/// on every reset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceSnapshot {
    pub epoch: u64,
    pub points: Vec<CapturePoint>,
}

impl TraceSnapshot {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
