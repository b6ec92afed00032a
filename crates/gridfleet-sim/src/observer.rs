//! Tracing-backed notification observer.

use gridfleet_core::{CoordinationEvent, CoordinationObserver, EventKind};

/// Forwards coordinator events to the tracing subscriber. Rejections and
/// conflicts surface at warn, the rest at info.
pub struct TracingObserver;

impl CoordinationObserver for TracingObserver {
    fn on_event(&self, event: &CoordinationEvent) {
        match event.kind {
            EventKind::CommandRejected | EventKind::ConflictDetected => {
                tracing::warn!(drone_id = ?event.drone_id, "{}", event.message);
            }
            EventKind::ConflictResolved => {
                tracing::warn!(drone_id = ?event.drone_id, "{}", event.message);
            }
            _ => {
                tracing::info!(drone_id = ?event.drone_id, "{}", event.message);
            }
        }
    }
}
