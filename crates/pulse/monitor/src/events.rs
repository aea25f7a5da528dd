//! Registry lifecycle events.

use pulse_types::MonitorId;

/// Events emitted by the monitor registry.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// Monitor registered (emitted before its first poll).
    Created { monitor_id: MonitorId, target: String },

    /// A cycle completed. `new_points` is zero for empty fetches.
    Polled {
        monitor_id: MonitorId,
        new_points: usize,
        alerts: usize,
    },

    /// A cycle failed and the monitor backed off.
    PollFailed {
        monitor_id: MonitorId,
        error: String,
        next_interval_ms: u64,
    },

    Stopped(MonitorId),

    Removed(MonitorId),
}

impl MonitorEvent {
    pub fn monitor_id(&self) -> &MonitorId {
        match self {
            MonitorEvent::Created { monitor_id, .. }
            | MonitorEvent::Polled { monitor_id, .. }
            | MonitorEvent::PollFailed { monitor_id, .. } => monitor_id,
            MonitorEvent::Stopped(id) | MonitorEvent::Removed(id) => id,
        }
    }
}
