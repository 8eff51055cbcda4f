//! Session lifecycle status.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Lifecycle state of a scan session.
///
/// Transitions: `Idle -> Acquiring -> {Active <-> Paused} -> Closed`,
/// with a direct `Idle -> Closed` edge on immediate cancel and an
/// `Acquiring -> Paused` edge when acquisition fails (manual-only mode).
/// `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Open, no acquisition attempted yet.
    Idle,
    /// Waiting for the detection capability to report readiness.
    Acquiring,
    /// Detection candidates are being accepted.
    Active,
    /// Detection suppressed: cooldown window, or acquisition failed and
    /// the session runs in manual-only mode.
    Paused,
    /// Terminal; no further mutation is permitted.
    Closed,
}

impl SessionStatus {
    /// Whether the session still accepts mutation.
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }
}
