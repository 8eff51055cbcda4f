//! Error types for scan sessions.

use compact_str::CompactString;
use thiserror::Error;

/// Why a detection capability could not be acquired.
///
/// Acquisition failure is never terminal for a session: it degrades to
/// manual-only entry and can still commit once at least one code is
/// collected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AcquisitionError {
    /// The user or the platform denied camera access.
    #[error("Camera permission denied")]
    PermissionDenied,

    /// No capture device is present.
    #[error("No capture device available")]
    DeviceUnavailable,

    /// The capture device is held by another consumer.
    #[error("Capture device is busy")]
    DeviceBusy,

    /// The platform cannot run barcode detection at all.
    #[error("Barcode detection is not supported on this device")]
    Unsupported,

    /// Anything else, including an acquisition timeout.
    #[error("Could not start detection: {message}")]
    Unknown { message: String },
}

impl AcquisitionError {
    /// Create an `Unknown` error carrying a human-readable cause.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }
}

/// Rejection reasons for manual barcode entry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The trimmed input was empty.
    #[error("Barcode must not be empty")]
    Empty,

    /// The value is already in the collected set.
    #[error("Barcode already collected: {code}")]
    Duplicate { code: CompactString },
}

/// Errors reported by a scan session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The detection capability could not be acquired.
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// Manual input was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `remove` was called with an out-of-range index.
    #[error("Index {index} out of bounds ({len} codes collected)")]
    IndexOutOfBounds { index: usize, len: usize },

    /// `commit` was called with nothing collected.
    #[error("Cannot commit an empty session")]
    EmptyCommit,

    /// The session is closed; no further mutation is permitted.
    #[error("Session is closed")]
    SessionClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquisition_error_display() {
        let err = AcquisitionError::PermissionDenied;
        assert_eq!(err.to_string(), "Camera permission denied");

        let err = AcquisitionError::unknown("detector crashed");
        assert!(err.to_string().contains("detector crashed"));
    }

    #[test]
    fn test_session_error_wraps_causes() {
        let err: SessionError = AcquisitionError::DeviceBusy.into();
        assert!(matches!(
            err,
            SessionError::Acquisition(AcquisitionError::DeviceBusy)
        ));

        let err: SessionError = ValidationError::Empty.into();
        assert_eq!(err.to_string(), "Barcode must not be empty");
    }
}
