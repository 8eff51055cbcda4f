//! Barcode capture session management for scantray.
//!
//! This crate owns the lifecycle of one barcode-collection session:
//! acquiring a detection capability, accumulating unique codes from
//! automatic detection and manual entry, and committing the final set.
//!
//! # Overview
//!
//! A [`ScanSession`] mediates between a [`DetectionCapability`], manual
//! text entry, and the caller. Key properties:
//!
//! - **De-duplicated accumulation**: each distinct value appears exactly
//!   once, in first-arrival order, across both sources.
//! - **Manual fallback**: acquisition failure is never terminal; the
//!   session degrades to manual-only entry and can still commit.
//! - **Cooldown**: a configurable suppression window after each automatic
//!   detection throttles re-detection of the code still in front of the
//!   camera.
//! - **Scoped acquisition**: the capability is owned by the session and
//!   released on commit, cancel, or drop.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use scantray_capture::{ScanSession, ScriptedDetector, SessionConfig, SessionError};
//!
//! # async fn demo() -> Result<(), SessionError> {
//! let detector = ScriptedDetector::new(vec![
//!     (Duration::from_millis(300), "PKG-0001"),
//!     (Duration::from_millis(300), "PKG-0002"),
//! ]);
//! let mut session = ScanSession::open(detector, SessionConfig::default());
//!
//! if let Err(err) = session.begin_acquisition().await {
//!     // Degraded to manual-only mode; the session is still usable.
//!     eprintln!("camera unavailable: {err}");
//! }
//!
//! session.submit_manual("LOT-42")?;
//! while let Some(code) = session.next_detection().await {
//!     session.on_candidate_detected(&code)?;
//! }
//!
//! let codes = session.commit()?;
//! println!("collected {} codes", codes.len());
//! # Ok(())
//! # }
//! ```

mod capability;
mod scripted;
mod session;

pub use capability::DetectionCapability;
pub use scripted::ScriptedDetector;
pub use session::ScanSession;

// Re-export core types for convenience
pub use scantray_core::{
    AcquisitionError, CodeEntry, CodeSource, DetectorConfig, Facing, SessionConfig, SessionError,
    SessionStatus, Symbology, ValidationError,
};
