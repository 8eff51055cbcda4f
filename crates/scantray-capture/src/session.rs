//! The scan session manager.

use compact_str::CompactString;
use indexmap::IndexMap;
use tokio::sync::mpsc;
use tokio::time::{Instant, timeout};
use tracing::{debug, warn};

use scantray_core::{
    AcquisitionError, CodeEntry, CodeSource, SessionConfig, SessionError, SessionStatus,
    ValidationError,
};

use crate::capability::DetectionCapability;

/// One open barcode-collection session.
///
/// Mediates between a detection capability, manual text entry, and the
/// caller, producing a final de-duplicated set of barcode values in
/// first-arrival order. All mutation goes through `&mut self`, which is
/// the serialization guarantee: while one candidate or manual submission
/// is being applied, nothing else can interleave.
///
/// The capability is owned by the session and released on
/// [`commit`](Self::commit), [`cancel`](Self::cancel), or drop.
pub struct ScanSession<C: DetectionCapability> {
    capability: C,
    config: SessionConfig,
    collected: IndexMap<CompactString, CodeEntry>,
    status: SessionStatus,
    cooldown_until: Option<Instant>,
    pending_manual: String,
    detections: Option<mpsc::Receiver<CompactString>>,
}

impl<C: DetectionCapability> ScanSession<C> {
    /// Open a fresh session in `Idle` state.
    pub fn open(capability: C, config: SessionConfig) -> Self {
        Self::open_seeded(capability, config, Vec::<CompactString>::new())
    }

    /// Open a session seeded with pre-existing codes (edit mode).
    ///
    /// Seeds are trimmed and de-duplicated; blank seeds are dropped.
    /// Surviving seeds are tagged [`CodeSource::Manual`].
    pub fn open_seeded<I, S>(capability: C, config: SessionConfig, existing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collected = IndexMap::new();
        for code in existing {
            let trimmed = code.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            collected
                .entry(CompactString::from(trimmed))
                .or_insert_with(|| CodeEntry::new(trimmed, CodeSource::Manual));
        }

        Self {
            capability,
            config,
            collected,
            status: SessionStatus::Idle,
            cooldown_until: None,
            pending_manual: String::new(),
            detections: None,
        }
    }

    /// Current lifecycle status.
    ///
    /// Reports `Paused` while the post-detection cooldown window is open.
    pub fn status(&self) -> SessionStatus {
        if self.status == SessionStatus::Active && self.in_cooldown() {
            SessionStatus::Paused
        } else {
            self.status
        }
    }

    /// Collected codes in first-arrival order.
    pub fn codes(&self) -> Vec<CompactString> {
        self.collected.keys().cloned().collect()
    }

    /// Collected entries with provenance, in first-arrival order.
    pub fn entries(&self) -> impl Iterator<Item = &CodeEntry> {
        self.collected.values()
    }

    /// Number of collected codes.
    pub fn len(&self) -> usize {
        self.collected.len()
    }

    /// Whether nothing has been collected yet.
    pub fn is_empty(&self) -> bool {
        self.collected.is_empty()
    }

    /// The in-progress, unsubmitted manual text value.
    pub fn pending_manual(&self) -> &str {
        &self.pending_manual
    }

    /// Replace the in-progress manual text value.
    pub fn set_pending_manual(&mut self, text: impl Into<String>) {
        self.pending_manual = text.into();
    }

    /// Request the detection capability.
    ///
    /// Allowed from `Idle` and `Paused`; a call while already `Active` is
    /// a no-op. On success the session transitions to `Active` and
    /// [`next_detection`](Self::next_detection) starts yielding values.
    /// On failure (including the acquisition timeout, reported as
    /// [`AcquisitionError::Unknown`]) the session transitions to `Paused`
    /// and remains usable through manual entry.
    pub async fn begin_acquisition(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        // Stored status, not `status()`: a cooldown pause still holds a
        // started capability and must not re-acquire it.
        if self.status == SessionStatus::Active {
            return Ok(());
        }

        self.status = SessionStatus::Acquiring;
        let started = timeout(
            self.config.acquisition_timeout,
            self.capability.start(&self.config.detector),
        )
        .await;

        match started {
            Ok(Ok(receiver)) => {
                debug!(facing = %self.config.detector.facing, "detection capability acquired");
                self.detections = Some(receiver);
                self.cooldown_until = None;
                self.status = SessionStatus::Active;
                Ok(())
            }
            Ok(Err(cause)) => {
                warn!(%cause, "acquisition failed, falling back to manual entry");
                self.capability.stop();
                self.status = SessionStatus::Paused;
                Err(cause.into())
            }
            Err(_) => {
                let cause = AcquisitionError::unknown(
                    "detection capability did not report readiness in time",
                );
                warn!(%cause, "acquisition timed out, falling back to manual entry");
                self.capability.stop();
                self.status = SessionStatus::Paused;
                Err(cause.into())
            }
        }
    }

    /// Wait for the next value reported by the active detector.
    ///
    /// Resolves to `None` when no detector is installed or its feed has
    /// closed. The value is not applied automatically; pass it to
    /// [`on_candidate_detected`](Self::on_candidate_detected) so every
    /// mutation stays on the single `&mut self` path.
    pub async fn next_detection(&mut self) -> Option<CompactString> {
        match self.detections.as_mut() {
            Some(receiver) => receiver.recv().await,
            None => None,
        }
    }

    /// Apply a candidate reported by the detection capability.
    ///
    /// Empty candidates, values already collected, and candidates arriving
    /// while the session is not `Active` (including the cooldown window)
    /// are ignored. Accepting a candidate opens the cooldown window.
    pub fn on_candidate_detected(&mut self, code: &str) -> Result<(), SessionError> {
        self.ensure_open()?;
        if code.is_empty() {
            return Ok(());
        }
        if self.status() != SessionStatus::Active {
            debug!(code, status = %self.status(), "candidate ignored");
            return Ok(());
        }
        if self.collected.contains_key(code) {
            debug!(code, "duplicate candidate ignored");
            return Ok(());
        }

        self.accept(code, CodeSource::Detector);
        if !self.config.cooldown.is_zero() {
            self.cooldown_until = Some(Instant::now() + self.config.cooldown);
        }
        Ok(())
    }

    /// Submit a manually entered barcode.
    ///
    /// Trims the input; rejects blank and duplicate values. Available in
    /// every non-closed status: this is the designated fallback when
    /// acquisition failed. Manual acceptance does not open the cooldown
    /// window.
    pub fn submit_manual(&mut self, text: &str) -> Result<(), SessionError> {
        self.ensure_open()?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty.into());
        }
        if self.collected.contains_key(trimmed) {
            return Err(ValidationError::Duplicate {
                code: trimmed.into(),
            }
            .into());
        }

        self.accept(trimmed, CodeSource::Manual);
        self.pending_manual.clear();
        Ok(())
    }

    /// Submit the in-progress manual text value.
    ///
    /// On rejection the pending value is left in place so the user can
    /// correct it.
    pub fn submit_pending(&mut self) -> Result<(), SessionError> {
        let text = std::mem::take(&mut self.pending_manual);
        match self.submit_manual(&text) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.pending_manual = text;
                Err(err)
            }
        }
    }

    /// Remove and return the collected code at `index`, preserving the
    /// relative order of the rest. Does not affect session status.
    pub fn remove(&mut self, index: usize) -> Result<CompactString, SessionError> {
        self.ensure_open()?;
        let len = self.collected.len();
        let (code, _) = self
            .collected
            .shift_remove_index(index)
            .ok_or(SessionError::IndexOutOfBounds { index, len })?;
        debug!(%code, "code removed");
        Ok(code)
    }

    /// Finalize the session and hand the collected codes to the caller.
    ///
    /// Fails with [`SessionError::EmptyCommit`] if nothing was collected;
    /// the session then stays open. Otherwise the capability is released
    /// before returning and the session transitions to `Closed`.
    pub fn commit(&mut self) -> Result<Vec<CompactString>, SessionError> {
        self.ensure_open()?;
        if self.collected.is_empty() {
            return Err(SessionError::EmptyCommit);
        }

        self.release();
        self.status = SessionStatus::Closed;
        let codes = self.codes();
        debug!(count = codes.len(), "session committed");
        Ok(codes)
    }

    /// Discard the session without returning a value.
    ///
    /// Releases the capability and transitions to `Closed`. Idempotent:
    /// cancelling an already-closed session is a no-op, so drop-driven
    /// teardown and an explicit user cancel can both run safely.
    pub fn cancel(&mut self) {
        if self.status == SessionStatus::Closed {
            return;
        }
        self.release();
        self.status = SessionStatus::Closed;
        debug!("session cancelled");
    }

    fn accept(&mut self, code: &str, source: CodeSource) {
        debug!(code, %source, "barcode accepted");
        self.collected
            .insert(CompactString::from(code), CodeEntry::new(code, source));
    }

    fn in_cooldown(&self) -> bool {
        self.cooldown_until
            .is_some_and(|until| Instant::now() < until)
    }

    fn release(&mut self) {
        // Dropping the receiver before stop() guarantees nothing queued
        // can still be pulled after closure.
        self.detections = None;
        self.capability.stop();
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.status == SessionStatus::Closed {
            Err(SessionError::SessionClosed)
        } else {
            Ok(())
        }
    }
}

impl<C: DetectionCapability> Drop for ScanSession<C> {
    fn drop(&mut self) {
        if self.status != SessionStatus::Closed {
            self.release();
        }
    }
}
