//! Scripted in-process detection capability.

use std::time::Duration;

use compact_str::CompactString;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use scantray_core::{AcquisitionError, DetectorConfig};

use crate::capability::DetectionCapability;

const FEED_CHANNEL_SIZE: usize = 32;

/// What a [`ScriptedDetector`] does when started.
#[derive(Debug, Clone)]
enum StartBehavior {
    /// Acquisition succeeds and the scripted feed plays.
    Ready,
    /// Acquisition fails with the given cause.
    Fail(AcquisitionError),
    /// Acquisition never reports readiness (exercises the timeout path).
    NeverReady,
}

/// In-process capability that replays a timed sequence of codes.
///
/// Stands in for a camera in tests and in the demo binary. A one-entry
/// script behaves like a single-frame still capture: the feed channel
/// closes after the value is delivered.
pub struct ScriptedDetector {
    script: Vec<(Duration, CompactString)>,
    behavior: StartBehavior,
    cancel: CancellationToken,
}

impl ScriptedDetector {
    /// Detector that replays `script`, waiting each entry's delay before
    /// reporting its code.
    pub fn new<I, S>(script: I) -> Self
    where
        I: IntoIterator<Item = (Duration, S)>,
        S: Into<CompactString>,
    {
        Self {
            script: script
                .into_iter()
                .map(|(delay, code)| (delay, code.into()))
                .collect(),
            behavior: StartBehavior::Ready,
            cancel: CancellationToken::new(),
        }
    }

    /// Detector that starts successfully but never reports anything.
    pub fn idle() -> Self {
        Self::new(Vec::<(Duration, CompactString)>::new())
    }

    /// Detector whose acquisition fails with `cause`.
    pub fn failing(cause: AcquisitionError) -> Self {
        Self {
            script: Vec::new(),
            behavior: StartBehavior::Fail(cause),
            cancel: CancellationToken::new(),
        }
    }

    /// Detector that never reports readiness.
    pub fn never_ready() -> Self {
        Self {
            script: Vec::new(),
            behavior: StartBehavior::NeverReady,
            cancel: CancellationToken::new(),
        }
    }
}

impl DetectionCapability for ScriptedDetector {
    async fn start(
        &mut self,
        _config: &DetectorConfig,
    ) -> Result<mpsc::Receiver<CompactString>, AcquisitionError> {
        match &self.behavior {
            StartBehavior::Fail(cause) => return Err(cause.clone()),
            StartBehavior::NeverReady => {
                // Pends until stopped; the session's acquisition timeout
                // drops this future first.
                self.cancel.cancelled().await;
                return Err(AcquisitionError::unknown(
                    "detector was stopped before it became ready",
                ));
            }
            StartBehavior::Ready => {}
        }

        // Fresh token per start so a restart after stop() replays cleanly.
        self.cancel = CancellationToken::new();
        let cancel = self.cancel.clone();
        let script = self.script.clone();
        let (tx, rx) = mpsc::channel(FEED_CHANNEL_SIZE);

        tokio::spawn(async move {
            for (delay, code) in script {
                tokio::select! {
                    // Cancellation wins over an elapsed sleep.
                    biased;
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(delay) => {}
                }
                if tx.send(code).await.is_err() {
                    return;
                }
            }
        });

        Ok(rx)
    }

    fn stop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[tokio::test(start_paused = true)]
    async fn test_replays_script_in_order() {
        let mut detector = ScriptedDetector::new(vec![(ms(5), "A"), (ms(5), "B")]);
        let mut rx = detector.start(&DetectorConfig::default()).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), "A");
        assert_eq!(rx.recv().await.unwrap(), "B");
        // Script exhausted, feed closes.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_failing_start() {
        let mut detector = ScriptedDetector::failing(AcquisitionError::PermissionDenied);
        let err = detector
            .start(&DetectorConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err, AcquisitionError::PermissionDenied);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_silences_the_feed() {
        let mut detector = ScriptedDetector::new(vec![(ms(5), "A"), (ms(5), "B")]);
        let mut rx = detector.start(&DetectorConfig::default()).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), "A");
        detector.stop();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop_replays() {
        let mut detector = ScriptedDetector::new(vec![(ms(5), "A")]);

        let mut rx = detector.start(&DetectorConfig::default()).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), "A");
        detector.stop();

        let mut rx = detector.start(&DetectorConfig::default()).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), "A");
    }
}
