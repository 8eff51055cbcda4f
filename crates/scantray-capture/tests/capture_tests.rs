//! Integration tests for the scan session workflow.

use std::time::Duration;

use scantray_capture::{
    AcquisitionError, CodeSource, ScanSession, ScriptedDetector, SessionConfig, SessionError,
    SessionStatus,
};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Config with the cooldown disabled, for tests that drive a feed.
fn no_cooldown() -> SessionConfig {
    SessionConfig::builder()
        .cooldown(Duration::ZERO)
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn scripted_feed_interleaves_with_manual_entry() {
    let detector = ScriptedDetector::new(vec![
        (ms(10), "PKG-001"),
        (ms(10), "PKG-002"),
        (ms(10), "PKG-001"), // duplicate detection, must be discarded
    ]);
    let mut session = ScanSession::open(detector, no_cooldown());
    session.begin_acquisition().await.unwrap();
    assert_eq!(session.status(), SessionStatus::Active);

    // Manual entry lands first: sources interleave into one ordered set.
    session.submit_manual("LOT-9").unwrap();

    while let Some(code) = session.next_detection().await {
        session.on_candidate_detected(&code).unwrap();
    }

    let codes = session.commit().unwrap();
    assert_eq!(codes, ["LOT-9", "PKG-001", "PKG-002"]);
    assert_eq!(session.status(), SessionStatus::Closed);
}

#[tokio::test(start_paused = true)]
async fn each_distinct_value_collected_exactly_once_in_arrival_order() {
    let detector = ScriptedDetector::new(vec![
        (ms(1), "A"),
        (ms(1), "B"),
        (ms(1), "A"),
        (ms(1), ""), // empty candidate, ignored
        (ms(1), "C"),
    ]);
    let mut session = ScanSession::open(detector, no_cooldown());
    session.begin_acquisition().await.unwrap();

    while let Some(code) = session.next_detection().await {
        session.on_candidate_detected(&code).unwrap();
    }
    assert!(matches!(
        session.submit_manual("B"),
        Err(SessionError::Validation(_))
    ));
    session.submit_manual("D").unwrap();

    assert_eq!(session.commit().unwrap(), ["A", "B", "C", "D"]);
}

#[tokio::test(start_paused = true)]
async fn cooldown_suppresses_back_to_back_detections() {
    let mut session = ScanSession::open(ScriptedDetector::idle(), SessionConfig::default());
    session.begin_acquisition().await.unwrap();

    session.on_candidate_detected("X").unwrap();
    assert_eq!(session.status(), SessionStatus::Paused);

    // Within the 1.5s window every detection is ignored, even new values.
    session.on_candidate_detected("X").unwrap();
    session.on_candidate_detected("Y").unwrap();
    assert_eq!(session.codes(), ["X"]);

    // Manual submission stays available during the cooldown.
    session.submit_manual("LOT-1").unwrap();

    tokio::time::advance(ms(1600)).await;
    assert_eq!(session.status(), SessionStatus::Active);
    session.on_candidate_detected("Y").unwrap();

    assert_eq!(session.codes(), ["X", "LOT-1", "Y"]);
}

#[tokio::test]
async fn acquisition_failure_degrades_to_manual_mode() {
    let detector = ScriptedDetector::failing(AcquisitionError::PermissionDenied);
    let mut session = ScanSession::open(detector, SessionConfig::default());

    let err = session.begin_acquisition().await.unwrap_err();
    assert_eq!(
        err,
        SessionError::Acquisition(AcquisitionError::PermissionDenied)
    );
    assert_eq!(session.status(), SessionStatus::Paused);

    // The designated fallback still works and the session commits.
    session.submit_manual("123456").unwrap();
    assert_eq!(session.commit().unwrap(), ["123456"]);
}

#[tokio::test(start_paused = true)]
async fn acquisition_timeout_reports_unknown() {
    let mut session = ScanSession::open(ScriptedDetector::never_ready(), SessionConfig::default());

    let err = session.begin_acquisition().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Acquisition(AcquisitionError::Unknown { .. })
    ));
    assert_eq!(session.status(), SessionStatus::Paused);
}

#[tokio::test(start_paused = true)]
async fn single_shot_feed_closes_after_one_value() {
    let detector = ScriptedDetector::new(vec![(ms(5), "ONLY")]);
    let mut session = ScanSession::open(detector, no_cooldown());
    session.begin_acquisition().await.unwrap();

    let code = session.next_detection().await.unwrap();
    session.on_candidate_detected(&code).unwrap();
    assert!(session.next_detection().await.is_none());

    assert_eq!(session.commit().unwrap(), ["ONLY"]);
}

#[tokio::test(start_paused = true)]
async fn cancel_releases_the_detector() {
    let detector = ScriptedDetector::new(vec![(ms(5), "A"), (ms(5), "B"), (ms(5), "C")]);
    let mut session = ScanSession::open(detector, no_cooldown());
    session.begin_acquisition().await.unwrap();

    let code = session.next_detection().await.unwrap();
    session.on_candidate_detected(&code).unwrap();

    session.cancel();
    assert_eq!(session.status(), SessionStatus::Closed);
    // The feed is gone and no candidate can be applied after closure.
    assert!(session.next_detection().await.is_none());
    assert_eq!(
        session.on_candidate_detected("B").unwrap_err(),
        SessionError::SessionClosed
    );
}

#[tokio::test(start_paused = true)]
async fn detector_ignores_codes_seeded_in_edit_mode() {
    let detector = ScriptedDetector::new(vec![(ms(1), "A"), (ms(1), "NEW")]);
    let mut session = ScanSession::open_seeded(detector, no_cooldown(), ["A", "B"]);
    session.begin_acquisition().await.unwrap();

    while let Some(code) = session.next_detection().await {
        session.on_candidate_detected(&code).unwrap();
    }

    assert_eq!(session.commit().unwrap(), ["A", "B", "NEW"]);
}

#[tokio::test(start_paused = true)]
async fn entries_record_provenance() {
    let detector = ScriptedDetector::new(vec![(ms(1), "SCANNED")]);
    let mut session = ScanSession::open(detector, no_cooldown());
    session.begin_acquisition().await.unwrap();

    while let Some(code) = session.next_detection().await {
        session.on_candidate_detected(&code).unwrap();
    }
    session.submit_manual("TYPED").unwrap();

    let sources: Vec<CodeSource> = session.entries().map(|e| e.source).collect();
    assert_eq!(sources, [CodeSource::Detector, CodeSource::Manual]);
}
