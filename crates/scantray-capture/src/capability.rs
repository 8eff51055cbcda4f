//! The detection capability contract.

use compact_str::CompactString;
use tokio::sync::mpsc;

use scantray_core::{AcquisitionError, DetectorConfig};

/// A polymorphic source of barcode candidates.
///
/// Concrete implementations wrap a native camera view, an in-browser
/// media-stream detector, a third-party scanning library, or a scripted
/// feed for tests. A [`ScanSession`](crate::ScanSession) depends only on
/// this contract and owns its capability exclusively; which variant is
/// active is never its concern.
#[allow(async_fn_in_trait)]
pub trait DetectionCapability {
    /// Request the underlying device and begin reporting candidates.
    ///
    /// On success the returned receiver yields recognized values in
    /// detection order. The channel closing means the detector went away
    /// on its own; a single-frame still-capture detector closes it after
    /// delivering one value.
    async fn start(
        &mut self,
        config: &DetectorConfig,
    ) -> Result<mpsc::Receiver<CompactString>, AcquisitionError>;

    /// Release the underlying device.
    ///
    /// Synchronous and idempotent. No candidate may be delivered once
    /// this returns.
    fn stop(&mut self);
}
