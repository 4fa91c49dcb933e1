use anyhow::Result;

use crate::detect::result::Candidate;
use crate::frame::DecodedFrame;

/// Detector backend trait.
///
/// A backend wraps one person-detection model (HOG, a YOLO variant, a
/// tracking stack, ...). The pipeline treats it as a capability: given a
/// decoded image, return zero or more candidates for the subject class.
///
/// Backends that maintain cross-frame identity attach a [`TrackId`] to each
/// candidate; single-shot detectors leave `identity` empty.
///
/// A backend that cannot run (missing model weights, failed runtime init)
/// returns an error from `detect`; the pipeline surfaces this as a
/// per-frame "detector unavailable" condition rather than terminating.
///
/// [`TrackId`]: crate::detect::TrackId
pub trait DetectorBackend: Send {
    /// Backend identifier, used for registry lookup and logging.
    fn name(&self) -> &'static str;

    /// Run detection on a decoded frame.
    ///
    /// Returned candidates are already filtered to the subject class but
    /// not yet clamped to image bounds or confidence-gated.
    fn detect(&mut self, frame: &DecodedFrame) -> Result<Vec<Candidate>>;

    /// Optional warm-up hook, called once before the session loop.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for dyn DetectorBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorBackend")
            .field("name", &self.name())
            .finish()
    }
}
