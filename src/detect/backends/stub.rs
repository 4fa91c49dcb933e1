use anyhow::Result;

use crate::detect::backend::DetectorBackend;
use crate::detect::result::{BoundingBox, Candidate, TrackId};
use crate::frame::DecodedFrame;

/// Stub backend for tests and offline runs.
///
/// By default it synthesizes a single person-sized box that drifts
/// horizontally across the frame, so a session against a live server
/// produces non-trivial commands without any model assets. A fixed
/// candidate can be injected for deterministic tests.
pub struct StubBackend {
    tick: u64,
    fixed: Option<Candidate>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self {
            tick: 0,
            fixed: None,
        }
    }

    /// Always report exactly this candidate.
    pub fn fixed(candidate: Candidate) -> Self {
        Self {
            tick: 0,
            fixed: Some(candidate),
        }
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self, frame: &DecodedFrame) -> Result<Vec<Candidate>> {
        if let Some(candidate) = &self.fixed {
            return Ok(vec![candidate.clone()]);
        }

        let width = frame.width() as i32;
        let height = frame.height() as i32;
        let w = (width / 8).max(1);
        let h = (height / 2).max(1);
        // Sweep the box across the frame, wrapping at the right edge.
        let span = (width - w).max(1);
        let x = (self.tick as i32 * 4) % span;
        let y = (height - h) / 2;
        self.tick += 1;

        Ok(vec![
            Candidate::new(BoundingBox::new(x, y, w, h), 0.9).with_identity(TrackId(1)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_box_stays_inside_frame() {
        let frame = DecodedFrame::new(64, 48, vec![0; 64 * 48 * 3]);
        let mut backend = StubBackend::new();
        for _ in 0..100 {
            let candidates = backend.detect(&frame).unwrap();
            assert_eq!(candidates.len(), 1);
            let bbox = candidates[0].bbox;
            assert_eq!(bbox.clamp_to(64, 48), bbox);
        }
    }

    #[test]
    fn fixed_candidate_is_reported_verbatim() {
        let frame = DecodedFrame::new(64, 48, vec![0; 64 * 48 * 3]);
        let candidate = Candidate::new(BoundingBox::new(10, 6, 10, 20), 0.8);
        let mut backend = StubBackend::fixed(candidate);
        let candidates = backend.detect(&frame).unwrap();
        assert_eq!(candidates[0].bbox, BoundingBox::new(10, 6, 10, 20));
    }
}
