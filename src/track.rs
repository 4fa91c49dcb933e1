//! Cross-frame track state and dropout smoothing.
//!
//! A single detection dropout must not make the agent stop dead, so the
//! pipeline keeps the last accepted box and "coasts" on it while the
//! current frame yields no qualifying candidate. The state is owned by one
//! pipeline instance for the lifetime of a session and is never shared.

use crate::detect::{BoundingBox, Candidate, TrackId};

/// Mutable per-session tracking state.
#[derive(Debug, Default)]
pub struct TrackState {
    /// Box from the most recent frame with a qualifying candidate.
    pub last_accepted: Option<BoundingBox>,
    /// Identity locked by the identity-lock strategy, once acquired.
    pub locked_identity: Option<TrackId>,
    /// Consecutive frames served from `last_accepted` without a fresh
    /// acceptance.
    coast_frames: u32,
}

impl TrackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coast_frames(&self) -> u32 {
        self.coast_frames
    }
}

/// Resolves the per-frame selection against retained state.
#[derive(Debug, Clone, Copy)]
pub struct Smoother {
    /// Coast at most this many consecutive frames on a stale box.
    /// `None` coasts indefinitely, matching the behavior the simulator was
    /// tuned against.
    max_coast_frames: Option<u32>,
}

impl Smoother {
    pub fn new(max_coast_frames: Option<u32>) -> Self {
        Self { max_coast_frames }
    }

    /// Pick the box to steer by this frame.
    ///
    /// A fresh selection overwrites the retained box and resets the coast
    /// counter. With no selection the retained box is returned unchanged,
    /// until the optional coast bound expires it. With neither, the caller
    /// emits the neutral command.
    pub fn resolve(
        &self,
        selected: Option<&Candidate>,
        state: &mut TrackState,
    ) -> Option<BoundingBox> {
        if let Some(candidate) = selected {
            state.last_accepted = Some(candidate.bbox);
            state.coast_frames = 0;
            return Some(candidate.bbox);
        }
        let stale = state.last_accepted?;
        if let Some(limit) = self.max_coast_frames {
            if state.coast_frames >= limit {
                log::debug!("coast limit of {} frames reached, dropping stale box", limit);
                state.last_accepted = None;
                return None;
            }
        }
        state.coast_frames += 1;
        Some(stale)
    }
}
