//! Per-frame target selection strategies.
//!
//! At most one candidate survives each frame. Selection failure is not an
//! error: it tells the smoother to coast on the previous box or, lacking
//! one, the session to answer with the neutral command.

use crate::config::StrategyKind;
use crate::detect::Candidate;
use crate::frame::DecodedFrame;
use crate::track::TrackState;

/// Inclusive HSV range in the OpenCV convention: hue in `0..=180`,
/// saturation and value in `0..=255`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    /// The green band the reference followers track.
    pub fn green() -> Self {
        Self {
            lower: [40, 50, 50],
            upper: [80, 255, 255],
        }
    }

    fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| self.lower[i] <= hsv[i] && hsv[i] <= self.upper[i])
    }
}

/// Target-selection strategy, fixed at session construction.
#[derive(Clone, Debug)]
pub enum SelectionStrategy {
    /// Highest detector confidence; ties keep the earlier candidate.
    BestConfidence,
    /// Highest fraction of box pixels inside `range`; the whole frame is
    /// rejected when the best fraction is below `threshold`.
    BestColorOverlap { range: HsvRange, threshold: f64 },
    /// Lock onto the identity of the first confirmed candidate and ignore
    /// every other identity from then on.
    IdentityLock,
}

impl SelectionStrategy {
    pub fn from_kind(kind: StrategyKind, green_threshold: f64) -> Self {
        match kind {
            StrategyKind::Confidence => SelectionStrategy::BestConfidence,
            StrategyKind::ColorOverlap => SelectionStrategy::BestColorOverlap {
                range: HsvRange::green(),
                threshold: green_threshold,
            },
            StrategyKind::IdentityLock => SelectionStrategy::IdentityLock,
        }
    }

    /// Choose at most one candidate for this frame.
    pub fn select(
        &self,
        frame: &DecodedFrame,
        candidates: &[Candidate],
        state: &mut TrackState,
    ) -> Option<Candidate> {
        match self {
            SelectionStrategy::BestConfidence => best_confidence(candidates),
            SelectionStrategy::BestColorOverlap { range, threshold } => {
                best_color_overlap(frame, candidates, *range, *threshold)
            }
            SelectionStrategy::IdentityLock => identity_lock(candidates, state),
        }
    }
}

fn best_confidence(candidates: &[Candidate]) -> Option<Candidate> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        // Strict comparison keeps the first candidate on ties, preserving
        // the detector's own ordering.
        if best.map_or(true, |b| candidate.confidence > b.confidence) {
            best = Some(candidate);
        }
    }
    best.cloned()
}

fn best_color_overlap(
    frame: &DecodedFrame,
    candidates: &[Candidate],
    range: HsvRange,
    threshold: f64,
) -> Option<Candidate> {
    let mut best_ratio = 0.0;
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        let ratio = color_ratio(frame, candidate, range);
        if ratio > best_ratio {
            best_ratio = ratio;
            best = Some(candidate);
        }
    }
    if best_ratio < threshold {
        log::debug!(
            "best color ratio {:.3} below threshold {:.3}, rejecting frame",
            best_ratio,
            threshold
        );
        return None;
    }
    best.cloned()
}

/// Fraction of box pixels whose HSV falls inside `range`.
fn color_ratio(frame: &DecodedFrame, candidate: &Candidate, range: HsvRange) -> f64 {
    let mut total = 0u64;
    let mut matched = 0u64;
    for rgb in frame.region_pixels(&candidate.bbox) {
        total += 1;
        if range.contains(rgb_to_hsv(rgb)) {
            matched += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    matched as f64 / total as f64
}

fn identity_lock(candidates: &[Candidate], state: &mut TrackState) -> Option<Candidate> {
    let locked = match state.locked_identity {
        Some(id) => id,
        None => {
            // First confirmed candidate becomes the target for the session.
            let first = candidates.iter().find(|c| c.identity.is_some())?;
            let id = first.identity.expect("filtered to confirmed candidates");
            state.locked_identity = Some(id);
            log::info!("locked onto track identity {:?}", id);
            return Some(first.clone());
        }
    };
    candidates
        .iter()
        .find(|c| c.identity == Some(locked))
        .cloned()
}

/// RGB8 to HSV in the OpenCV integer convention (H halved into `0..=180`).
fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let r = f64::from(r);
    let g = f64::from(g);
    let b = f64::from(b);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let value = max;
    let saturation = if max > 0.0 { delta / max * 255.0 } else { 0.0 };
    let hue_degrees = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let hue_degrees = if hue_degrees < 0.0 {
        hue_degrees + 360.0
    } else {
        hue_degrees
    };

    [
        (hue_degrees / 2.0).round() as u8,
        saturation.round() as u8,
        value.round() as u8,
    ]
}
