//! Detection outputs shared by every backend.

/// Axis-aligned box in the pixel space of the decoded image.
///
/// `x`/`y` are the top-left corner; `w`/`h` are non-negative extents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Clamp to image bounds, shrinking the extents as needed.
    pub fn clamp_to(self, width: u32, height: u32) -> Self {
        let width = width as i32;
        let height = height as i32;
        let x = self.x.clamp(0, width);
        let y = self.y.clamp(0, height);
        let w = self.w.min(width - x).max(0);
        let h = self.h.min(height - y).max(0);
        Self { x, y, w, h }
    }

    /// Horizontal center, integer midpoint.
    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }
}

/// Opaque identity token a tracking backend may attach to a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TrackId(pub u64);

/// One detector output for one frame, already filtered to the subject class.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub bbox: BoundingBox,
    /// Detector-reported confidence in `[0, 1]`.
    pub confidence: f64,
    /// Present only for backends that track identity across frames.
    pub identity: Option<TrackId>,
}

impl Candidate {
    pub fn new(bbox: BoundingBox, confidence: f64) -> Self {
        Self {
            bbox,
            confidence,
            identity: None,
        }
    }

    pub fn with_identity(mut self, id: TrackId) -> Self {
        self.identity = Some(id);
        self
    }
}
