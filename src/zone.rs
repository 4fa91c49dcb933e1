//! Zone arithmetic: bounding box in, two-axis command out.
//!
//! Dead-bands are expressed as fractions of the decoded image. Left/right
//! fractions of the width bound the horizontal zone; min/max fractions of
//! the height describe how tall the subject should appear, which makes the
//! vertical axis a distance proxy. Both axes report the signed pixel offset
//! from the zone midpoint (`desired - current`), zero inside perfect
//! centering.
//!
//! Note the inversion on the vertical axis: a larger `max_bound` puts the
//! "far" line *above* the "near" one, because a closer subject fills more
//! of the frame.

use serde::Deserialize;

use crate::command::{AxisResult, Command};
use crate::detect::BoundingBox;

/// Dead-band fractions, immutable for the lifetime of a session.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct ZoneBounds {
    /// Smallest acceptable subject height, fraction of image height.
    pub min_bound: f64,
    /// Largest acceptable subject height, fraction of image height.
    pub max_bound: f64,
    /// Left edge of the horizontal dead-band, fraction of image width.
    pub left_bound: f64,
    /// Right edge of the horizontal dead-band, fraction of image width.
    pub right_bound: f64,
}

impl Default for ZoneBounds {
    fn default() -> Self {
        Self {
            min_bound: 0.5,
            max_bound: 0.8,
            left_bound: 0.4,
            right_bound: 0.6,
        }
    }
}

/// Pure per-frame axis computations over a fixed [`ZoneBounds`].
#[derive(Clone, Copy, Debug)]
pub struct ZoneController {
    bounds: ZoneBounds,
}

impl ZoneController {
    pub fn new(bounds: ZoneBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> ZoneBounds {
        self.bounds
    }

    /// Compute both axes for a box already clamped to the image.
    pub fn compute(&self, bbox: &BoundingBox, width: u32, height: u32) -> Command {
        Command {
            horizontal: self.horizontal(bbox, width),
            vertical: self.vertical(bbox, height),
        }
    }

    /// Offset of the box center from the dead-band center.
    fn horizontal(&self, bbox: &BoundingBox, width: u32) -> AxisResult {
        let left_x = scale(width, self.bounds.left_bound);
        let right_x = scale(width, self.bounds.right_bound);
        let desired = (left_x + right_x) / 2;
        let current = bbox.center_x();
        AxisResult::distance(desired - current)
    }

    /// Offset of the box top edge from the midpoint of the min/max lines.
    /// The top edge, not the center, is the distance proxy.
    fn vertical(&self, bbox: &BoundingBox, height: u32) -> AxisResult {
        let min_rect_height = scale(height, self.bounds.min_bound);
        let min_y = (height as i32 - min_rect_height) / 2;
        let max_rect_height = scale(height, self.bounds.max_bound);
        let max_y = (height as i32 - max_rect_height) / 2;
        let desired = (min_y + max_y) / 2;
        AxisResult::distance(desired - bbox.y)
    }
}

/// Truncating fraction-of-extent, matching the reference arithmetic.
fn scale(extent: u32, fraction: f64) -> i32 {
    (f64::from(extent) * fraction) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ZoneController {
        ZoneController::new(ZoneBounds::default())
    }

    #[test]
    fn horizontal_offset_from_deadband_center() {
        // width=640, left=0.4, right=0.6 -> left_x=256, right_x=384, desired=320.
        let bbox = BoundingBox::new(200, 0, 40, 100);
        let command = controller().compute(&bbox, 640, 480);
        assert_eq!(command.horizontal, AxisResult::distance(100));
    }

    #[test]
    fn vertical_offset_from_line_midpoint() {
        // height=480, min=0.5 -> min_y=120; max=0.8 -> max_y=48; desired=84.
        let bbox = BoundingBox::new(0, 100, 40, 200);
        let command = controller().compute(&bbox, 640, 480);
        assert_eq!(command.vertical, AxisResult::distance(-16));
    }

    #[test]
    fn centered_box_is_zero_on_both_axes() {
        // Horizontal center at 320 and top edge at 84 sit exactly on the
        // desired positions.
        let bbox = BoundingBox::new(300, 84, 40, 200);
        let command = controller().compute(&bbox, 640, 480);
        assert_eq!(command.horizontal, AxisResult::distance(0));
        assert_eq!(command.vertical, AxisResult::distance(0));
    }

    #[test]
    fn max_line_sits_above_min_line() {
        // With max_bound > min_bound the far line (max_y) is the higher one;
        // a box between them gets opposite-signed offsets at the extremes.
        let high = BoundingBox::new(300, 48, 40, 200);
        let low = BoundingBox::new(300, 120, 40, 200);
        let controller = controller();
        assert_eq!(
            controller.compute(&high, 640, 480).vertical,
            AxisResult::distance(36)
        );
        assert_eq!(
            controller.compute(&low, 640, 480).vertical,
            AxisResult::distance(-36)
        );
    }

    #[test]
    fn offsets_are_signed_both_directions() {
        let left_of_band = BoundingBox::new(0, 84, 40, 200);
        let right_of_band = BoundingBox::new(600, 84, 40, 200);
        let controller = controller();
        assert_eq!(
            controller.compute(&left_of_band, 640, 480).horizontal,
            AxisResult::distance(300)
        );
        assert_eq!(
            controller.compute(&right_of_band, 640, 480).horizontal,
            AxisResult::distance(-300)
        );
    }
}
