use serde::{Deserialize, Serialize};

/// A selection rectangle in pixel coordinates relative to the displayed frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionRect {
    /// X coordinate of the top-left corner in pixels
    pub x: f64,
    /// Y coordinate of the top-left corner in pixels
    pub y: f64,
    /// Width in pixels (always >= 0)
    pub width: f64,
    /// Height in pixels (always >= 0)
    pub height: f64,
}

impl SelectionRect {
    /// Create a new selection rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Build a rectangle from a drag gesture, normalizing a drag in any
    /// direction into a non-negative rect anchored at its top-left corner.
    pub fn from_drag(anchor: (f64, f64), cursor: (f64, f64)) -> Self {
        Self {
            x: anchor.0.min(cursor.0),
            y: anchor.1.min(cursor.1),
            width: (cursor.0 - anchor.0).abs(),
            height: (cursor.1 - anchor.1).abs(),
        }
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check whether both edges meet the minimum actionable size.
    ///
    /// Selections below the threshold are accidental clicks rather than a
    /// deliberate region; callers reject them without a state change.
    pub fn is_actionable(&self, min_edge: f64) -> bool {
        self.width >= min_edge && self.height >= min_edge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_drag_normalizes_direction() {
        let down_right = SelectionRect::from_drag((10.0, 20.0), (110.0, 70.0));
        let up_left = SelectionRect::from_drag((110.0, 70.0), (10.0, 20.0));

        assert_eq!(down_right, up_left);
        assert_eq!(down_right.x, 10.0);
        assert_eq!(down_right.y, 20.0);
        assert_eq!(down_right.width, 100.0);
        assert_eq!(down_right.height, 50.0);
    }

    #[test]
    fn test_center() {
        let rect = SelectionRect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.center(), (60.0, 45.0));
    }

    #[test]
    fn test_is_actionable_threshold() {
        assert!(SelectionRect::new(0.0, 0.0, 5.0, 5.0).is_actionable(5.0));
        assert!(!SelectionRect::new(0.0, 0.0, 4.9, 50.0).is_actionable(5.0));
        assert!(!SelectionRect::new(0.0, 0.0, 50.0, 4.9).is_actionable(5.0));
    }

    #[test]
    fn test_new_clamps_negative_extent() {
        let rect = SelectionRect::new(0.0, 0.0, -3.0, -1.0);
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 0.0);
    }
}
