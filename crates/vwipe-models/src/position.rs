//! Coarse positional description of a selection within a frame.
//!
//! The remote model receives a natural-language instruction, so the pixel
//! selection is reduced to one of nine cells of a 3x3 grid and rendered as a
//! fixed English phrase.

use serde::{Deserialize, Serialize};

use crate::rect::SelectionRect;

/// One of nine cells of a 3x3 grid over the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionPosition {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl RegionPosition {
    /// Classify a point into a grid cell.
    ///
    /// Callers guarantee `image_width > 0` and `image_height > 0`.
    pub fn from_point(x: f64, y: f64, image_width: f64, image_height: f64) -> Self {
        let col = third(x, image_width);
        let row = third(y, image_height);

        match (row, col) {
            (Third::First, Third::First) => Self::TopLeft,
            (Third::First, Third::Middle) => Self::TopCenter,
            (Third::First, Third::Last) => Self::TopRight,
            (Third::Middle, Third::First) => Self::CenterLeft,
            (Third::Middle, Third::Middle) => Self::Center,
            (Third::Middle, Third::Last) => Self::CenterRight,
            (Third::Last, Third::First) => Self::BottomLeft,
            (Third::Last, Third::Middle) => Self::BottomCenter,
            (Third::Last, Third::Last) => Self::BottomRight,
        }
    }

    /// Classify a selection by its center point.
    pub fn from_selection(rect: &SelectionRect, image_width: f64, image_height: f64) -> Self {
        let (cx, cy) = rect.center();
        Self::from_point(cx, cy, image_width, image_height)
    }

    /// The fixed phrase used verbatim inside the edit instruction.
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::TopLeft => "in the top left area",
            Self::TopCenter => "in the top center area",
            Self::TopRight => "in the top right area",
            Self::CenterLeft => "in the center left area",
            Self::Center => "in the center",
            Self::CenterRight => "in the center right area",
            Self::BottomLeft => "in the bottom left area",
            Self::BottomCenter => "in the bottom center area",
            Self::BottomRight => "in the bottom right area",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Third {
    First,
    Middle,
    Last,
}

fn third(value: f64, extent: f64) -> Third {
    if value < extent / 3.0 {
        Third::First
    } else if value <= extent * 2.0 / 3.0 {
        Third::Middle
    } else {
        Third::Last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 300.0;
    const H: f64 = 300.0;

    #[test]
    fn test_center_cell() {
        assert_eq!(
            RegionPosition::from_point(150.0, 150.0, W, H),
            RegionPosition::Center
        );
        assert_eq!(RegionPosition::Center.phrase(), "in the center");
    }

    #[test]
    fn test_corner_cells() {
        assert_eq!(
            RegionPosition::from_point(10.0, 10.0, W, H),
            RegionPosition::TopLeft
        );
        assert_eq!(
            RegionPosition::from_point(290.0, 10.0, W, H),
            RegionPosition::TopRight
        );
        assert_eq!(
            RegionPosition::from_point(10.0, 290.0, W, H),
            RegionPosition::BottomLeft
        );
        assert_eq!(
            RegionPosition::from_point(290.0, 290.0, W, H),
            RegionPosition::BottomRight
        );
        assert_eq!(
            RegionPosition::BottomRight.phrase(),
            "in the bottom right area"
        );
    }

    #[test]
    fn test_edge_cells() {
        assert_eq!(
            RegionPosition::from_point(150.0, 10.0, W, H),
            RegionPosition::TopCenter
        );
        assert_eq!(
            RegionPosition::from_point(10.0, 150.0, W, H),
            RegionPosition::CenterLeft
        );
        assert_eq!(
            RegionPosition::from_point(290.0, 150.0, W, H),
            RegionPosition::CenterRight
        );
        assert_eq!(
            RegionPosition::from_point(150.0, 290.0, W, H),
            RegionPosition::BottomCenter
        );
    }

    #[test]
    fn test_from_selection_uses_center() {
        // 200x150 selection centered in a 640x480 image
        let rect = SelectionRect::new(220.0, 165.0, 200.0, 150.0);
        assert_eq!(
            RegionPosition::from_selection(&rect, 640.0, 480.0),
            RegionPosition::Center
        );
    }

    #[test]
    fn test_non_square_image() {
        // Wide image: x thirds are 0..640, 640..1280, 1280..1920
        assert_eq!(
            RegionPosition::from_point(1500.0, 100.0, 1920.0, 1080.0),
            RegionPosition::TopRight
        );
    }
}
