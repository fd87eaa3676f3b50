use nalgebra::Point2;

/// Axis-aligned rectangle in TLWH format (Top-Left X, Top-Left Y, Width, Height).
///
/// Zone rectangles come from interactive ROI selection or a definitions file,
/// both of which use the TLWH convention.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the rectangle
    pub width: f32,
    /// Height of the rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Test whether a point lies inside the rectangle.
    ///
    /// Bounds are inclusive on all four edges: a point exactly on an edge
    /// counts as inside.
    #[inline]
    pub fn contains(&self, point: Point2<f32>) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_interior() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point2::new(5.0, 5.0)));
        assert!(!rect.contains(Point2::new(15.0, 5.0)));
        assert!(!rect.contains(Point2::new(5.0, -1.0)));
    }

    #[test]
    fn test_contains_edges_inclusive() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point2::new(0.0, 0.0)));
        assert!(rect.contains(Point2::new(10.0, 10.0)));
        assert!(rect.contains(Point2::new(0.0, 10.0)));
        assert!(rect.contains(Point2::new(10.0, 0.0)));
    }
}
