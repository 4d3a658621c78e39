//! Plane geometry shared by the layout model and the renderer.
//!
//! Coordinates are section millimetres with the origin at the bottom-left
//! corner of the box and y pointing up.

use serde::{Deserialize, Serialize};

/// A point in section coordinates (mm)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Translate by an offset vector
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Straight line segment
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

impl Line {
    pub const fn new(from: Point, to: Point) -> Self {
        Line { from, to }
    }

    pub fn length(&self) -> f64 {
        (self.to.x - self.from.x).hypot(self.to.y - self.from.y)
    }

    /// Translate both endpoints by an offset vector
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Line::new(self.from.offset(dx, dy), self.to.offset(dx, dy))
    }
}

/// Axis-aligned rectangle given by its min and max corners
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    /// Build from two corners in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Rect {
            x0: a.x.min(b.x),
            y0: a.y.min(b.y),
            x1: a.x.max(b.x),
            y1: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// True when the rectangle has no area
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Corners counter-clockwise from bottom-left
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x0, self.y0),
            Point::new(self.x1, self.y0),
            Point::new(self.x1, self.y1),
            Point::new(self.x0, self.y1),
        ]
    }

    /// True when the open horizontal interval of `self` overlaps `(a, b)`
    pub fn overlaps_x(&self, a: f64, b: f64) -> bool {
        self.x0 < b && a < self.x1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_corners_normalizes() {
        let r = Rect::from_corners(Point::new(10.0, 5.0), Point::new(-2.0, 1.0));
        assert_eq!(r, Rect { x0: -2.0, y0: 1.0, x1: 10.0, y1: 5.0 });
        assert_eq!(r.width(), 12.0);
        assert_eq!(r.height(), 4.0);
    }

    #[test]
    fn test_line_offset_keeps_length() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        let moved = line.offset(450.0, 270.0);
        assert_eq!(moved.from, Point::new(450.0, 270.0));
        assert!((moved.length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_overlap() {
        let r = Rect::from_corners(Point::new(60.0, 0.0), Point::new(60.0, 16.0));
        assert!(r.is_empty());
        let band = Rect::from_corners(Point::new(-85.0, 0.0), Point::new(60.0, 16.0));
        assert!(!band.overlaps_x(60.0, 9390.0));
        assert!(band.overlaps_x(59.0, 9390.0));
    }
}
