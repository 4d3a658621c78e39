//! Drawable primitives and the finished drawing bundle.

use serde::{Deserialize, Serialize};

use crate::geometry::{Line, Point};

/// Width of a DejaVu Sans Mono glyph relative to the font size
const MONO_ADVANCE_EM: f64 = 0.602;

/// Stroke settings; `width_pt` is in paper points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width_pt: f64,
}

/// Fill settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub color: String,
    pub alpha: f64,
}

/// Horizontal alignment of a label relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// A text label in section coordinates.
///
/// `position` is the centre of the text box for `Middle`, the left edge for
/// `Start` and the right edge for `End`; vertically it is always the centre.
/// `rotation_deg` turns the label counter-clockwise about `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub content: String,
    pub position: Point,
    pub height: f64,
    pub anchor: TextAnchor,
    pub rotation_deg: f64,
    pub color: String,
}

impl TextLabel {
    /// Estimated advance width of the label (section mm)
    pub fn width(&self) -> f64 {
        self.content.chars().count() as f64 * self.height * MONO_ADVANCE_EM
    }

    /// Axis-aligned box covering the label, rotation included
    pub fn extent(&self) -> BoundingBox {
        let w = self.width();
        let h = self.height;
        let (left, right) = match self.anchor {
            TextAnchor::Start => (0.0, w),
            TextAnchor::Middle => (-w / 2.0, w / 2.0),
            TextAnchor::End => (-w, 0.0),
        };
        let (sin, cos) = self.rotation_deg.to_radians().sin_cos();
        let mut bounds = BoundingBox::empty();
        for (u, v) in [(left, -h / 2.0), (right, -h / 2.0), (right, h / 2.0), (left, h / 2.0)] {
            bounds.include(Point::new(
                self.position.x + u * cos - v * sin,
                self.position.y + u * sin + v * cos,
            ));
        }
        bounds
    }
}

/// One drawable element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Line { line: Line, stroke: Stroke },
    Polygon { points: Vec<Point>, fill: Option<Fill>, stroke: Option<Stroke> },
    Text(TextLabel),
}

impl Primitive {
    /// Grow `bounds` to cover this primitive
    pub fn extend_bounds(&self, bounds: &mut BoundingBox) {
        match self {
            Primitive::Line { line, .. } => {
                bounds.include(line.from);
                bounds.include(line.to);
            }
            Primitive::Polygon { points, .. } => {
                for p in points {
                    bounds.include(*p);
                }
            }
            Primitive::Text(label) => bounds.merge(&label.extent()),
        }
    }
}

/// Axis-aligned bounds in section coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Bounds that contain nothing; the first `include` sets them
    pub fn empty() -> Self {
        BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn merge(&mut self, other: &BoundingBox) {
        if !other.is_empty() {
            self.include(Point::new(other.min_x, other.min_y));
            self.include(Point::new(other.max_x, other.max_y));
        }
    }

    /// Grow by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Self {
        BoundingBox {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.is_empty()
            || (self.contains(Point::new(other.min_x, other.min_y))
                && self.contains(Point::new(other.max_x, other.max_y)))
    }
}

/// A finished drawing: primitives in paint order plus fitted view bounds.
///
/// Built fresh by every render call and owned by the caller; nothing in it
/// refers back to the layout it was drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDrawing {
    primitives: Vec<Primitive>,
    bounds: BoundingBox,
}

impl RenderedDrawing {
    /// Bundle primitives and fit the bounds around them plus `margin`
    pub fn new(primitives: Vec<Primitive>, margin: f64) -> Self {
        let mut bounds = BoundingBox::empty();
        for primitive in &primitives {
            primitive.extend_bounds(&mut bounds);
        }
        RenderedDrawing {
            primitives,
            bounds: bounds.expanded(margin),
        }
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Every text label, in paint order
    pub fn labels(&self) -> impl Iterator<Item = &TextLabel> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(label) => Some(label),
            _ => None,
        })
    }

    /// Every stroked line, in paint order
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Line { line, .. } => Some(line),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(content: &str, anchor: TextAnchor, rotation_deg: f64) -> TextLabel {
        TextLabel {
            content: content.to_string(),
            position: Point::new(0.0, 0.0),
            height: 100.0,
            anchor,
            rotation_deg,
            color: "#1a1a1a".to_string(),
        }
    }

    #[test]
    fn test_text_extent_centered() {
        let extent = label("3110", TextAnchor::Middle, 0.0).extent();
        assert!((extent.width() - 4.0 * 60.2).abs() < 1e-9);
        assert!((extent.height() - 100.0).abs() < 1e-9);
        assert!((extent.min_x + extent.max_x).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_text_extent_swaps_axes() {
        let extent = label("H = 2000 mm", TextAnchor::Middle, 90.0).extent();
        assert!((extent.width() - 100.0).abs() < 1e-6);
        assert!((extent.height() - 11.0 * 60.2).abs() < 1e-6);
    }

    #[test]
    fn test_start_anchor_extends_right() {
        let extent = label("t_top=22 mm", TextAnchor::Start, 0.0).extent();
        assert!(extent.min_x.abs() < 1e-9);
        assert!(extent.max_x > 0.0);
    }

    #[test]
    fn test_drawing_bounds_cover_primitives() {
        let stroke = Stroke {
            color: "#1a1a1a".to_string(),
            width_pt: 1.0,
        };
        let dim_line = Primitive::Line {
            line: Line::new(Point::new(0.0, 0.0), Point::new(9450.0, 0.0)),
            stroke,
        };
        let centred = TextLabel {
            position: Point::new(4725.0, 0.0),
            ..label("9450", TextAnchor::Middle, 0.0)
        };
        let drawing = RenderedDrawing::new(vec![dim_line.clone(), Primitive::Text(centred)], 50.0);
        let bounds = drawing.bounds();
        assert_eq!(bounds.min_x, -50.0);
        assert_eq!(bounds.max_x, 9500.0);
        assert_eq!(drawing.labels().count(), 1);
        assert_eq!(drawing.lines().count(), 1);

        // A label hanging past the line end widens the bounds by half its width
        let overhanging = RenderedDrawing::new(
            vec![dim_line, Primitive::Text(label("9450", TextAnchor::Middle, 0.0))],
            50.0,
        );
        assert!((overhanging.bounds().min_x - (-2.0 * 60.2 - 50.0)).abs() < 1e-9);
        assert_eq!(overhanging.bounds().max_x, 9500.0);
    }

    #[test]
    fn test_empty_bounds() {
        let mut bounds = BoundingBox::empty();
        assert!(bounds.is_empty());
        bounds.merge(&BoundingBox::empty());
        assert!(bounds.is_empty());
        bounds.include(Point::new(1.0, 2.0));
        assert!(!bounds.is_empty());
        assert!(bounds.contains(Point::new(1.0, 2.0)));
    }
}
