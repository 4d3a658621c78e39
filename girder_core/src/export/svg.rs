//! SVG serialization of a [`RenderedDrawing`].
//!
//! Section coordinates have y up; SVG has y down. Every point is flipped
//! about the top of the drawing bounds and shifted so the bounds start at the
//! origin. The viewBox stays in section millimetres and the `width`/`height`
//! attributes carry the pixel size at the style's DPI and paper scale, so a
//! 1:50 drawing at 200 dpi rasterizes at exactly that resolution.

use crate::drawing::primitives::{BoundingBox, Primitive, RenderedDrawing, TextAnchor, TextLabel};
use crate::drawing::style::DrawingStyle;
use crate::geometry::Point;
use crate::units::{Inches, Millimeters};

/// Pixel size `(width, height)` of a drawing with these bounds
pub fn pixel_size(bounds: &BoundingBox, style: &DrawingStyle) -> (f64, f64) {
    let to_px = |section_mm: f64| {
        let paper = Millimeters(section_mm / style.paper_scale);
        Inches::from(paper).to_pixels(style.dpi).ceil()
    };
    (to_px(bounds.width()), to_px(bounds.height()))
}

/// Serialize a drawing to a standalone SVG document
pub fn to_svg(drawing: &RenderedDrawing, style: &DrawingStyle) -> String {
    let bounds = drawing.bounds();
    let (width_px, height_px) = pixel_size(&bounds, style);
    let flip = |p: Point| (p.x - bounds.min_x, bounds.max_y - p.y);

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {:.3} {:.3}\">\n",
        width_px,
        height_px,
        bounds.width(),
        bounds.height()
    );
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");
    svg.push_str(&format!(
        "<g font-family=\"{}\" stroke-linecap=\"butt\" stroke-linejoin=\"miter\">\n",
        escape_xml(&style.font_family)
    ));

    for primitive in drawing.primitives() {
        match primitive {
            Primitive::Line { line, stroke } => {
                let (x1, y1) = flip(line.from);
                let (x2, y2) = flip(line.to);
                svg.push_str(&format!(
                    "<line x1=\"{:.3}\" y1=\"{:.3}\" x2=\"{:.3}\" y2=\"{:.3}\" stroke=\"{}\" stroke-width=\"{:.3}\"/>\n",
                    x1,
                    y1,
                    x2,
                    y2,
                    stroke.color,
                    style.points_to_section_mm(stroke.width_pt)
                ));
            }
            Primitive::Polygon { points, fill, stroke } => {
                let coords: Vec<String> = points
                    .iter()
                    .map(|p| {
                        let (x, y) = flip(*p);
                        format!("{:.3},{:.3}", x, y)
                    })
                    .collect();
                let fill_attrs = match fill {
                    Some(fill) => format!("fill=\"{}\" fill-opacity=\"{:.3}\"", fill.color, fill.alpha),
                    None => "fill=\"none\"".to_string(),
                };
                let stroke_attrs = match stroke {
                    Some(stroke) => format!(
                        "stroke=\"{}\" stroke-width=\"{:.3}\"",
                        stroke.color,
                        style.points_to_section_mm(stroke.width_pt)
                    ),
                    None => "stroke=\"none\"".to_string(),
                };
                svg.push_str(&format!(
                    "<polygon points=\"{}\" {} {}/>\n",
                    coords.join(" "),
                    fill_attrs,
                    stroke_attrs
                ));
            }
            Primitive::Text(label) => svg.push_str(&text_element(label, flip(label.position))),
        }
    }

    svg.push_str("</g>\n</svg>\n");
    svg
}

fn text_element(label: &TextLabel, (x, y): (f64, f64)) -> String {
    let anchor = match label.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    // Counter-clockwise in section coordinates is negative in SVG
    let transform = if label.rotation_deg != 0.0 {
        format!(" transform=\"rotate({:.3} {:.3} {:.3})\"", -label.rotation_deg, x, y)
    } else {
        String::new()
    };
    format!(
        "<text x=\"{:.3}\" y=\"{:.3}\" font-size=\"{:.3}\" text-anchor=\"{}\" dominant-baseline=\"central\" fill=\"{}\"{}>{}</text>\n",
        x,
        y,
        label.height,
        anchor,
        label.color,
        transform,
        escape_xml(&label.content)
    )
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::primitives::Stroke;
    use crate::drawing::render::{render, ViewMode};
    use crate::geometry::Line;
    use crate::section::{compute_layout, SectionParameters};

    fn label(content: &str, rotation_deg: f64) -> Primitive {
        Primitive::Text(TextLabel {
            content: content.to_string(),
            position: Point::new(500.0, 100.0),
            height: 50.0,
            anchor: TextAnchor::Middle,
            rotation_deg,
            color: "#1a1a1a".to_string(),
        })
    }

    #[test]
    fn test_y_axis_is_flipped() {
        let line = Primitive::Line {
            line: Line::new(Point::new(0.0, 0.0), Point::new(1000.0, 0.0)),
            stroke: Stroke {
                color: "#1a1a1a".to_string(),
                width_pt: 1.0,
            },
        };
        let drawing = RenderedDrawing::new(vec![line, label("top", 0.0)], 0.0);
        let svg = to_svg(&drawing, &DrawingStyle::default());
        // Bounds run from y = 0 up to the label's top edge at y = 125
        assert!(svg.contains("x1=\"0.000\" y1=\"125.000\" x2=\"1000.000\" y2=\"125.000\""));
        assert!(svg.contains("<text x=\"500.000\" y=\"25.000\""));
    }

    #[test]
    fn test_rotation_and_escaping() {
        let drawing = RenderedDrawing::new(vec![label("a<b & c", 90.0)], 0.0);
        let svg = to_svg(&drawing, &DrawingStyle::default());
        assert!(svg.contains("a&lt;b &amp; c"));
        assert!(svg.contains("transform=\"rotate(-90.000"));
    }

    #[test]
    fn test_pixel_size_follows_scale_and_dpi() {
        let bounds = BoundingBox {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 1270.0,
            max_y: 635.0,
        };
        // 1270 mm at 1:50 is one inch of paper
        assert_eq!(pixel_size(&bounds, &DrawingStyle::default()), (200.0, 100.0));
        let style = DrawingStyle {
            dpi: 300.0,
            ..DrawingStyle::default()
        };
        assert_eq!(pixel_size(&bounds, &style), (300.0, 150.0));
    }

    #[test]
    fn test_section_svg_contains_annotations() {
        let layout = compute_layout(&SectionParameters::default()).unwrap();
        let style = DrawingStyle::default();
        let drawing = render(&layout, &style, ViewMode::Orthographic).unwrap();
        let svg = to_svg(&drawing, &style);
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("B_box = 9450 mm"));
        assert!(svg.contains("font-family=\"DejaVu Sans Mono\""));
        assert!(svg.contains("fill-opacity=\"0.350\""));
        let polygons = drawing
            .primitives()
            .iter()
            .filter(|p| matches!(p, Primitive::Polygon { .. }))
            .count();
        assert_eq!(svg.matches("<polygon").count(), polygons);
    }
}
