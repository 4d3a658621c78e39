//! # Section Renderer
//!
//! Composes a [`Layout`] and a [`DrawingStyle`] into a [`RenderedDrawing`] in
//! one of two views:
//!
//! - **Orthographic**: the engineering cross-section with shaded flanges,
//!   every web and the full set of dimension chains.
//! - **Oblique**: a pseudo-3D beam segment. Every outline, flange and web
//!   vertex is copied by a fixed translation `(0.30 L, 0.18 L)` to form the
//!   back face and joined to its front vertex by a connector line. There is
//!   no foreshortening, so both faces stay congruent.
//!
//! Dimension chains are always drawn against the front face:
//!
//! ```text
//!   |<-- oh -->|<- e ->|<-- cell -->|<-- cell -->|<- e ->|<-- oh -->|   top detail
//!   |<------------------------ B_deck ----------------------------->|   top total
//!              ┌────────────────────────────────────────┐
//!              │      │             │             │     │
//!              └────────────────────────────────────────┘
//!              |<-e->|<-- cell -->|<-- cell -->|<-e->|                   bottom detail
//!              |<--------------- B_box --------------->|                 bottom total
//! ```
//!
//! Rendering never mutates the layout, and a malformed layout fails with
//! [`SectionError::LayoutError`] before anything is drawn.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dimensions::{build_chain, chain_breakpoints, ChainAxis, ChainStyle, DimensionSegment};
use crate::drawing::primitives::{Fill, Primitive, RenderedDrawing, Stroke, TextAnchor, TextLabel};
use crate::drawing::style::DrawingStyle;
use crate::errors::{SectionError, SectionResult};
use crate::geometry::{Line, Point, Rect};
use crate::section::Layout;

/// Default length of the beam segment shown in the oblique view (mm)
pub const DEFAULT_SEGMENT_LENGTH_MM: f64 = 1500.0;

/// Horizontal share of the segment length used as the oblique offset
const OBLIQUE_DX_FACTOR: f64 = 0.30;
/// Vertical share of the segment length used as the oblique offset
const OBLIQUE_DY_FACTOR: f64 = 0.18;

/// Default label height as a share of the structure extent
const TEXT_HEIGHT_FACTOR: f64 = 0.011;

/// Presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum ViewMode {
    /// Flat engineering cross-section
    Orthographic,
    /// Pseudo-3D segment of the given length (mm)
    Oblique { segment_length: f64 },
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Orthographic
    }
}

impl ViewMode {
    /// Oblique view with the default segment length
    pub fn oblique() -> Self {
        ViewMode::Oblique {
            segment_length: DEFAULT_SEGMENT_LENGTH_MM,
        }
    }

    /// Back-face translation `(dx, dy)`; zero for the orthographic view
    pub fn offset(&self) -> (f64, f64) {
        match *self {
            ViewMode::Orthographic => (0.0, 0.0),
            ViewMode::Oblique { segment_length } => {
                (OBLIQUE_DX_FACTOR * segment_length, OBLIQUE_DY_FACTOR * segment_length)
            }
        }
    }

    fn validate(&self) -> SectionResult<()> {
        if let ViewMode::Oblique { segment_length } = *self {
            if !(segment_length.is_finite() && segment_length > 0.0) {
                return Err(SectionError::config(format!(
                    "oblique segment length must be positive, got {}",
                    segment_length
                )));
            }
        }
        Ok(())
    }
}

/// The four chain groups of a section drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionChains {
    /// Deck overhangs, setbacks and every cell, above the section
    pub top_detail: Vec<DimensionSegment>,
    /// Full deck width; `None` when the overhang is zero and the deck
    /// total would repeat the box width
    pub top_total: Option<Vec<DimensionSegment>>,
    /// Setbacks, bottom flange cantilevers and every cell, below the section
    pub bottom_detail: Vec<DimensionSegment>,
    /// Full box width
    pub bottom_total: Vec<DimensionSegment>,
    /// Girder height, left of the section
    pub height: Vec<DimensionSegment>,
}

/// Placement of annotation tiers for one render
#[derive(Debug, Clone, Copy)]
struct Tiers {
    gap: f64,
    text_height: f64,
    /// Distance between a detail chain and its total chain
    step: f64,
    /// Structure top used for placing the top chains (back face included)
    top: f64,
    /// Leftmost structural x
    left: f64,
}

fn tiers(layout: &Layout, style: &DrawingStyle, view: ViewMode) -> Tiers {
    let gap = style.effective_gap(layout.dimension_gap);
    let extent = (layout.box_width + 2.0 * layout.overhang).max(layout.height);
    let text_height = style.text_height.unwrap_or(extent * TEXT_HEIGHT_FACTOR);
    let (_, dy) = view.offset();
    let left = [
        0.0,
        layout.top_flange.left.x0,
        layout.bottom_flange.left.x0,
    ]
    .into_iter()
    .fold(f64::INFINITY, f64::min);
    Tiers {
        gap,
        text_height,
        step: gap + style.label_margin + 1.5 * text_height,
        top: layout.height + dy,
        left,
    }
}

/// Build every dimension chain of the section.
///
/// Detail chains share the layout's web positions with the outline, so each
/// cell gets exactly one label per chain and the cell segments close on
/// `x_right - x_left` even when the last cell carries a rounding remainder.
pub fn section_chains(layout: &Layout, style: &DrawingStyle, view: ViewMode) -> SectionResult<SectionChains> {
    layout.validate()?;
    view.validate()?;
    let chain_style = ChainStyle::from(style);
    let t = tiers(layout, style, view);
    let oh = layout.overhang;
    let b = layout.box_width;

    let top_points = [-oh, 0.0, layout.x_left]
        .into_iter()
        .chain(layout.internal_web_xs.iter().copied())
        .chain([layout.x_right, b, b + oh]);
    let top_detail = build_chain(
        &chain_breakpoints(top_points),
        ChainAxis::Horizontal,
        t.top + t.gap,
        layout.height,
        &chain_style,
    )?;

    let top_total = if oh > 0.0 {
        Some(build_chain(
            &[-oh, b + oh],
            ChainAxis::Horizontal,
            t.top + t.gap + t.step,
            layout.height,
            &chain_style,
        )?)
    } else {
        None
    };

    let bottom_points = [
        0.0,
        layout.bottom_flange.left.x0,
        layout.x_left,
    ]
    .into_iter()
    .chain(layout.internal_web_xs.iter().copied())
    .chain([layout.x_right, layout.bottom_flange.right.x1, b]);
    let bottom_detail = build_chain(
        &chain_breakpoints(bottom_points),
        ChainAxis::Horizontal,
        -t.gap,
        0.0,
        &chain_style,
    )?;

    let bottom_total = build_chain(&[0.0, b], ChainAxis::Horizontal, -t.gap - t.step, 0.0, &chain_style)?;

    let height = build_chain(
        &[0.0, layout.height],
        ChainAxis::Vertical,
        t.left - t.gap,
        t.left,
        &chain_style,
    )?;

    Ok(SectionChains {
        top_detail,
        top_total,
        bottom_detail,
        bottom_total,
        height,
    })
}

/// Collects primitives in paint order
struct Painter<'a> {
    style: &'a DrawingStyle,
    text_height: f64,
    primitives: Vec<Primitive>,
}

impl<'a> Painter<'a> {
    fn new(style: &'a DrawingStyle, text_height: f64) -> Self {
        Painter {
            style,
            text_height,
            primitives: Vec::new(),
        }
    }

    fn stroke(&self, width_pt: f64) -> Stroke {
        Stroke {
            color: self.style.line_color.clone(),
            width_pt,
        }
    }

    fn line(&mut self, line: Line, width_pt: f64) {
        let stroke = self.stroke(width_pt);
        self.primitives.push(Primitive::Line { line, stroke });
    }

    fn filled_rect(&mut self, rect: &Rect, color: &str, alpha: f64, width_pt: f64, dx: f64, dy: f64) {
        if rect.is_empty() {
            return;
        }
        let points = rect.corners().iter().map(|p| p.offset(dx, dy)).collect();
        let stroke = Some(self.stroke(width_pt));
        self.primitives.push(Primitive::Polygon {
            points,
            fill: Some(Fill {
                color: color.to_string(),
                alpha,
            }),
            stroke,
        });
    }

    fn outline(&mut self, points: Vec<Point>, width_pt: f64) {
        let stroke = Some(self.stroke(width_pt));
        self.primitives.push(Primitive::Polygon {
            points,
            fill: None,
            stroke,
        });
    }

    fn text(&mut self, content: String, position: Point, anchor: TextAnchor, rotation_deg: f64) {
        self.primitives.push(Primitive::Text(TextLabel {
            content,
            position,
            height: self.text_height,
            anchor,
            rotation_deg,
            color: self.style.line_color.clone(),
        }));
    }

    /// Draw a chain; `caption` turns labels into `"{name} = {value} mm"`,
    /// with `value` defaulting to the segment label
    fn chain(&mut self, segments: &[DimensionSegment], caption: Option<(&str, Option<i64>)>) {
        let width = self.style.dim_line_width;
        for seg in segments {
            self.line(seg.dim_line, width);
            for leader in seg.leaders {
                self.line(leader, width);
            }
            for terminator in &seg.terminators {
                self.line(*terminator, width);
            }

            let content = match caption {
                Some((name, value)) => format!("{} = {} mm", name, value.unwrap_or(seg.label)),
                None => seg.label.to_string(),
            };
            let half = seg.label_side * self.text_height / 2.0;
            let (position, rotation) = match seg.axis {
                ChainAxis::Horizontal => (seg.label_anchor.offset(0.0, half), 0.0),
                ChainAxis::Vertical => (seg.label_anchor.offset(half, 0.0), 90.0),
            };
            self.text(content, position, TextAnchor::Middle, rotation);
        }
    }

    /// Flange fills, outline and webs of one face translated by `(dx, dy)`
    fn face(&mut self, layout: &Layout, dx: f64, dy: f64, back: bool) {
        let style = self.style;
        let (color, alpha, outline_w, web_w) = if back {
            (&style.back_fill_color, style.back_fill_alpha, style.connector_width, style.connector_width)
        } else {
            (&style.fill_color, style.fill_alpha, style.outline_width, style.web_width)
        };

        for flange in [&layout.top_flange, &layout.bottom_flange] {
            for rect in [&flange.band, &flange.left, &flange.right] {
                self.filled_rect(rect, color, alpha, style.dim_line_width, dx, dy);
            }
        }

        let outline = Rect::from_corners(Point::new(0.0, 0.0), Point::new(layout.box_width, layout.height));
        self.outline(outline.corners().iter().map(|p| p.offset(dx, dy)).collect(), outline_w);

        for x in layout.web_xs() {
            let web = Line::new(Point::new(x, layout.web_bottom_y()), Point::new(x, layout.web_top_y()));
            self.line(web.offset(dx, dy), web_w);
        }
    }
}

/// Every vertex joined to its back copy in the oblique view, without repeats
fn connector_vertices(layout: &Layout) -> Vec<Point> {
    let outline = Rect::from_corners(Point::new(0.0, 0.0), Point::new(layout.box_width, layout.height));
    let mut vertices: Vec<Point> = outline.corners().to_vec();
    for flange in [&layout.top_flange, &layout.bottom_flange] {
        for rect in [&flange.band, &flange.left, &flange.right] {
            if !rect.is_empty() {
                vertices.extend(rect.corners());
            }
        }
    }
    for x in layout.web_xs() {
        vertices.push(Point::new(x, layout.web_bottom_y()));
        vertices.push(Point::new(x, layout.web_top_y()));
    }

    let mut unique: Vec<Point> = Vec::with_capacity(vertices.len());
    for v in vertices {
        if !unique.contains(&v) {
            unique.push(v);
        }
    }
    unique
}

/// Render a section drawing.
///
/// # Errors
///
/// - [`SectionError::LayoutError`] when the layout is inconsistent
/// - [`SectionError::ConfigError`] for an invalid style or segment length
pub fn render(layout: &Layout, style: &DrawingStyle, view: ViewMode) -> SectionResult<RenderedDrawing> {
    style.validate()?;
    let chains = section_chains(layout, style, view)?;
    let t = tiers(layout, style, view);
    let mut painter = Painter::new(style, t.text_height);

    if let ViewMode::Oblique { .. } = view {
        let (dx, dy) = view.offset();
        painter.face(layout, dx, dy, true);
        for v in connector_vertices(layout) {
            painter.line(Line::new(v, v.offset(dx, dy)), style.connector_width);
        }
    }
    painter.face(layout, 0.0, 0.0, false);

    painter.chain(&chains.top_detail, None);
    if let Some(total) = &chains.top_total {
        // The drawn span is box + 2 x rounded overhang, which can differ from
        // the rounded deck width by 1 mm when the remainder is odd
        painter.chain(total, Some(("B_deck", Some(layout.deck_width_mm as i64))));
    }
    painter.chain(&chains.bottom_detail, None);
    painter.chain(&chains.bottom_total, Some(("B_box", None)));
    painter.chain(&chains.height, Some(("H", None)));

    let h = t.text_height;
    painter.text(
        format!("t_top={} mm", layout.top_thickness.round()),
        Point::new(layout.x_left + h * 0.5, layout.web_top_y() - h),
        TextAnchor::Start,
        0.0,
    );
    painter.text(
        format!("t_bot={} mm", layout.bottom_thickness.round()),
        Point::new(layout.x_left + h * 0.5, layout.web_bottom_y() + h),
        TextAnchor::Start,
        0.0,
    );
    let first_cell_mid = (layout.x_left + layout.internal_web_xs.first().copied().unwrap_or(layout.x_right)) / 2.0;
    painter.text(
        format!("t_web={} mm (x{} webs)", layout.web_thickness.round(), layout.web_count()),
        Point::new(first_cell_mid, layout.height / 2.0),
        TextAnchor::Middle,
        0.0,
    );

    let margin = style.margin_factor * t.gap;
    let drawing = RenderedDrawing::new(painter.primitives, margin);
    debug!(
        ?view,
        primitives = drawing.primitives().len(),
        width = drawing.bounds().width(),
        height = drawing.bounds().height(),
        "rendered section"
    );
    Ok(drawing)
}
