//! # Dimension Chains
//!
//! Turns an ordered list of boundary coordinates into a gap-free run of
//! labelled dimension segments, drafted the usual CAD way: leader lines from
//! the structure edge to a parallel dimension line, a terminator at each end
//! and a centred label per segment.
//!
//! Every segment carries its own pair of leader lines, so neighbouring
//! segments repeat the shared one. Any subset of a chain stays legible on
//! its own.
//!
//! Chains are composed, not nested: a total chain and a per-cell detail chain
//! are two separate [`build_chain`] calls at two offsets.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::dimensions::{build_chain, ChainAxis, ChainStyle};
//!
//! let segments = build_chain(
//!     &[0.0, 3110.0, 6220.0, 9330.0],
//!     ChainAxis::Horizontal,
//!     2120.0, // dimension line y
//!     2000.0, // structure edge y
//!     &ChainStyle::default(),
//! )
//! .unwrap();
//!
//! let labels: Vec<i64> = segments.iter().map(|s| s.label).collect();
//! assert_eq!(labels, vec![3110, 3110, 3110]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::drawing::style::{DrawingStyle, TerminatorStyle};
use crate::errors::{SectionError, SectionResult};
use crate::geometry::{Line, Point};
use crate::units::Millimeters;

/// Breakpoints closer than this are treated as one
const COINCIDENT_TOLERANCE_MM: f64 = 1e-9;

/// Direction along which a chain measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainAxis {
    /// Boundaries are x; dimension line and anchor edge are y
    Horizontal,
    /// Boundaries are y; dimension line and anchor edge are x
    Vertical,
}

impl ChainAxis {
    /// Map (along, across) chain coordinates to a section point
    fn point(self, along: f64, across: f64) -> Point {
        match self {
            ChainAxis::Horizontal => Point::new(along, across),
            ChainAxis::Vertical => Point::new(across, along),
        }
    }
}

/// Annotation settings the chain builder needs from the drawing style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainStyle {
    pub terminator: TerminatorStyle,
    pub tick_length: f64,
    pub label_margin: f64,
}

impl Default for ChainStyle {
    fn default() -> Self {
        ChainStyle::from(&DrawingStyle::default())
    }
}

impl From<&DrawingStyle> for ChainStyle {
    fn from(style: &DrawingStyle) -> Self {
        ChainStyle {
            terminator: style.arrow_style,
            tick_length: style.tick_length,
            label_margin: style.label_margin,
        }
    }
}

/// One labelled span of a dimension chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSegment {
    pub axis: ChainAxis,
    /// Lower boundary along the chain axis
    pub start: f64,
    /// Upper boundary along the chain axis
    pub end: f64,
    /// `round(end - start)` in whole millimetres
    pub label: i64,
    /// The dimension line itself
    pub dim_line: Line,
    /// Leader lines at `start` and `end`, from the anchor edge to the dimension line
    pub leaders: [Line; 2],
    /// Terminator strokes at both ends
    pub terminators: Vec<Line>,
    /// Centre of the label, offset perpendicular away from the structure
    pub label_anchor: Point,
    /// +1.0 when the label sits on the positive side of the dimension line
    pub label_side: f64,
}

impl DimensionSegment {
    /// Measured length, unrounded
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Build a dimension chain.
///
/// # Arguments
///
/// * `boundaries` - strictly increasing coordinates along `axis`, at least two
/// * `axis` - measuring direction
/// * `dim_line` - position of the dimension line across the axis
/// * `anchor_edge` - structure edge the leader lines start from
/// * `style` - terminator and label settings
///
/// # Errors
///
/// [`SectionError::InvalidChainError`] when there are fewer than two
/// boundaries, or any boundary is non-finite or not strictly above its
/// predecessor.
pub fn build_chain(
    boundaries: &[f64],
    axis: ChainAxis,
    dim_line: f64,
    anchor_edge: f64,
    style: &ChainStyle,
) -> SectionResult<Vec<DimensionSegment>> {
    if boundaries.len() < 2 {
        return Err(SectionError::invalid_chain(boundaries, "a chain needs at least 2 boundaries"));
    }
    if boundaries.iter().any(|b| !b.is_finite()) || !dim_line.is_finite() || !anchor_edge.is_finite() {
        return Err(SectionError::invalid_chain(boundaries, "chain coordinates must be finite"));
    }
    if boundaries.windows(2).any(|w| w[1] <= w[0]) {
        return Err(SectionError::invalid_chain(boundaries, "boundaries must be strictly increasing"));
    }

    let side = if dim_line >= anchor_edge { 1.0 } else { -1.0 };
    let segments: Vec<DimensionSegment> = boundaries
        .windows(2)
        .map(|pair| segment(axis, pair[0], pair[1], dim_line, anchor_edge, side, style))
        .collect();

    debug!(
        ?axis,
        dim_line,
        segments = segments.len(),
        total = chain_total(&segments),
        "built dimension chain"
    );
    Ok(segments)
}

fn segment(
    axis: ChainAxis,
    start: f64,
    end: f64,
    dim_line: f64,
    anchor_edge: f64,
    side: f64,
    style: &ChainStyle,
) -> DimensionSegment {
    let p = |along: f64, across: f64| axis.point(along, across);
    let length = end - start;

    let mut terminators = Vec::with_capacity(4);
    let s = style.tick_length;
    match style.terminator {
        TerminatorStyle::Arrow => {
            // Barbs flip outward when two arrowheads would not fit inside
            let inward = if length >= 2.0 * s { 1.0 } else { -1.0 };
            for (pos, dir) in [(start, inward), (end, -inward)] {
                let tip = p(pos, dim_line);
                terminators.push(Line::new(tip, p(pos + dir * s, dim_line + s * 0.5)));
                terminators.push(Line::new(tip, p(pos + dir * s, dim_line - s * 0.5)));
            }
        }
        TerminatorStyle::Tick => {
            // Slash of length s, so each axis spans s / sqrt(2)
            let half = s * 0.5 * std::f64::consts::FRAC_1_SQRT_2;
            for pos in [start, end] {
                terminators.push(Line::new(
                    p(pos - half, dim_line - half),
                    p(pos + half, dim_line + half),
                ));
            }
        }
    }

    DimensionSegment {
        axis,
        start,
        end,
        label: Millimeters(length).rounded().0 as i64,
        dim_line: Line::new(p(start, dim_line), p(end, dim_line)),
        leaders: [
            Line::new(p(start, anchor_edge), p(start, dim_line)),
            Line::new(p(end, anchor_edge), p(end, dim_line)),
        ],
        terminators,
        label_anchor: p((start + end) / 2.0, dim_line + side * style.label_margin),
        label_side: side,
    }
}

/// Sort breakpoints and drop coincident ones.
///
/// Zero overhangs or setbacks put two breakpoints on the same coordinate;
/// merging them keeps the chain free of zero-length segments.
pub fn chain_breakpoints(points: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut sorted: Vec<f64> = points.into_iter().collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup_by(|next, kept| (*next - *kept).abs() <= COINCIDENT_TOLERANCE_MM);
    sorted
}

/// Sum of the unrounded segment lengths
pub fn chain_total(segments: &[DimensionSegment]) -> f64 {
    segments.iter().map(DimensionSegment::length).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal(boundaries: &[f64]) -> Vec<DimensionSegment> {
        build_chain(boundaries, ChainAxis::Horizontal, 2120.0, 2000.0, &ChainStyle::default()).unwrap()
    }

    #[test]
    fn test_scenario_d_equal_cells() {
        let segments = horizontal(&[0.0, 3110.0, 6220.0, 9330.0]);
        assert_eq!(segments.len(), 3);
        for seg in &segments {
            assert_eq!(seg.label, 3110);
            for leader in &seg.leaders {
                assert_eq!(leader.from.y, 2000.0);
                assert_eq!(leader.to.y, 2120.0);
            }
        }
        // Shared boundary gets a leader from both neighbours
        assert_eq!(segments[0].leaders[1], segments[1].leaders[0]);
    }

    #[test]
    fn test_too_few_boundaries() {
        let err = build_chain(&[0.0], ChainAxis::Horizontal, 1.0, 0.0, &ChainStyle::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CHAIN");
        assert!(build_chain(&[], ChainAxis::Vertical, 1.0, 0.0, &ChainStyle::default()).is_err());
    }

    #[test]
    fn test_non_increasing_rejected() {
        assert!(build_chain(&[0.0, 10.0, 10.0], ChainAxis::Horizontal, 1.0, 0.0, &ChainStyle::default()).is_err());
        assert!(build_chain(&[10.0, 0.0], ChainAxis::Horizontal, 1.0, 0.0, &ChainStyle::default()).is_err());
        assert!(build_chain(&[0.0, f64::NAN], ChainAxis::Horizontal, 1.0, 0.0, &ChainStyle::default()).is_err());
    }

    #[test]
    fn test_label_rounding() {
        let segments = horizontal(&[0.0, 3110.5, 6221.0]);
        assert_eq!(segments[0].label, 3111);
        assert_eq!(segments[1].label, 3111);
        assert!((chain_total(&segments) - 6221.0).abs() < 1e-9);
    }

    #[test]
    fn test_label_side_follows_offset_direction() {
        let above = horizontal(&[0.0, 100.0]);
        assert_eq!(above[0].label_side, 1.0);
        assert_eq!(above[0].label_anchor, Point::new(50.0, 2150.0));

        let below = build_chain(&[0.0, 100.0], ChainAxis::Horizontal, -120.0, 0.0, &ChainStyle::default()).unwrap();
        assert_eq!(below[0].label_side, -1.0);
        assert_eq!(below[0].label_anchor.y, -150.0);
    }

    #[test]
    fn test_vertical_chain_swaps_axes() {
        let segments = build_chain(&[0.0, 2000.0], ChainAxis::Vertical, -120.0, 0.0, &ChainStyle::default()).unwrap();
        let seg = &segments[0];
        assert_eq!(seg.label, 2000);
        assert_eq!(seg.dim_line, Line::new(Point::new(-120.0, 0.0), Point::new(-120.0, 2000.0)));
        assert_eq!(seg.leaders[1], Line::new(Point::new(0.0, 2000.0), Point::new(-120.0, 2000.0)));
        assert_eq!(seg.label_anchor, Point::new(-150.0, 1000.0));
    }

    #[test]
    fn test_arrow_terminators_point_inward() {
        let segments = horizontal(&[0.0, 1000.0]);
        let t = &segments[0].terminators;
        assert_eq!(t.len(), 4);
        assert_eq!(t[0].from, Point::new(0.0, 2120.0));
        assert_eq!(t[0].to.x, 80.0);
        assert_eq!(t[2].from, Point::new(1000.0, 2120.0));
        assert_eq!(t[2].to.x, 920.0);
    }

    #[test]
    fn test_short_segment_arrows_flip_outward() {
        let segments = horizontal(&[0.0, 60.0]);
        let t = &segments[0].terminators;
        assert_eq!(t[0].to.x, -80.0);
        assert_eq!(t[2].to.x, 140.0);
    }

    #[test]
    fn test_tick_terminators_are_45_degrees() {
        let style = ChainStyle {
            terminator: TerminatorStyle::Tick,
            ..ChainStyle::default()
        };
        let segments = build_chain(&[0.0, 500.0], ChainAxis::Horizontal, 120.0, 0.0, &style).unwrap();
        let t = &segments[0].terminators;
        assert_eq!(t.len(), 2);
        for tick in t {
            let dx = tick.to.x - tick.from.x;
            let dy = tick.to.y - tick.from.y;
            assert!((dx - dy).abs() < 1e-12);
            assert!((tick.length() - 80.0).abs() < 1e-9);
        }
        // Slash is centred on the dimension line at each endpoint
        assert!(((t[0].from.x + t[0].to.x) / 2.0).abs() < 1e-12);
        assert!(((t[1].from.y + t[1].to.y) / 2.0 - 120.0).abs() < 1e-12);
    }

    #[test]
    fn test_breakpoints_merge_coincident() {
        let points = chain_breakpoints([9450.0, 0.0, -0.0, 60.0, 60.0, 3170.0]);
        assert_eq!(points, vec![-0.0, 60.0, 3170.0, 9450.0]);
        assert!(build_chain(&points, ChainAxis::Horizontal, 1.0, 0.0, &ChainStyle::default()).is_ok());
    }
}
