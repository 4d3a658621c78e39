//! # Section Layout
//!
//! Converts [`SectionParameters`] into concrete coordinates: outer and
//! internal web positions, flange regions and the deck overhang.
//!
//! ## Rounding policy
//!
//! Cell width and deck overhang are rounded to whole millimetres with
//! round-half-away-from-zero ([`Millimeters::rounded`]). Internal webs step by
//! the rounded cell width from the left outer web, and the outer webs stay
//! where the setback puts them, so the last cell absorbs the remainder. The
//! outline and every dimension chain read positions from the same [`Layout`],
//! which keeps them in agreement.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::section::{compute_layout, SectionParameters};
//!
//! let layout = compute_layout(&SectionParameters::default()).unwrap();
//! assert_eq!(layout.cell_width, 3110.0);
//! assert_eq!(layout.internal_web_xs, vec![3170.0, 6280.0]);
//! assert_eq!(layout.overhang, 2025.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{SectionError, SectionResult};
use crate::geometry::{Point, Rect};
use crate::section::params::SectionParameters;
use crate::units::{Meters, Millimeters};

/// Shaded regions of one flange plate.
///
/// `band` spans the full box width at the plate thickness; `left` and `right`
/// are the cantilevers beyond the outer webs and are empty when the overhang
/// is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlangeRegions {
    pub band: Rect,
    pub left: Rect,
    pub right: Rect,
}

/// Derived geometry of a box-girder cross-section (mm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub box_width: f64,
    pub height: f64,
    pub top_thickness: f64,
    pub bottom_thickness: f64,
    pub web_thickness: f64,
    pub cell_count: u32,
    pub dimension_gap: f64,

    /// `box_width - 2 * web_setback`
    pub clear_width: f64,
    /// Rounded nominal cell width
    pub cell_width: f64,
    /// Left outer web
    pub x_left: f64,
    /// Right outer web
    pub x_right: f64,
    /// Internal webs, left to right (`cell_count - 1` entries)
    pub internal_web_xs: Vec<f64>,

    /// Deck width rounded to whole millimetres
    pub deck_width_mm: f64,
    /// Symmetric deck overhang beyond the box edges, clamped at zero
    pub overhang: f64,

    pub top_flange: FlangeRegions,
    pub bottom_flange: FlangeRegions,
}

impl Layout {
    /// All web x-positions, outer pair included, left to right
    pub fn web_xs(&self) -> Vec<f64> {
        let mut xs = Vec::with_capacity(self.internal_web_xs.len() + 2);
        xs.push(self.x_left);
        xs.extend(self.internal_web_xs.iter().copied());
        xs.push(self.x_right);
        xs
    }

    /// Cell boundaries from the left outer web to the right outer web.
    ///
    /// Same positions as [`Layout::web_xs`]; named separately because chains
    /// read them as dimension breakpoints.
    pub fn cell_boundaries(&self) -> Vec<f64> {
        self.web_xs()
    }

    /// Drawn width of every cell; the last one carries the rounding remainder
    pub fn cell_widths(&self) -> Vec<f64> {
        self.cell_boundaries().windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Width of the rightmost cell
    pub fn last_cell_width(&self) -> f64 {
        let last_internal = self.internal_web_xs.last().copied().unwrap_or(self.x_left);
        self.x_right - last_internal
    }

    /// Top end of the webs (underside of the top flange)
    pub fn web_top_y(&self) -> f64 {
        self.height - self.top_thickness
    }

    /// Bottom end of the webs (top of the bottom flange)
    pub fn web_bottom_y(&self) -> f64 {
        self.bottom_thickness
    }

    /// Total number of webs
    pub fn web_count(&self) -> usize {
        self.internal_web_xs.len() + 2
    }

    /// Consistency check run by the renderer before it draws anything.
    pub fn validate(&self) -> SectionResult<()> {
        let scalars = [
            self.box_width,
            self.height,
            self.top_thickness,
            self.bottom_thickness,
            self.cell_width,
            self.x_left,
            self.x_right,
            self.overhang,
            self.dimension_gap,
        ];
        if scalars.iter().any(|v| !v.is_finite()) || self.internal_web_xs.iter().any(|v| !v.is_finite()) {
            return Err(SectionError::layout("layout contains non-finite coordinates"));
        }
        if self.x_left >= self.x_right {
            return Err(SectionError::layout(format!(
                "outer webs crossed: x_left {} >= x_right {}",
                self.x_left, self.x_right
            )));
        }
        if self.x_left < 0.0 || self.x_right > self.box_width {
            return Err(SectionError::layout("outer webs lie outside the box"));
        }
        if self.cell_count < 1 || self.internal_web_xs.len() + 1 != self.cell_count as usize {
            return Err(SectionError::layout(format!(
                "{} internal webs do not match {} cells",
                self.internal_web_xs.len(),
                self.cell_count
            )));
        }
        if self.cell_boundaries().windows(2).any(|w| w[1] <= w[0]) {
            return Err(SectionError::layout("web positions are not strictly increasing"));
        }
        if self.overhang < 0.0 {
            return Err(SectionError::layout(format!("negative deck overhang {}", self.overhang)));
        }
        if self.height <= 0.0 || self.web_bottom_y() >= self.web_top_y() {
            return Err(SectionError::layout("flanges leave no web depth"));
        }
        if self.dimension_gap <= 0.0 {
            return Err(SectionError::layout("dimension gap must be positive"));
        }
        Ok(())
    }
}

fn flange_regions(layout_x: (f64, f64), box_width: f64, y0: f64, y1: f64, overhang: f64) -> FlangeRegions {
    let (x_left, x_right) = layout_x;
    FlangeRegions {
        band: Rect::from_corners(Point::new(0.0, y0), Point::new(box_width, y1)),
        left: Rect::from_corners(Point::new(x_left - overhang, y0), Point::new(x_left, y1)),
        right: Rect::from_corners(Point::new(x_right, y0), Point::new(x_right + overhang, y1)),
    }
}

/// Compute the cross-section layout.
///
/// Fails with [`SectionError::GeometryError`] when the parameters are invalid
/// or when the rounded cell width cannot place every internal web strictly
/// between the outer webs. Pure function: identical input gives identical
/// output.
pub fn compute_layout(params: &SectionParameters) -> SectionResult<Layout> {
    params.validate()?;

    let clear_width = params.clear_width();
    let cell_width = (Millimeters(clear_width) / f64::from(params.cell_count)).rounded().0;
    let x_left = params.web_setback;
    let x_right = params.box_width - params.web_setback;

    if cell_width <= 0.0 {
        return Err(SectionError::geometry(
            "cell_count",
            params.cell_count.to_string(),
            format!("cell width rounds to a degenerate cell for clear width {}", clear_width),
        ));
    }

    let internal_web_xs: Vec<f64> = (1..params.cell_count)
        .map(|i| x_left + f64::from(i) * cell_width)
        .collect();

    if let Some(&last) = internal_web_xs.last() {
        if last >= x_right {
            return Err(SectionError::geometry(
                "cell_count",
                params.cell_count.to_string(),
                format!("cell width rounds to a degenerate cell: last internal web {} >= {}", last, x_right),
            ));
        }
    }

    let deck_width_mm = Millimeters::from(Meters(params.deck_width)).rounded().0;
    let raw_overhang = (Millimeters(deck_width_mm - params.box_width) / 2.0).rounded().0;
    let overhang = if raw_overhang > 0.0 { raw_overhang } else { 0.0 };
    if raw_overhang < 0.0 {
        warn!(
            deck_width_mm,
            box_width = params.box_width,
            "box is wider than the deck, overhang clamped to 0"
        );
    }

    let top_flange = flange_regions(
        (x_left, x_right),
        params.box_width,
        params.height - params.top_thickness,
        params.height,
        params.top_overhang,
    );
    let bottom_flange = flange_regions(
        (x_left, x_right),
        params.box_width,
        0.0,
        params.bottom_thickness,
        params.bottom_overhang,
    );

    debug!(
        clear_width,
        cell_width,
        x_left,
        x_right,
        overhang,
        internal_webs = internal_web_xs.len(),
        "computed section layout"
    );

    Ok(Layout {
        box_width: params.box_width,
        height: params.height,
        top_thickness: params.top_thickness,
        bottom_thickness: params.bottom_thickness,
        web_thickness: params.web_thickness,
        cell_count: params.cell_count,
        dimension_gap: params.dimension_gap,
        clear_width,
        cell_width,
        x_left,
        x_right,
        internal_web_xs,
        deck_width_mm,
        overhang,
        top_flange,
        bottom_flange,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scenario_a() -> SectionParameters {
        SectionParameters {
            box_width: 9450.0,
            web_setback: 60.0,
            cell_count: 3,
            ..SectionParameters::default()
        }
    }

    #[test]
    fn test_scenario_a_web_positions() {
        let layout = compute_layout(&scenario_a()).unwrap();
        assert_eq!(layout.clear_width, 9330.0);
        assert_eq!(layout.cell_width, 3110.0);
        assert_eq!(layout.internal_web_xs, vec![3170.0, 6280.0]);
        assert_eq!(layout.x_left, 60.0);
        assert_eq!(layout.x_right, 9390.0);
    }

    #[test]
    fn test_scenario_b_overhang() {
        let params = SectionParameters {
            deck_width: 13.5,
            box_width: 9450.0,
            ..SectionParameters::default()
        };
        let layout = compute_layout(&params).unwrap();
        assert_eq!(layout.deck_width_mm, 13500.0);
        assert_eq!(layout.overhang, 2025.0);
    }

    #[test]
    fn test_scenario_c_degenerate_clear_width() {
        let params = SectionParameters {
            box_width: 5000.0,
            web_setback: 2600.0,
            ..SectionParameters::default()
        };
        match compute_layout(&params) {
            Err(SectionError::GeometryError { reason, .. }) => {
                assert!(reason.contains("degenerate clear width"))
            }
            other => panic!("expected GeometryError, got {:?}", other),
        }
    }

    #[test]
    fn test_single_cell_has_no_internal_webs() {
        let params = SectionParameters {
            cell_count: 1,
            ..SectionParameters::default()
        };
        let layout = compute_layout(&params).unwrap();
        assert!(layout.internal_web_xs.is_empty());
        assert_eq!(layout.cell_widths(), vec![layout.x_right - layout.x_left]);
        assert_eq!(layout.web_count(), 2);
    }

    #[test]
    fn test_last_cell_absorbs_remainder() {
        // 9331 / 3 = 3110.33 -> 3110; last cell is 3111
        let params = SectionParameters {
            box_width: 9451.0,
            ..scenario_a()
        };
        let layout = compute_layout(&params).unwrap();
        assert_eq!(layout.cell_width, 3110.0);
        assert_eq!(layout.cell_widths(), vec![3110.0, 3110.0, 3111.0]);
        assert_eq!(layout.last_cell_width(), 3111.0);
        assert_eq!(layout.x_right, 9391.0);
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        // clear width 9331 over 2 cells = 4665.5 -> 4666, last cell 4665
        let params = SectionParameters {
            box_width: 9451.0,
            cell_count: 2,
            ..scenario_a()
        };
        let layout = compute_layout(&params).unwrap();
        assert_eq!(layout.cell_width, 4666.0);
        assert_eq!(layout.last_cell_width(), 4665.0);
    }

    #[test]
    fn test_overhang_clamps_when_box_wider_than_deck() {
        let params = SectionParameters {
            deck_width: 8.0,
            box_width: 9450.0,
            ..SectionParameters::default()
        };
        let layout = compute_layout(&params).unwrap();
        assert_eq!(layout.overhang, 0.0);
    }

    #[test]
    fn test_tiny_clear_width_with_many_cells_fails() {
        let params = SectionParameters {
            box_width: 121.0,
            web_setback: 60.0,
            cell_count: 4,
            top_overhang: 0.0,
            bottom_overhang: 0.0,
            ..SectionParameters::default()
        };
        assert!(matches!(compute_layout(&params), Err(SectionError::GeometryError { .. })));
    }

    #[test]
    fn test_flange_regions_stay_outside_cells() {
        let layout = compute_layout(&SectionParameters::default()).unwrap();
        for flange in [layout.top_flange, layout.bottom_flange] {
            assert!(!flange.left.overlaps_x(layout.x_left, layout.x_right));
            assert!(!flange.right.overlaps_x(layout.x_left, layout.x_right));
        }
        assert_eq!(layout.top_flange.left.x0, 60.0 - 145.0);
        assert_eq!(layout.top_flange.band.y0, 2000.0 - 22.0);
        assert_eq!(layout.bottom_flange.right.x1, 9390.0 + 60.0);
        assert_eq!(layout.bottom_flange.band.y1, 16.0);
    }

    #[test]
    fn test_validate_detects_crossed_webs() {
        let mut layout = compute_layout(&SectionParameters::default()).unwrap();
        layout.x_left = layout.x_right + 1.0;
        assert!(matches!(layout.validate(), Err(SectionError::LayoutError { .. })));
    }

    #[test]
    fn test_validate_detects_web_count_mismatch() {
        let mut layout = compute_layout(&SectionParameters::default()).unwrap();
        layout.internal_web_xs.pop();
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_layout_serializes() {
        let layout = compute_layout(&SectionParameters::default()).unwrap();
        let json = serde_json::to_string(&layout).unwrap();
        assert!(json.contains("internal_web_xs"));
        assert!(json.contains("\"overhang\":2025.0"));
    }

    fn valid_params() -> impl Strategy<Value = SectionParameters> {
        (2000.0f64..20000.0, 0.0f64..400.0, 1u32..=6, 4.0f64..25.0).prop_map(
            |(box_width, web_setback, cell_count, deck_width)| SectionParameters {
                deck_width,
                box_width: box_width.round(),
                web_setback: web_setback.round(),
                cell_count,
                ..SectionParameters::default()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_cells_close_on_outer_webs(params in valid_params()) {
            let layout = compute_layout(&params).unwrap();
            let total: f64 = layout.cell_widths().iter().sum();
            prop_assert!((total - (layout.x_right - layout.x_left)).abs() < 1e-6);
            let widths = layout.cell_widths();
            for w in &widths[..widths.len() - 1] {
                prop_assert_eq!(*w, layout.cell_width);
            }
            let remainder = layout.last_cell_width() - layout.cell_width;
            prop_assert!(remainder.abs() <= f64::from(params.cell_count) * 0.5 + 1e-9);
        }

        #[test]
        fn prop_overhang_non_negative(params in valid_params()) {
            let layout = compute_layout(&params).unwrap();
            prop_assert!(layout.overhang >= 0.0);
        }

        #[test]
        fn prop_outer_webs_symmetric(params in valid_params()) {
            let layout = compute_layout(&params).unwrap();
            prop_assert_eq!(layout.x_left + layout.x_right, params.box_width);
        }

        #[test]
        fn prop_idempotent(params in valid_params()) {
            let a = compute_layout(&params).unwrap();
            let b = compute_layout(&params).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_layout_passes_own_validation(params in valid_params()) {
            let layout = compute_layout(&params).unwrap();
            prop_assert!(layout.validate().is_ok());
        }
    }
}
