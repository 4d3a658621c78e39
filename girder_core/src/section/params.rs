//! # Section Parameters
//!
//! The flat input record consumed by the layout engine. Plate thicknesses and
//! the cell count come from an external thickness solver; this crate only
//! checks that they describe a drawable section.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "deck_width": 13.5,
//!   "box_width": 9450.0,
//!   "height": 2000.0,
//!   "top_thickness": 22.0,
//!   "bottom_thickness": 16.0,
//!   "web_thickness": 14.0,
//!   "cell_count": 3,
//!   "top_overhang": 145.0,
//!   "bottom_overhang": 60.0,
//!   "web_setback": 60.0,
//!   "dimension_gap": 120.0
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{SectionError, SectionResult};

/// Input parameters for one cross-section render.
///
/// Units: `deck_width` in metres, every other length in millimetres. A
/// render call always receives the full record; there are no partial
/// updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionParameters {
    /// Total roadway width (m)
    pub deck_width: f64,

    /// Outer transverse width of the steel box (mm)
    pub box_width: f64,

    /// Girder height (mm)
    pub height: f64,

    /// Top flange plate thickness (mm)
    pub top_thickness: f64,

    /// Bottom flange plate thickness (mm)
    pub bottom_thickness: f64,

    /// Web plate thickness (mm), same for every web
    pub web_thickness: f64,

    /// Number of cells between the two outer webs (Nc)
    pub cell_count: u32,

    /// Top flange cantilever beyond the outer webs (mm)
    pub top_overhang: f64,

    /// Bottom flange cantilever beyond the outer webs (mm)
    pub bottom_overhang: f64,

    /// Inset of the outer webs from the box edge (mm)
    pub web_setback: f64,

    /// Offset of dimension lines from the structure (mm)
    pub dimension_gap: f64,
}

impl Default for SectionParameters {
    /// Three-cell reference scheme: 13.5 m deck, box at 70% of the deck.
    fn default() -> Self {
        SectionParameters {
            deck_width: 13.5,
            box_width: 9450.0,
            height: 2000.0,
            top_thickness: 22.0,
            bottom_thickness: 16.0,
            web_thickness: 14.0,
            cell_count: 3,
            top_overhang: 145.0,
            bottom_overhang: 60.0,
            web_setback: 60.0,
            dimension_gap: 120.0,
        }
    }
}

impl SectionParameters {
    /// Validate input parameters.
    ///
    /// Every check fails with [`SectionError::GeometryError`] so that a bad
    /// parameter set is rejected before any geometry or drawing work starts.
    pub fn validate(&self) -> SectionResult<()> {
        let lengths = [
            ("deck_width", self.deck_width),
            ("box_width", self.box_width),
            ("height", self.height),
            ("top_thickness", self.top_thickness),
            ("bottom_thickness", self.bottom_thickness),
            ("web_thickness", self.web_thickness),
            ("top_overhang", self.top_overhang),
            ("bottom_overhang", self.bottom_overhang),
            ("web_setback", self.web_setback),
            ("dimension_gap", self.dimension_gap),
        ];
        for (field, value) in lengths {
            if !value.is_finite() {
                return Err(SectionError::geometry(field, value.to_string(), "Value must be finite"));
            }
        }

        let positive = [
            ("deck_width", self.deck_width),
            ("box_width", self.box_width),
            ("height", self.height),
            ("top_thickness", self.top_thickness),
            ("bottom_thickness", self.bottom_thickness),
            ("web_thickness", self.web_thickness),
            ("dimension_gap", self.dimension_gap),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(SectionError::geometry(field, value.to_string(), "Value must be positive"));
            }
        }

        let non_negative = [
            ("top_overhang", self.top_overhang),
            ("bottom_overhang", self.bottom_overhang),
            ("web_setback", self.web_setback),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(SectionError::geometry(field, value.to_string(), "Value must not be negative"));
            }
        }

        if self.cell_count < 1 {
            return Err(SectionError::geometry(
                "cell_count",
                self.cell_count.to_string(),
                "At least one cell is required",
            ));
        }

        if 2.0 * self.web_setback >= self.box_width {
            return Err(SectionError::geometry(
                "web_setback",
                self.web_setback.to_string(),
                format!("degenerate clear width: box_width {} - 2 x web_setback <= 0", self.box_width),
            ));
        }

        if self.top_thickness + self.bottom_thickness >= self.height {
            return Err(SectionError::geometry(
                "height",
                self.height.to_string(),
                "Flange thicknesses leave no web depth",
            ));
        }

        Ok(())
    }

    /// Clear width between the outer webs (mm), unchecked
    pub fn clear_width(&self) -> f64 {
        self.box_width - 2.0 * self.web_setback
    }

    /// Number of webs, outer pair included
    pub fn web_count(&self) -> u32 {
        self.cell_count + 1
    }
}
