//! # Drawing Style
//!
//! One immutable, versioned configuration value carries every colour, line
//! width and annotation setting the renderer uses. Load it from JSON to
//! override any subset of fields; omitted fields keep their defaults.
//!
//! ```json
//! { "version": 1, "arrow_style": "Tick", "tick_length": 60.0, "dpi": 300.0 }
//! ```
//!
//! Line widths are paper points; they are converted to section millimetres at
//! export time through `paper_scale`, so a 1.0 pt line looks the same whatever
//! the size of the girder.

use serde::{Deserialize, Serialize};

use crate::errors::{SectionError, SectionResult};

/// Current style schema version
pub const STYLE_VERSION: u32 = 1;

/// Terminator drawn at both ends of every dimension segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerminatorStyle {
    /// Two inward-pointing barbs per end
    #[default]
    Arrow,
    /// Short 45 degree slash through the end point
    Tick,
}

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingStyle {
    /// Schema version, must equal [`STYLE_VERSION`]
    pub version: u32,

    /// Outline, web and dimension colour (`#rrggbb`)
    pub line_color: String,
    /// Front-face flange fill (`#rrggbb`)
    pub fill_color: String,
    /// Back-face flange fill in the oblique view (`#rrggbb`)
    pub back_fill_color: String,
    /// Front fill opacity, 0..=1
    pub fill_alpha: f64,
    /// Back fill opacity, 0..=1
    pub back_fill_alpha: f64,

    /// Terminator style for every dimension chain
    pub arrow_style: TerminatorStyle,
    /// Terminator size (section mm)
    pub tick_length: f64,
    /// Distance from the dimension line to its labels (section mm)
    pub label_margin: f64,
    /// Overrides the per-section dimension gap when set (section mm)
    pub dimension_gap: Option<f64>,
    /// Label height (section mm); defaults to 1.1% of the structure extent
    pub text_height: Option<f64>,

    /// Box outline width (pt)
    pub outline_width: f64,
    /// Web line width (pt)
    pub web_width: f64,
    /// Dimension, leader and terminator width (pt)
    pub dim_line_width: f64,
    /// Front/back connector width in the oblique view (pt)
    pub connector_width: f64,

    /// View margin as a multiple of the dimension gap
    pub margin_factor: f64,
    /// Font family used for every label
    pub font_family: String,

    /// Raster resolution (dots per inch of paper)
    pub dpi: f64,
    /// Drawing scale denominator (1:N)
    pub paper_scale: f64,
}

impl Default for DrawingStyle {
    fn default() -> Self {
        DrawingStyle {
            version: STYLE_VERSION,
            line_color: "#1a1a1a".to_string(),
            fill_color: "#c7d7ef".to_string(),
            back_fill_color: "#dbe8ff".to_string(),
            fill_alpha: 0.35,
            back_fill_alpha: 0.55,
            arrow_style: TerminatorStyle::Arrow,
            tick_length: 80.0,
            label_margin: 30.0,
            dimension_gap: None,
            text_height: None,
            outline_width: 1.2,
            web_width: 1.4,
            dim_line_width: 1.0,
            connector_width: 0.9,
            margin_factor: 1.0,
            font_family: "DejaVu Sans Mono".to_string(),
            dpi: 200.0,
            paper_scale: 50.0,
        }
    }
}

impl DrawingStyle {
    /// Validate the configuration.
    pub fn validate(&self) -> SectionResult<()> {
        if self.version != STYLE_VERSION {
            return Err(SectionError::config(format!(
                "unsupported style version {}, expected {}",
                self.version, STYLE_VERSION
            )));
        }

        for (name, color) in [
            ("line_color", &self.line_color),
            ("fill_color", &self.fill_color),
            ("back_fill_color", &self.back_fill_color),
        ] {
            if parse_hex_color(color).is_none() {
                return Err(SectionError::config(format!("{} '{}' is not a #rrggbb colour", name, color)));
            }
        }

        for (name, alpha) in [("fill_alpha", self.fill_alpha), ("back_fill_alpha", self.back_fill_alpha)] {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(SectionError::config(format!("{} {} outside 0..=1", name, alpha)));
            }
        }

        let positive = [
            ("tick_length", self.tick_length),
            ("outline_width", self.outline_width),
            ("web_width", self.web_width),
            ("dim_line_width", self.dim_line_width),
            ("connector_width", self.connector_width),
            ("dpi", self.dpi),
            ("paper_scale", self.paper_scale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SectionError::config(format!("{} must be positive, got {}", name, value)));
            }
        }

        if !(self.label_margin.is_finite() && self.label_margin >= 0.0) {
            return Err(SectionError::config("label_margin must not be negative"));
        }
        if !(self.margin_factor.is_finite() && self.margin_factor >= 0.0) {
            return Err(SectionError::config("margin_factor must not be negative"));
        }
        if let Some(gap) = self.dimension_gap {
            if !(gap.is_finite() && gap > 0.0) {
                return Err(SectionError::config(format!("dimension_gap must be positive, got {}", gap)));
            }
        }
        if let Some(height) = self.text_height {
            if !(height.is_finite() && height > 0.0) {
                return Err(SectionError::config(format!("text_height must be positive, got {}", height)));
            }
        }
        if self.font_family.trim().is_empty() {
            return Err(SectionError::config("font_family is empty"));
        }
        Ok(())
    }

    /// Dimension gap to use for a section whose own gap is `section_gap`
    pub fn effective_gap(&self, section_gap: f64) -> f64 {
        self.dimension_gap.unwrap_or(section_gap)
    }

    /// Convert a paper width in points to section millimetres at this scale
    pub fn points_to_section_mm(&self, points: f64) -> f64 {
        points / 72.0 * crate::units::MM_PER_INCH * self.paper_scale
    }
}

/// Parse a `#rrggbb` colour into its components
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
