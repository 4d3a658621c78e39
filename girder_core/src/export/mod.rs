//! # Export
//!
//! - [`svg`] - vector output, y flipped into SVG coordinates
//! - [`png`] - raster output at the style's DPI
//! - [`pdf`] - one-page calculation sheet
//!
//! File names and MIME types match what downstream consumers expect for a
//! downloaded section image.

pub mod pdf;
pub mod png;
pub mod svg;

pub use pdf::{render_section_pdf, SheetInfo};
pub use png::{to_png, MAX_PIXMAP_DIM};
pub use svg::{pixel_size, to_svg};

pub const PNG_FILE_NAME: &str = "steel_box_section.png";
pub const PNG_MIME: &str = "image/png";

pub const SVG_FILE_NAME: &str = "steel_box_section.svg";
pub const SVG_MIME: &str = "image/svg+xml";

pub const PDF_FILE_NAME: &str = "steel_box_section.pdf";
pub const PDF_MIME: &str = "application/pdf";
