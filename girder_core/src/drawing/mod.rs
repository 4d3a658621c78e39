//! # Drawing
//!
//! - [`style`] - versioned renderer configuration
//! - [`primitives`] - lines, polygons, labels and the finished drawing
//! - [`render`] - orthographic and oblique section views

pub mod primitives;
pub mod render;
pub mod style;

pub use primitives::{BoundingBox, Fill, Primitive, RenderedDrawing, Stroke, TextAnchor, TextLabel};
pub use render::{render, section_chains, SectionChains, ViewMode, DEFAULT_SEGMENT_LENGTH_MM};
pub use style::{parse_hex_color, DrawingStyle, TerminatorStyle, STYLE_VERSION};
