//! # girder_core - Steel Box-Girder Cross-Section Layout Engine
//!
//! `girder_core` turns the parameters of a multi-cell steel box girder into a
//! dimensioned engineering drawing. All inputs and outputs are
//! JSON-serializable so the engine can sit behind any front end.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: every render recomputes the layout from its parameters
//! - **One source of truth**: outline and dimension chains read the same
//!   rounded web positions, so labels always sum to the drawn widths
//! - **Rich Errors**: structured error types, raised before anything is drawn
//! - **Explicit style**: one versioned [`DrawingStyle`] passed to every call
//!
//! ## Quick Start
//!
//! ```rust
//! use girder_core::drawing::{render, DrawingStyle, ViewMode};
//! use girder_core::export::to_svg;
//! use girder_core::section::{compute_layout, SectionParameters};
//!
//! let layout = compute_layout(&SectionParameters::default()).unwrap();
//! let style = DrawingStyle::default();
//! let drawing = render(&layout, &style, ViewMode::Orthographic).unwrap();
//! let svg = to_svg(&drawing, &style);
//! assert!(svg.contains("B_box = 9450 mm"));
//! ```
//!
//! ## Modules
//!
//! - [`section`] - input parameters and the derived layout
//! - [`dimensions`] - dimension chain builder
//! - [`drawing`] - style, primitives and the section renderer
//! - [`export`] - SVG, PNG and PDF output
//! - [`geometry`] - points, lines and rectangles
//! - [`units`] - type-safe unit wrappers
//! - [`errors`] - structured error types
//! - [`file_io`] - JSON loading and atomic export writes

pub mod dimensions;
pub mod drawing;
pub mod errors;
pub mod export;
pub mod file_io;
pub mod geometry;
pub mod section;
pub mod units;

pub use drawing::{render, DrawingStyle, RenderedDrawing, ViewMode};
pub use errors::{SectionError, SectionResult};
pub use section::{compute_layout, Layout, SectionParameters};
