//! # Cross-Section Model
//!
//! - [`params`] - the input record handed over by the thickness solver
//! - [`layout`] - derived coordinates (webs, flanges, overhang)
//!
//! Every render rebuilds the layout from the parameters; nothing is cached.

pub mod layout;
pub mod params;

pub use layout::{compute_layout, FlangeRegions, Layout};
pub use params::SectionParameters;
