//! # Unit Types
//!
//! Lightweight newtype wrappers for the lengths this crate handles. The deck
//! width arrives in metres, every other length in millimetres, and exports
//! convert paper millimetres to pixels through inches.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::units::{Meters, Millimeters};
//!
//! let deck = Meters(13.5);
//! let deck_mm: Millimeters = deck.into();
//! assert_eq!(deck_mm.0, 13500.0);
//! assert_eq!(Millimeters(3109.5).rounded().0, 3110.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Millimetres per inch, used when sizing raster output by DPI
pub const MM_PER_INCH: f64 = 25.4;

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Millimeters> for Inches {
    fn from(mm: Millimeters) -> Self {
        Inches(mm.0 / MM_PER_INCH)
    }
}

impl From<Inches> for Millimeters {
    fn from(inches: Inches) -> Self {
        Millimeters(inches.0 * MM_PER_INCH)
    }
}

impl Millimeters {
    /// Round to the nearest whole millimetre, halves away from zero.
    ///
    /// This is the single rounding rule for every derived dimension: cell
    /// width, deck overhang and chain labels all go through it.
    pub fn rounded(self) -> Self {
        Millimeters(self.0.round())
    }
}

impl Inches {
    /// Number of device pixels covered at the given resolution
    pub fn to_pixels(self, dpi: f64) -> f64 {
        self.0 * dpi
    }
}

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(Inches);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_millimeters() {
        let mm: Millimeters = Meters(13.5).into();
        assert_eq!(mm.0, 13500.0);
        let back: Meters = mm.into();
        assert_eq!(back.0, 13.5);
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(Millimeters(2024.5).rounded().0, 2025.0);
        assert_eq!(Millimeters(-2024.5).rounded().0, -2025.0);
        assert_eq!(Millimeters(3109.49).rounded().0, 3109.0);
    }

    #[test]
    fn test_inches_to_pixels() {
        let inches: Inches = Millimeters(25.4).into();
        assert!((inches.to_pixels(200.0) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = Millimeters(9450.0);
        let b = Millimeters(60.0);
        assert_eq!((a - b * 2.0).0, 9330.0);
        assert_eq!((a / 3.0).0, 3150.0);
        assert_eq!((a + b).value(), 9510.0);
    }
}
