//! Type-safe length units for interferometry
//!
//! All optical-path quantities in this crate are nanometers and the ToF
//! sensor is specified in millimeters; routing the conversion through `uom`
//! keeps the mm-to-nm scale factor out of the numeric code, where it has
//! historically been the easiest place to lose six orders of magnitude.

use uom::si::f64::Length;
use uom::si::length::{millimeter, nanometer};

/// Extension trait for the length conversions used in optics
pub trait LengthExt {
    /// Create length from nanometers (wavelengths, OPD)
    fn from_nanometers(nm: f64) -> Self;

    /// Get length in nanometers
    fn as_nanometers(&self) -> f64;

    /// Create length from millimeters (ToF precision)
    fn from_millimeters(mm: f64) -> Self;

    /// Get length in millimeters
    fn as_millimeters(&self) -> f64;
}

impl LengthExt for Length {
    fn from_nanometers(nm: f64) -> Self {
        Length::new::<nanometer>(nm)
    }

    fn as_nanometers(&self) -> f64 {
        self.get::<nanometer>()
    }

    fn from_millimeters(mm: f64) -> Self {
        Length::new::<millimeter>(mm)
    }

    fn as_millimeters(&self) -> f64 {
        self.get::<millimeter>()
    }
}
