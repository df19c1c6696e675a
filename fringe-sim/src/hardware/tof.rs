//! Time-of-flight ranging sensor model.
//!
//! The ToF channel reads the same OPD as the interferometer but at far
//! coarser precision; it exists to disambiguate the interferometer's 2*pi
//! phase wraps. Readings are the true OPD plus Gaussian ranging noise. The
//! instrument datasheet quotes precision in millimeters while all optical
//! quantities here are nanometers, so the conversion goes through
//! [`crate::units`] instead of a literal scale factor.

use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use uom::si::f64::Length;

use crate::error::MetrologyError;
use crate::units::LengthExt;

/// Gaussian ranging-noise model for the ToF sensor.
#[derive(Debug, Clone, Copy)]
pub struct TofSensor {
    sigma_nm: f64,
}

impl TofSensor {
    /// Build from the datasheet 1-sigma precision in mm.
    pub fn new(precision_mm: f64) -> Result<Self, MetrologyError> {
        if !(precision_mm.is_finite() && precision_mm >= 0.0) {
            return Err(MetrologyError::InvalidParameter(format!(
                "ToF precision must be finite and non-negative, got {precision_mm} mm"
            )));
        }
        let sigma_nm = Length::from_millimeters(precision_mm).as_nanometers();
        Ok(Self { sigma_nm })
    }

    /// Ranging noise std in nm
    pub fn sigma_nm(&self) -> f64 {
        self.sigma_nm
    }

    /// One noisy reading per true OPD, redrawn on every call.
    pub fn measure(&self, opd_nm: &[f64], rng: &mut impl Rng) -> Array1<f64> {
        let noise = Normal::new(0.0, self.sigma_nm)
            .expect("ToF sigma validated non-negative at construction");
        Array1::from_shape_fn(opd_nm.len(), |n| opd_nm[n] + noise.sample(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn millimeter_precision_becomes_nanometer_sigma() {
        let tof = TofSensor::new(0.001).unwrap();
        assert_relative_eq!(tof.sigma_nm(), 1_000.0);
        let tof = TofSensor::new(2.5).unwrap();
        assert_relative_eq!(tof.sigma_nm(), 2.5e6);
    }

    #[test]
    fn zero_precision_reads_exactly() {
        let tof = TofSensor::new(0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let opd = [0.0, 100.0, -250.5];
        let readings = tof.measure(&opd, &mut rng);
        for (reading, truth) in readings.iter().zip(opd) {
            assert_relative_eq!(*reading, truth);
        }
    }

    #[test]
    fn rejects_negative_precision() {
        assert!(matches!(
            TofSensor::new(-0.1),
            Err(MetrologyError::InvalidParameter(_))
        ));
    }
}
