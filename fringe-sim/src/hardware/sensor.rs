//! Quadrature tap layouts and frozen per-tap calibration.
//!
//! The interference sensor reads the same interferometer output through
//! several taps, each at a fixed nominal phase offset. Manufacturing spread
//! perturbs both the offsets and the per-tap gains; those imperfections are
//! fixed-pattern, not per-shot, so they are drawn exactly once per
//! configuration load and reused unchanged by every subsequent simulated
//! measurement.

use ndarray::{array, Array1};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

use crate::error::MetrologyError;

/// Nominal single-cycle quadrature layout {0, pi/2, pi, 3pi/2}
pub fn quadrature_layout() -> Array1<f64> {
    array![0.0, 0.5, 1.0, 1.5] * PI
}

/// Nominal 8-tap layout: two quadrature cycles, the second a full two turns
/// later, giving the estimator a second independent noise realization of the
/// same nominal phase set.
pub fn double_quadrature_layout() -> Array1<f64> {
    array![0.0, 0.5, 1.0, 1.5, 4.0, 4.5, 5.0, 5.5] * PI
}

/// One realization of the per-tap phase offsets and gains.
#[derive(Debug, Clone, PartialEq)]
pub struct TapCalibration {
    phases: Array1<f64>,
    gains: Array1<f64>,
}

impl TapCalibration {
    /// Perturb a nominal layout once: `phase_i ~ Normal(nominal_i, phase_std)`
    /// and `gain_i ~ Normal(1, gain_std)`, independently per tap.
    pub fn draw(
        nominal_phases: &Array1<f64>,
        phase_std: f64,
        gain_std: f64,
        rng: &mut impl Rng,
    ) -> Result<Self, MetrologyError> {
        // Normal::new accepts a negative std, so the signs are checked here
        if !(phase_std >= 0.0) {
            return Err(MetrologyError::InvalidParameter(format!(
                "tap phase deviation must be finite and non-negative, got {phase_std}"
            )));
        }
        if !(gain_std >= 0.0) {
            return Err(MetrologyError::InvalidParameter(format!(
                "tap gain deviation must be finite and non-negative, got {gain_std}"
            )));
        }
        let phase_jitter = Normal::new(0.0, phase_std).map_err(|_| {
            MetrologyError::InvalidParameter(format!(
                "tap phase deviation must be finite and non-negative, got {phase_std}"
            ))
        })?;
        let gain_spread = Normal::new(1.0, gain_std).map_err(|_| {
            MetrologyError::InvalidParameter(format!(
                "tap gain deviation must be finite and non-negative, got {gain_std}"
            ))
        })?;

        let phases = nominal_phases.mapv(|nominal| nominal + phase_jitter.sample(rng));
        let gains = Array1::from_shape_fn(nominal_phases.len(), |_| gain_spread.sample(rng));
        Ok(Self { phases, gains })
    }

    /// Perfect calibration: nominal phases, unit gains. Used for noiseless
    /// reference sensors.
    pub fn ideal(nominal_phases: &Array1<f64>) -> Self {
        Self {
            gains: Array1::ones(nominal_phases.len()),
            phases: nominal_phases.clone(),
        }
    }

    pub fn n_taps(&self) -> usize {
        self.phases.len()
    }

    /// Frozen per-tap phase offsets in radians
    pub fn phases(&self) -> &Array1<f64> {
        &self.phases
    }

    /// Frozen per-tap gains (nominal 1.0)
    pub fn gains(&self) -> &Array1<f64> {
        &self.gains
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn layouts_have_expected_shapes() {
        assert_eq!(quadrature_layout().len(), 4);
        assert_eq!(double_quadrature_layout().len(), 8);
        assert_relative_eq!(double_quadrature_layout()[4], 4.0 * PI);
        // First cycle of the 8-tap layout is the plain quadrature layout
        for (a, b) in quadrature_layout()
            .iter()
            .zip(double_quadrature_layout().iter())
        {
            assert_relative_eq!(a, b);
        }
    }

    #[test]
    fn draw_keeps_parallel_lengths() {
        let mut rng = StdRng::seed_from_u64(11);
        let cal = TapCalibration::draw(&double_quadrature_layout(), 0.1, 0.1, &mut rng).unwrap();
        assert_eq!(cal.n_taps(), 8);
        assert_eq!(cal.phases().len(), cal.gains().len());
    }

    #[test]
    fn zero_deviations_reproduce_nominal() {
        let mut rng = StdRng::seed_from_u64(12);
        let cal = TapCalibration::draw(&quadrature_layout(), 0.0, 0.0, &mut rng).unwrap();
        for (drawn, nominal) in cal.phases().iter().zip(quadrature_layout().iter()) {
            assert_relative_eq!(drawn, nominal);
        }
        for gain in cal.gains() {
            assert_relative_eq!(*gain, 1.0);
        }
    }

    #[test]
    fn negative_deviation_is_rejected() {
        let mut rng = StdRng::seed_from_u64(13);
        assert!(matches!(
            TapCalibration::draw(&quadrature_layout(), -0.1, 0.0, &mut rng),
            Err(MetrologyError::InvalidParameter(_))
        ));
        assert!(matches!(
            TapCalibration::draw(&quadrature_layout(), 0.0, -0.1, &mut rng),
            Err(MetrologyError::InvalidParameter(_))
        ));
    }
}
