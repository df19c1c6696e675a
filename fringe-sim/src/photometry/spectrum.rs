//! Monte-Carlo spectral ensemble for a finite-linewidth laser source.
//!
//! A real laser line is not monochromatic; rather than convolving the fringe
//! model with an assumed line shape, the forward model treats the line as an
//! incoherent mixture of ideal monochromatic waves. Each ensemble member is
//! one wavenumber drawn around the nominal wavelength, and averaging the
//! fringe intensity over the ensemble reproduces the contrast loss caused by
//! the finite spectral width, independent of any line-shape assumption.

use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::MetrologyError;

/// Frozen sample of wavenumbers representing one laser line.
#[derive(Debug, Clone)]
pub struct SpectralEnsemble {
    wavenumbers: Array1<f64>,
}

impl SpectralEnsemble {
    /// Draw `samples` wavenumbers `2*pi / Normal(wavelength, bandwidth/2)`.
    ///
    /// # Arguments
    /// * `wavelength_nm` - nominal wavelength, must be positive
    /// * `bandwidth_nm` - spectral bandwidth, must be non-negative
    /// * `samples` - ensemble size, must be at least 1
    /// * `rng` - random source for the wavelength draws
    pub fn draw(
        wavelength_nm: f64,
        bandwidth_nm: f64,
        samples: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, MetrologyError> {
        if !(wavelength_nm > 0.0) {
            return Err(MetrologyError::InvalidParameter(format!(
                "spectral ensemble wavelength must be positive, got {wavelength_nm}"
            )));
        }
        if samples < 1 {
            return Err(MetrologyError::InvalidParameter(
                "spectral ensemble needs at least one sample".to_string(),
            ));
        }
        // Normal::new accepts a negative std, so the sign is checked here
        if !(bandwidth_nm >= 0.0) {
            return Err(MetrologyError::InvalidParameter(format!(
                "spectral bandwidth must be finite and non-negative, got {bandwidth_nm}"
            )));
        }
        let line = Normal::new(wavelength_nm, 0.5 * bandwidth_nm).map_err(|_| {
            MetrologyError::InvalidParameter(format!(
                "spectral bandwidth must be finite and non-negative, got {bandwidth_nm}"
            ))
        })?;

        let wavenumbers =
            Array1::from_shape_fn(samples, |_| std::f64::consts::TAU / line.sample(rng));
        Ok(Self { wavenumbers })
    }

    /// Ensemble size M
    pub fn len(&self) -> usize {
        self.wavenumbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavenumbers.is_empty()
    }

    /// Sampled wavenumbers in rad/nm
    pub fn wavenumbers(&self) -> &Array1<f64> {
        &self.wavenumbers
    }
}
