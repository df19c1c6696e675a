//! Circular error metric and the comparative estimator analysis driver.
//!
//! The driver reproduces the reference experiment: draw a batch of uniform
//! true phases, push the matching OPDs through a fresh 8-tap sensor with
//! realistic noise, estimate the phase with both tap strategies, and score
//! each estimate against ground truth with a wraparound-safe metric.

use log::info;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, RngCore, SeedableRng};
use std::f64::consts::TAU;

use crate::algo::sample_poisson_counts;
use crate::config::{ChannelId, LaserChannelSpec};
use crate::engine::expected_channel_rates;
use crate::error::MetrologyError;
use crate::estimator::{estimate_phase, TapStrategy};
use crate::hardware::sensor::{double_quadrature_layout, TapCalibration};
use crate::photometry::spectrum::SpectralEnsemble;

/// Distance between two phases mapped onto the unit circle.
///
/// `sqrt((cos a - cos b)^2 + (sin a - sin b)^2)`, bounded in [0, 2] and
/// symmetric. Unlike a linear difference it treats phases just inside 0 and
/// just inside 2*pi as neighbors.
pub fn phase_error(true_phase: f64, estimated_phase: f64) -> f64 {
    let dc = true_phase.cos() - estimated_phase.cos();
    let ds = true_phase.sin() - estimated_phase.sin();
    (dc * dc + ds * ds).sqrt()
}

/// Element-wise [`phase_error`] over matched truth/estimate vectors.
pub fn phase_error_vec(truth: &Array1<f64>, estimated: &Array1<f64>) -> Array1<f64> {
    debug_assert_eq!(truth.len(), estimated.len());
    Array1::from_shape_fn(truth.len(), |n| phase_error(truth[n], estimated[n]))
}

/// Nearest-rank percentile of an error vector, `pct` in [0, 100].
pub fn percentile(errors: &Array1<f64>, pct: f64) -> f64 {
    let mut sorted: Vec<f64> = errors.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Summary statistics for one estimator's error vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorStats {
    pub mean: f64,
    pub std_dev: f64,
    pub p95: f64,
}

impl ErrorStats {
    pub fn from_errors(errors: &Array1<f64>) -> Self {
        Self {
            mean: errors.mean().unwrap_or(f64::NAN),
            std_dev: errors.std(0.0),
            p95: percentile(errors, 95.0),
        }
    }
}

/// Sensor and batch parameters for one error-analysis run.
///
/// Defaults match the reference experiment: a realistic red channel read
/// through a noisy 8-tap sensor.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisParams {
    /// Number of independent trials N
    pub trials: usize,
    /// Nominal wavelength of the analysed channel in nm
    pub wavelength_nm: f64,
    /// Spectral bandwidth in nm
    pub bandwidth_nm: f64,
    /// Spectral ensemble size M
    pub spectral_resolution: usize,
    /// Peak intensity in counts/s
    pub intensity: f64,
    /// Amplitude imbalance epsilon
    pub imbalance: f64,
    /// Per-tap phase calibration std in radians
    pub phase_std: f64,
    /// Per-tap gain calibration std
    pub gain_std: f64,
    /// Background level in counts/s
    pub background: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            trials: 1000,
            wavelength_nm: 632.8,
            bandwidth_nm: 1.0,
            spectral_resolution: 100,
            intensity: 1e6,
            imbalance: 0.1,
            phase_std: 0.1,
            gain_std: 0.1,
            background: 100.0,
        }
    }
}

/// Error vectors for the two tap strategies over one batch of trials
#[derive(Debug, Clone)]
pub struct PhaseErrorReport {
    pub four_tap: Array1<f64>,
    pub eight_tap: Array1<f64>,
}

impl PhaseErrorReport {
    pub fn four_tap_stats(&self) -> ErrorStats {
        ErrorStats::from_errors(&self.four_tap)
    }

    pub fn eight_tap_stats(&self) -> ErrorStats {
        ErrorStats::from_errors(&self.eight_tap)
    }
}

/// Run the comparative 4-tap vs 8-tap error analysis.
///
/// Each trial draws a uniform deviate `s` in (-0.5, 0.5]; the true phase is
/// `2*pi*s` and the injected OPD is `s * wavelength`, so the phase sweeps a
/// full turn while the OPD stays within one fringe of the analysed channel.
/// The sensor (ensemble and calibration) is drawn fresh for the run, then a
/// single batch is simulated and scored with both strategies.
pub fn phase_error_analysis(
    params: &AnalysisParams,
    rng_seed: Option<u64>,
) -> Result<PhaseErrorReport, MetrologyError> {
    let seed = rng_seed.unwrap_or_else(|| thread_rng().next_u64());
    let mut rng = StdRng::seed_from_u64(seed);

    let deviates = Array1::from_shape_fn(params.trials, |_| rng.gen::<f64>() - 0.5);
    let true_phase = &deviates * TAU;
    let opd_nm: Vec<f64> = deviates.iter().map(|s| s * params.wavelength_nm).collect();

    let ensemble = SpectralEnsemble::draw(
        params.wavelength_nm,
        params.bandwidth_nm,
        params.spectral_resolution,
        &mut rng,
    )?;
    let calibration = TapCalibration::draw(
        &double_quadrature_layout(),
        params.phase_std,
        params.gain_std,
        &mut rng,
    )?;
    let spec = LaserChannelSpec {
        wavelength: params.wavelength_nm,
        bandwidth: params.bandwidth_nm,
        intensity: params.intensity,
        imbalance: params.imbalance,
    };

    let rates = expected_channel_rates(
        ChannelId::Red,
        &spec,
        &ensemble,
        &calibration,
        params.background,
        &opd_nm,
    )?;
    let counts = sample_poisson_counts(rates.view(), rng.next_u64());

    let four = estimate_phase(counts.view(), TapStrategy::FourTap)?;
    let eight = estimate_phase(counts.view(), TapStrategy::EightTap)?;

    let report = PhaseErrorReport {
        four_tap: phase_error_vec(&true_phase, &four),
        eight_tap: phase_error_vec(&true_phase, &eight),
    };
    let four_stats = report.four_tap_stats();
    let eight_stats = report.eight_tap_stats();
    info!(
        "phase error over {} trials: 4-tap mean {:.4}, 8-tap mean {:.4}",
        params.trials, four_stats.mean, eight_stats.mean
    );
    Ok(report)
}
