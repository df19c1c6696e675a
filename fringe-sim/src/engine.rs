//! Stochastic sensor simulation engine.
//!
//! [`EngineState::load`] turns a validated [`SimulationConfig`] into frozen
//! per-channel state: one spectral ensemble and one tap calibration per
//! laser channel, drawn exactly once. [`EngineState::simulate`] then maps a
//! batch of true OPD values to shot-noise photon counts plus ToF readings;
//! only the Poisson and ToF draws are refreshed per call, never the
//! calibration. The state is immutable after load, so concurrent `simulate`
//! calls on the same state are safe.

use log::{debug, info};
use ndarray::{Array2, Array3, Axis};
use rand::rngs::StdRng;
use rand::{thread_rng, RngCore, SeedableRng};

use crate::algo::sample_poisson_counts;
use crate::config::{ChannelId, LaserChannelSpec, SimulationConfig};
use crate::error::MetrologyError;
use crate::hardware::sensor::{double_quadrature_layout, TapCalibration};
use crate::hardware::tof::TofSensor;
use crate::photometry::fringe::fringe_intensity_block;
use crate::photometry::spectrum::SpectralEnsemble;

/// Frozen state for one laser channel
#[derive(Debug, Clone)]
pub struct ChannelState {
    id: ChannelId,
    spec: LaserChannelSpec,
    ensemble: SpectralEnsemble,
    calibration: TapCalibration,
}

impl ChannelState {
    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn spec(&self) -> &LaserChannelSpec {
        &self.spec
    }

    pub fn ensemble(&self) -> &SpectralEnsemble {
        &self.ensemble
    }

    pub fn calibration(&self) -> &TapCalibration {
        &self.calibration
    }
}

/// Synthetic counts for one channel: N measurements by n_taps integral-valued
/// Poisson draws, stored as f64 for direct use in array arithmetic.
#[derive(Debug, Clone)]
pub struct ChannelReadout {
    pub id: ChannelId,
    pub counts: Array2<f64>,
}

/// One simulated measurement batch: per-channel quadrature counts plus the
/// companion ToF distance readings in nm. Ephemeral; nothing here outlives
/// the call that produced it.
#[derive(Debug, Clone)]
pub struct SimulatedReadout {
    pub channels: Vec<ChannelReadout>,
    pub tof_nm: ndarray::Array1<f64>,
}

impl SimulatedReadout {
    /// Counts for a given channel, if it was configured
    pub fn channel(&self, id: ChannelId) -> Option<&Array2<f64>> {
        self.channels
            .iter()
            .find(|readout| readout.id == id)
            .map(|readout| &readout.counts)
    }
}

/// Immutable engine state derived from one configuration load.
#[derive(Debug, Clone)]
pub struct EngineState {
    channels: Vec<ChannelState>,
    background: f64,
    tof: TofSensor,
}

impl EngineState {
    /// Build the frozen per-channel state from a configuration.
    ///
    /// Validates the configuration, then draws each channel's spectral
    /// ensemble and tap calibration. Those draws happen here and only here;
    /// every later `simulate` call reads them unchanged.
    ///
    /// # Arguments
    /// * `config` - validated against the ranges in [`SimulationConfig::validate`]
    /// * `rng_seed` - optional seed for reproducible calibration draws
    pub fn load(config: &SimulationConfig, rng_seed: Option<u64>) -> Result<Self, MetrologyError> {
        config.validate()?;

        let seed = rng_seed.unwrap_or_else(|| thread_rng().next_u64());
        let mut rng = StdRng::seed_from_u64(seed);
        let layout = double_quadrature_layout();

        let mut channels = Vec::new();
        for (id, spec) in config.channels() {
            let ensemble = SpectralEnsemble::draw(
                spec.wavelength,
                spec.bandwidth,
                config.runtime.spectral_resolution,
                &mut rng,
            )?;
            let calibration = TapCalibration::draw(
                &layout,
                config.interference.phase_deviation,
                config.interference.gain_deviation,
                &mut rng,
            )?;
            channels.push(ChannelState {
                id,
                spec: *spec,
                ensemble,
                calibration,
            });
        }

        let tof = TofSensor::new(config.tof.precision)?;

        info!(
            "engine loaded: {} channels, {} spectral samples, {} taps, ToF sigma {:.0} nm",
            channels.len(),
            config.runtime.spectral_resolution,
            layout.len(),
            tof.sigma_nm()
        );

        Ok(Self {
            channels,
            background: config.interference.background,
            tof,
        })
    }

    pub fn channels(&self) -> &[ChannelState] {
        &self.channels
    }

    pub fn channel(&self, id: ChannelId) -> Option<&ChannelState> {
        self.channels.iter().find(|channel| channel.id == id)
    }

    pub fn background(&self) -> f64 {
        self.background
    }

    pub fn tof(&self) -> &TofSensor {
        &self.tof
    }

    /// Expected (noise-free) photon rate per measurement and tap for every
    /// channel. This is the Poisson mean surface; `simulate` samples it.
    pub fn expected_rates(&self, opd_nm: &[f64]) -> Result<Vec<Array2<f64>>, MetrologyError> {
        self.channels
            .iter()
            .map(|channel| {
                expected_channel_rates(
                    channel.id,
                    &channel.spec,
                    &channel.ensemble,
                    &channel.calibration,
                    self.background,
                    opd_nm,
                )
            })
            .collect()
    }

    /// Simulate one measurement batch.
    ///
    /// Per channel: phase block `opd[n]*k_i + phase_j`, fringe intensity
    /// averaged over the spectral axis, scaled by gain and intensity, offset
    /// by the background, then Poisson-sampled. The ToF vector is drawn
    /// independently. Shot noise and ranging noise are redrawn per call from
    /// `rng_seed`; the frozen calibration is not.
    pub fn simulate(
        &self,
        opd_nm: &[f64],
        rng_seed: Option<u64>,
    ) -> Result<SimulatedReadout, MetrologyError> {
        let seed = rng_seed.unwrap_or_else(|| thread_rng().next_u64());
        let mut rng = StdRng::seed_from_u64(seed);

        let mut channels = Vec::with_capacity(self.channels.len());
        for channel in &self.channels {
            let rates = expected_channel_rates(
                channel.id,
                &channel.spec,
                &channel.ensemble,
                &channel.calibration,
                self.background,
                opd_nm,
            )?;
            let counts = sample_poisson_counts(rates.view(), rng.next_u64());
            channels.push(ChannelReadout {
                id: channel.id,
                counts,
            });
        }

        let tof_nm = self.tof.measure(opd_nm, &mut rng);
        debug!(
            "simulated batch of {} measurements across {} channels (seed {seed})",
            opd_nm.len(),
            channels.len()
        );

        Ok(SimulatedReadout { channels, tof_nm })
    }
}

/// Poisson mean surface for one channel:
/// `rate[n,j] = gain_j * intensity * mean_i J(opd_n * k_i + phase_j, eps) + background`.
///
/// Shared by the engine and the standalone error-analysis driver, which runs
/// the same forward model on an ephemeral sensor. A negative mean is
/// surfaced as [`MetrologyError::InvalidRate`], never clamped: clamping
/// would silently mask a bad background level or a gain draw gone negative.
pub(crate) fn expected_channel_rates(
    id: ChannelId,
    spec: &LaserChannelSpec,
    ensemble: &SpectralEnsemble,
    calibration: &TapCalibration,
    background: f64,
    opd_nm: &[f64],
) -> Result<Array2<f64>, MetrologyError> {
    let wavenumbers = ensemble.wavenumbers();
    let phases = calibration.phases();
    let gains = calibration.gains();
    let (n, m, t) = (opd_nm.len(), wavenumbers.len(), phases.len());

    let phase = Array3::from_shape_fn((n, m, t), |(ni, mi, ti)| {
        opd_nm[ni] * wavenumbers[mi] + phases[ti]
    });
    let fringe = fringe_intensity_block(phase.view(), spec.imbalance);
    let visibility = fringe
        .mean_axis(Axis(1))
        .expect("spectral ensemble has at least one sample");

    let mut rates = visibility;
    for mut row in rates.rows_mut() {
        for (tap, rate) in row.iter_mut().enumerate() {
            *rate = gains[tap] * spec.intensity * *rate + background;
            if *rate < 0.0 {
                return Err(MetrologyError::InvalidRate {
                    channel: id,
                    tap,
                    rate: *rate,
                });
            }
        }
    }
    Ok(rates)
}
