//! Sensor simulation and phase estimation for a multi-wavelength
//! phase-shifting laser interferometer.
//!
//! This crate provides the stochastic forward model that turns a true
//! optical-path-difference batch into per-tap photon counts and companion
//! time-of-flight readings, together with the quadrature phase estimators
//! and the circular error analysis used to score them.
//!
//! The pipeline is: a [`config::SimulationConfig`] is loaded into an
//! immutable [`engine::EngineState`] (spectral ensembles and tap
//! calibrations drawn once, then frozen); [`engine::EngineState::simulate`]
//! produces shot-noise readouts; [`estimator::estimate_phase`] recovers the
//! phase; [`analysis::phase_error_analysis`] compares estimator strategies
//! against ground truth. All stochastic entry points take an explicit
//! optional seed, so any run can be reproduced bit for bit.

pub mod algo;
pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod hardware;
pub mod photometry;
pub mod units;

// Re-exports for easier access
pub use analysis::{phase_error, phase_error_analysis, AnalysisParams, ErrorStats};
pub use config::{ChannelId, LaserChannelSpec, SimulationConfig};
pub use engine::{EngineState, SimulatedReadout};
pub use error::MetrologyError;
pub use estimator::{estimate_phase, TapStrategy};
pub use hardware::sensor::{double_quadrature_layout, quadrature_layout, TapCalibration};
pub use photometry::{fringe_intensity, SpectralEnsemble};
