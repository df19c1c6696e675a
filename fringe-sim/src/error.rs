//! Error types for the simulation and estimation engines

use thiserror::Error;

use crate::config::ChannelId;

/// Errors surfaced by configuration loading, simulation, and estimation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetrologyError {
    /// Missing, malformed, or out-of-range configuration field
    #[error("configuration error: {0}")]
    Config(String),

    /// Physically meaningless parameter reached a stochastic constructor
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A computed Poisson mean went negative. This indicates a bad
    /// background level or gain calibration and must never be clamped away.
    #[error("negative photon rate {rate} on {channel} channel tap {tap}")]
    InvalidRate {
        channel: ChannelId,
        tap: usize,
        rate: f64,
    },

    /// Estimator invoked on a readout with too few quadrature taps
    #[error("estimator requires {required} taps but readout has {available}")]
    InsufficientTaps { required: usize, available: usize },
}
