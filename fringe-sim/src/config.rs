//! Typed configuration record for the simulation engine
//!
//! The engine never reads configuration documents itself; the surrounding
//! application deserializes one (serde) into [`SimulationConfig`] and hands
//! it to [`crate::engine::EngineState::load`], which runs the range checks
//! here. Field names follow the historical instrument config layout
//! (`laser-int-r`, `sensor-int`, ...) with aliases for the legacy key
//! spellings, and every numeric field is a literal number: expression
//! strings are rejected at deserialization rather than evaluated.

use std::fmt;

use serde::Deserialize;

use crate::error::MetrologyError;

/// Identifier for one laser color channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    Red,
    Green,
    Blue,
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelId::Red => write!(f, "red"),
            ChannelId::Green => write!(f, "green"),
            ChannelId::Blue => write!(f, "blue"),
        }
    }
}

/// Source parameters for one laser channel
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LaserChannelSpec {
    /// Nominal wavelength in nm
    pub wavelength: f64,
    /// Spectral bandwidth (FWHM-like line width) in nm
    pub bandwidth: f64,
    /// Peak intensity in counts/s
    pub intensity: f64,
    /// Relative amplitude imbalance epsilon between the two arms
    pub imbalance: f64,
}

impl LaserChannelSpec {
    /// Nominal wavenumber 2*pi/lambda in rad/nm
    pub fn wavenumber(&self) -> f64 {
        std::f64::consts::TAU / self.wavelength
    }
}

/// Interference (quadrature) sensor parameters
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InterferenceSensorConfig {
    /// Std of the per-tap gain calibration draw around 1.0
    #[serde(alias = "amplitude-stability")]
    pub gain_deviation: f64,
    /// Std of the per-tap phase calibration draw in radians
    #[serde(alias = "phase-stability")]
    pub phase_deviation: f64,
    /// Stray-light background in counts/s, added to every tap mean
    #[serde(default)]
    pub background: f64,
}

/// Time-of-flight ranging sensor parameters
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TofSensorConfig {
    /// 1-sigma ranging precision in mm
    pub precision: f64,
}

/// Runtime resolutions
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Number of Monte-Carlo wavenumber samples per channel
    pub spectral_resolution: usize,
    /// OPD step in nm for downstream distance sweeps
    pub distance_resolution: f64,
    /// Grid size for downstream parameter sweeps
    pub parameter_resolution: usize,
}

/// Complete simulation configuration as loaded from the instrument config
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(rename = "laser-int-r")]
    pub red: LaserChannelSpec,
    #[serde(rename = "laser-int-g")]
    pub green: LaserChannelSpec,
    #[serde(rename = "laser-int-b", default)]
    pub blue: Option<LaserChannelSpec>,
    #[serde(rename = "sensor-int")]
    pub interference: InterferenceSensorConfig,
    #[serde(rename = "sensor-tof")]
    pub tof: TofSensorConfig,
    pub runtime: RuntimeConfig,
}

fn check_finite(section: &str, field: &str, value: f64) -> Result<(), MetrologyError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MetrologyError::Config(format!(
            "{section}.{field} must be finite, got {value}"
        )))
    }
}

impl SimulationConfig {
    /// Channels in fixed red/green/blue order, skipping an absent blue
    pub fn channels(&self) -> Vec<(ChannelId, &LaserChannelSpec)> {
        let mut channels = vec![(ChannelId::Red, &self.red), (ChannelId::Green, &self.green)];
        if let Some(blue) = &self.blue {
            channels.push((ChannelId::Blue, blue));
        }
        channels
    }

    /// Range-check every field.
    ///
    /// A negative `background` is accepted here: whether it actually drives
    /// a photon rate negative depends on the fringe level, so it is policed
    /// at simulation time where the offending rate can be reported.
    pub fn validate(&self) -> Result<(), MetrologyError> {
        for (id, laser) in self.channels() {
            let section = format!("laser-int-{id}");
            check_finite(&section, "wavelength", laser.wavelength)?;
            check_finite(&section, "bandwidth", laser.bandwidth)?;
            check_finite(&section, "intensity", laser.intensity)?;
            check_finite(&section, "imbalance", laser.imbalance)?;
            if laser.wavelength <= 0.0 {
                return Err(MetrologyError::Config(format!(
                    "{section}.wavelength must be positive, got {}",
                    laser.wavelength
                )));
            }
            if laser.bandwidth < 0.0 {
                return Err(MetrologyError::Config(format!(
                    "{section}.bandwidth must be non-negative, got {}",
                    laser.bandwidth
                )));
            }
            if laser.intensity <= 0.0 {
                return Err(MetrologyError::Config(format!(
                    "{section}.intensity must be positive, got {}",
                    laser.intensity
                )));
            }
        }

        check_finite("sensor-int", "gain-deviation", self.interference.gain_deviation)?;
        check_finite("sensor-int", "phase-deviation", self.interference.phase_deviation)?;
        check_finite("sensor-int", "background", self.interference.background)?;
        if self.interference.gain_deviation < 0.0 {
            return Err(MetrologyError::Config(format!(
                "sensor-int.gain-deviation must be non-negative, got {}",
                self.interference.gain_deviation
            )));
        }
        if self.interference.phase_deviation < 0.0 {
            return Err(MetrologyError::Config(format!(
                "sensor-int.phase-deviation must be non-negative, got {}",
                self.interference.phase_deviation
            )));
        }

        check_finite("sensor-tof", "precision", self.tof.precision)?;
        if self.tof.precision < 0.0 {
            return Err(MetrologyError::Config(format!(
                "sensor-tof.precision must be non-negative, got {}",
                self.tof.precision
            )));
        }

        if self.runtime.spectral_resolution == 0 {
            return Err(MetrologyError::Config(
                "runtime.spectral-resolution must be at least 1".to_string(),
            ));
        }
        check_finite("runtime", "distance-resolution", self.runtime.distance_resolution)?;
        if self.runtime.distance_resolution <= 0.0 {
            return Err(MetrologyError::Config(format!(
                "runtime.distance-resolution must be positive, got {}",
                self.runtime.distance_resolution
            )));
        }
        if self.runtime.parameter_resolution == 0 {
            return Err(MetrologyError::Config(
                "runtime.parameter-resolution must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Two-channel red/green config with realistic noise levels, for unit tests.
#[cfg(test)]
pub(crate) fn two_channel_config() -> SimulationConfig {
    SimulationConfig {
        red: LaserChannelSpec {
            wavelength: 632.8,
            bandwidth: 1.0,
            intensity: 1e6,
            imbalance: 0.1,
        },
        green: LaserChannelSpec {
            wavelength: 531.9,
            bandwidth: 1.0,
            intensity: 1e6,
            imbalance: 0.1,
        },
        blue: None,
        interference: InterferenceSensorConfig {
            gain_deviation: 0.1,
            phase_deviation: 0.1,
            background: 100.0,
        },
        tof: TofSensorConfig { precision: 0.001 },
        runtime: RuntimeConfig {
            spectral_resolution: 64,
            distance_resolution: 10.0,
            parameter_resolution: 32,
        },
    }
}
