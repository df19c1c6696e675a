//! Hardware models for the quadrature interference sensor and ToF ranger

pub mod sensor;
pub mod tof;

pub use sensor::TapCalibration;
pub use tof::TofSensor;
