//! Optical forward models: fringe intensity and source spectra

pub mod fringe;
pub mod spectrum;

pub use fringe::fringe_intensity;
pub use spectrum::SpectralEnsemble;
