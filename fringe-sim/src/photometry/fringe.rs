//! Time-averaged two-beam interference fringe intensity.
//!
//! # Physical Model
//!
//! Two waves of similar peak amplitude interfere at a detector:
//!
//! ```text
//! W1(x,t) = A * cos(kx - wt)
//! W2(x,t) = A * (1 + eps) * cos(kx - wt + phi)
//! ```
//!
//! where `phi` is the phase difference between the interferometer arms and
//! `eps` is a small amplitude imbalance between them. Averaging the fringe
//! intensity over one optical cycle (integration time T >> 1/w) gives, up to
//! the common factor A²,
//!
//! ```text
//! J(phi) = 2*cos²(phi/2) + 2*eps*cos(phi/2)*cos(phi/4) + eps²/2
//! ```
//!
//! which is what a photon-counting tap actually integrates. The function is
//! deterministic and defined for all finite inputs; shot noise and
//! calibration error are applied by the caller.

use ndarray::{Array3, ArrayView3};

/// Time-averaged fringe intensity `J(phi, eps)` for one phase sample.
#[inline]
pub fn fringe_intensity(phi: f64, imbalance: f64) -> f64 {
    let half = (0.5 * phi).cos();
    2.0 * half * half + 2.0 * imbalance * half * (0.25 * phi).cos()
        + 0.5 * imbalance * imbalance
}

/// Element-wise `J` over a (measurement, spectral-sample, tap) phase block.
pub fn fringe_intensity_block(phase: ArrayView3<'_, f64>, imbalance: f64) -> Array3<f64> {
    phase.mapv(|phi| fringe_intensity(phi, imbalance))
}
