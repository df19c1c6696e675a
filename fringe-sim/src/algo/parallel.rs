//! Deterministic parallel shot-noise sampling.
//!
//! Measurements are statistically independent, so Poisson sampling is
//! parallelized row-chunk-wise over the measurement axis. Each chunk gets
//! its own RNG seeded from the base seed plus the chunk index, which makes
//! the output a pure function of (rates, seed) regardless of how rayon
//! schedules the chunks or how many worker threads exist.

use ndarray::{Array2, ArrayView2, Axis, Zip};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Poisson};
use rayon::prelude::*;

/// Rows per parallel chunk. Large enough to amortize RNG construction,
/// small enough to keep all cores busy on typical batch sizes.
const CHUNK_ROWS: usize = 256;

/// Draw one Poisson count per element of a non-negative rate matrix.
///
/// A zero rate yields a zero count (a dark tap emits no photons). Callers
/// must have rejected negative rates already; a negative mean is a
/// configuration bug that deserves an error with context, not a panic here.
///
/// # Arguments
/// * `rates` - expected counts per (measurement, tap), all >= 0
/// * `seed` - base seed; same seed and rates give bit-identical output
pub fn sample_poisson_counts(rates: ArrayView2<'_, f64>, seed: u64) -> Array2<f64> {
    let mut counts = Array2::<f64>::zeros(rates.dim());

    counts
        .axis_chunks_iter_mut(Axis(0), CHUNK_ROWS)
        .into_par_iter()
        .zip(rates.axis_chunks_iter(Axis(0), CHUNK_ROWS).into_par_iter())
        .enumerate()
        .for_each(|(chunk_idx, (out, lam))| {
            // Per-chunk RNG with a deterministic seed derived from the base
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(chunk_idx as u64));
            Zip::from(out).and(lam).for_each(|count, &rate| {
                *count = if rate > 0.0 {
                    let shot = Poisson::new(rate)
                        .expect("Poisson mean validated positive before sampling");
                    shot.sample(&mut rng)
                } else {
                    0.0
                };
            });
        });

    counts
}
