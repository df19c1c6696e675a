//! Numeric helpers shared across the simulation engine

pub mod parallel;

pub use parallel::sample_poisson_counts;
