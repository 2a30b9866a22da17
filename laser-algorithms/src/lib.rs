//! Path-level algorithms built on `laser_geom` and `laser_path`: polyline
//! length estimation, curve-chain sampling, and a memoised point-to-segment
//! distance cache for the lifetime of one optimization run.

pub mod chain;
pub mod distance_cache;
pub mod length;

pub use chain::{chain_length, concatenate_chain_samples, is_connected};
pub use distance_cache::DistanceCache;
pub use length::{estimate_length, sample_for_comparison, CHAIN_SAMPLE_MIN_POINTS, LENGTH_SAMPLES};
