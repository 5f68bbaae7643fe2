//! Observation assembly for the FX gym.
//!
//! Turns a backfilled [`storage::RawWindow`] into the fixed-shape numeric
//! observation consumed by the policy: per-group downsampling, pip-normalized
//! delta of the primary channel, configured transform chains, and the clock
//! encoding.

mod builder;

pub use builder::{Observation, build_observation};
