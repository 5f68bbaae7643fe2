//! Core types for the FX observation gym.
//!
//! This crate provides the shared data types used across the pipeline:
//! instrument metadata, stored feature records, and the validated agent
//! configuration consumed by the storage and observation crates.
//!
//! # Design Notes
//!
//! - Feature values are `f32` (the network's working precision); prices and
//!   monetary scalars stay `f64` until they enter a feature row.
//! - Configuration is assembled once via [`config::AgentConfig::new`], which
//!   validates every shape contract eagerly. Core operations accept only the
//!   validated value, never loose string-keyed maps.

pub mod config;
pub mod record;

use std::fmt;

use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// =============================================================================
// Aliases and Constants
// =============================================================================

/// Trading instrument symbol (e.g. "EURUSD").
pub type Symbol = String;

/// Wall clock timestamp in milliseconds since epoch.
pub type Timestamp = i64;

/// Dense per-session index of a record in the time-series store
/// (one record per action interval).
pub type RecordIndex = u64;

/// Length of the clock encoding carried on every record and observation.
pub const DATE_ARR_LEN: usize = 3;

/// One time step of one feature group: a row of channel values.
///
/// Uses `SmallVec` so typical channel counts stay inline without heap
/// allocation; derefs to `&[f32]` so slice-based code works unchanged.
pub type FeatureRow = SmallVec<[f32; 8]>;

// =============================================================================
// Instrument Registry
// =============================================================================

/// Stable index of a symbol in the instrument registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, From, Into,
)]
pub struct SymbolIndex(pub usize);

impl fmt::Display for SymbolIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Immutable per-instrument contract metadata.
///
/// Built once at startup from the broker's instrument tables and passed by
/// reference into every component that needs it; looked up by [`SymbolIndex`]
/// on hot paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSpec {
    /// Instrument symbol, e.g. "EURUSD".
    pub symbol: Symbol,
    /// Minimal tradable price increment, e.g. 1e-4 for EURUSD.
    pub pip: f64,
    /// Monetary value of one pip per contract.
    pub pip_val: f64,
    /// Units per contract.
    pub contract_size: f64,
    /// Quote currency.
    pub currency: String,
    /// Round-trip commission per contract.
    pub commission: f64,
}

// =============================================================================
// Portfolio Matrix Layout
// =============================================================================

/// Column layout of the portfolio matrix.
///
/// The matrix is a fixed schema contract with the execution subsystem: each
/// position row carries consecutive 7-column field blocks. Any change there
/// requires a matching change here.
pub mod portfolio_idx {
    /// First encoded column within the row (start of the strided walk).
    pub const INPUT_COL_OFFSET: usize = 5;
    /// Column stride between position field blocks.
    pub const FIELD_STRIDE: usize = 7;
    /// Lot-size column used to scale the first encoded value.
    pub const LOT_COL: usize = 6;
}
