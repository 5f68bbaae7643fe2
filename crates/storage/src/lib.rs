//! Record store access and raw window maintenance.
//!
//! One [`RawWindow`] backs one environment session: it is backfilled from
//! the record store at reset and advanced by exactly one record per step.
//! The store itself is behind the [`RecordStore`] trait; this crate ships an
//! in-memory implementation for tests and demos, transport lives elsewhere.

mod error;
mod store;
mod window;

pub use error::{Result, StorageError};
pub use store::{MemoryStore, RecordStore};
pub use window::RawWindow;
