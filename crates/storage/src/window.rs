//! Bounded raw data windows backing each observation.

use tracing::debug;

use types::config::RawDataShape;
use types::{DATE_ARR_LEN, FeatureRow, RecordIndex, Timestamp};

use crate::error::{Result, StorageError};
use crate::store::RecordStore;

/// Per-group bounded buffers of raw feature rows, most-recent-last, plus the
/// side channels of the newest record.
///
/// After every [`init`](RawWindow::init) and [`update`](RawWindow::update)
/// each group's buffer holds exactly `shape.len(group)` rows; a window is
/// never partially filled. One window is owned by one session.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWindow {
    groups: Vec<Vec<FeatureRow>>,
    /// Wall clock of the newest record.
    pub date: Timestamp,
    /// Trade price of the newest record.
    pub trade_price: f64,
    /// Clock encoding of the newest record.
    pub date_arr: [f32; DATE_ARR_LEN],
}

impl RawWindow {
    /// Backfill a full window from the `shape.max() + 1` records ending at
    /// `index` inclusive.
    ///
    /// Every group buffers the whole fetch range and then keeps only its most
    /// recent `shape.len(group)` rows, so groups with different lengths hold
    /// different-length suffixes of the same range. Any missing record in the
    /// range fails the whole call; a partial window is never returned.
    pub fn init(
        shape: &RawDataShape,
        store: &dyn RecordStore,
        index: RecordIndex,
    ) -> Result<Self> {
        let depth = shape.max();
        let start = index
            .checked_sub(depth as RecordIndex)
            .ok_or(StorageError::IndexUnderflow { index, depth })?;

        let n_groups = shape.n_groups();
        let mut groups: Vec<Vec<FeatureRow>> = vec![Vec::with_capacity(depth + 1); n_groups];
        for j in start..index {
            let record = store.get(j)?;
            assert_eq!(
                record.groups.len(),
                n_groups,
                "record {} carries {} groups, configured {}",
                j,
                record.groups.len(),
                n_groups
            );
            for (g, row) in record.groups.iter().enumerate() {
                groups[g].push(row.clone());
            }
        }
        let latest = store.get(index)?;
        assert_eq!(latest.groups.len(), n_groups);
        for (g, row) in latest.groups.iter().enumerate() {
            groups[g].push(row.clone());
        }

        for (g, buf) in groups.iter_mut().enumerate() {
            let excess = buf.len() - shape.len(g);
            buf.drain(..excess);
        }

        debug!(index, depth, "raw window backfilled");
        Ok(Self {
            groups,
            date: latest.date,
            trade_price: latest.trade_price,
            date_arr: latest.date_arr,
        })
    }

    /// Append the record at `index` and evict the oldest row of every group.
    ///
    /// Shift-left on a `Vec` costs O(window length) per call; calls happen at
    /// step cadence. Side channels are refreshed from the new record. A
    /// post-update length mismatch is a contract violation and panics rather
    /// than being coerced.
    pub fn update(
        &mut self,
        shape: &RawDataShape,
        store: &dyn RecordStore,
        index: RecordIndex,
    ) -> Result<()> {
        let record = store.get(index)?;
        assert_eq!(
            record.groups.len(),
            self.groups.len(),
            "record {} carries {} groups, window holds {}",
            index,
            record.groups.len(),
            self.groups.len()
        );

        for (g, buf) in self.groups.iter_mut().enumerate() {
            buf.remove(0);
            buf.push(record.groups[g].clone());
            assert_eq!(
                buf.len(),
                shape.len(g),
                "group {} window length drifted from its configured shape",
                g
            );
        }

        self.date = record.date;
        self.trade_price = record.trade_price;
        self.date_arr = record.date_arr;
        debug!(index, "raw window advanced");
        Ok(())
    }

    /// Rows of one group, oldest first.
    pub fn group(&self, group: usize) -> &[FeatureRow] {
        &self.groups[group]
    }

    /// Number of feature groups.
    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }
}
