//! Stored feature records.
//!
//! One [`FeatureRecord`] is written to the record store per action interval
//! by the signal writer; the storage crate reads them back to maintain raw
//! windows. The record carries one feature row per group plus scalar side
//! channels taken at the record close.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{DATE_ARR_LEN, FeatureRow, Timestamp};

/// One stored time step: per-group feature rows plus side channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// One row of channel values per feature group, ordered by group index.
    pub groups: Vec<FeatureRow>,
    /// Wall clock of the record close.
    pub date: Timestamp,
    /// Last trade price at the record close.
    pub trade_price: f64,
    /// Normalized clock encoding, see [`clock_encoding`].
    pub date_arr: [f32; DATE_ARR_LEN],
}

impl FeatureRecord {
    /// Build a record, deriving `date_arr` from the timestamp.
    pub fn new(groups: Vec<FeatureRow>, date: Timestamp, trade_price: f64) -> Self {
        Self {
            groups,
            date,
            trade_price,
            date_arr: clock_encoding(date),
        }
    }
}

/// Normalized `[weekday, hour, minute]` clock encoding, each in `[0, 1]`.
///
/// Gives the policy a notion of session time without feeding raw timestamps.
pub fn clock_encoding(date: Timestamp) -> [f32; DATE_ARR_LEN] {
    let dt: DateTime<Utc> = DateTime::from_timestamp_millis(date).unwrap_or(DateTime::UNIX_EPOCH);
    [
        dt.weekday().num_days_from_monday() as f32 / 6.0,
        dt.hour() as f32 / 23.0,
        dt.minute() as f32 / 59.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_clock_encoding_bounds() {
        // A sweep of timestamps stays in [0, 1] on every component.
        for days in 0..14 {
            for hours in 0..24 {
                let ts: Timestamp = (days * 24 + hours) * 3_600_000 + 1_234_567;
                let enc = clock_encoding(ts);
                for v in enc {
                    assert!((0.0..=1.0).contains(&v), "component {v} out of range");
                }
            }
        }
    }

    #[test]
    fn test_clock_encoding_epoch() {
        // 1970-01-01 00:00 was a Thursday.
        let enc = clock_encoding(0);
        assert!((enc[0] - 3.0 / 6.0).abs() < 1e-6);
        assert_eq!(enc[1], 0.0);
        assert_eq!(enc[2], 0.0);
    }

    #[test]
    fn test_record_new_derives_date_arr() {
        let rec = FeatureRecord::new(vec![smallvec![1.0]], 0, 1.1);
        assert_eq!(rec.date_arr, clock_encoding(0));
        assert_eq!(rec.groups.len(), 1);
    }
}
