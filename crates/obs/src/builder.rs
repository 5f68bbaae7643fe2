//! Downsample raw windows and assemble policy observations.

use quant::transform::apply_chain;
use storage::RawWindow;
use types::config::AgentConfig;
use types::{DATE_ARR_LEN, FeatureRow};

/// Fixed-shape policy input: one 2D series per feature group plus the clock
/// encoding.
///
/// Groups are a `Vec` ordered by group index, not a map, so iteration and
/// serialization order stay deterministic across runs. The environment
/// wrapper appends position-value and action-mask arrays before delivery to
/// the policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Per-group series: rows are downsampled time steps, columns channels.
    pub groups: Vec<Vec<FeatureRow>>,
    /// Clock encoding of the newest record.
    pub date_arr: [f32; DATE_ARR_LEN],
}

impl Observation {
    /// `(rows, cols)` of one group's series.
    pub fn group_shape(&self, group: usize) -> (usize, usize) {
        let rows = self.groups[group].len();
        let cols = self.groups[group].first().map_or(0, |r| r.len());
        (rows, cols)
    }
}

/// Assemble the observation for the window's current step.
///
/// Every group is downsampled by its configured stride (rows `0, s, 2s, ...`
/// of the raw window). Channel 0 of group 0 is re-expressed as a
/// zero-anchored delta against its newest value, normalized to pips, and run
/// through the feature's transform chain; all other groups and channels pass
/// through downsampling untouched. That narrow scope is the current design,
/// kept as-is. Every group then drops its first downsampled row so shapes
/// line up at `(downsampled_len - 1, channels)`.
///
/// Pure: the window is only read and the observation owns fresh buffers, so
/// this can run at every step.
pub fn build_observation(config: &AgentConfig, window: &RawWindow) -> Observation {
    debug_assert_eq!(config.n_groups(), window.n_groups());

    let mut groups: Vec<Vec<FeatureRow>> = (0..config.n_groups())
        .map(|g| {
            let stride = config.obs_intervals.stride(g);
            window.group(g).iter().step_by(stride).cloned().collect()
        })
        .collect();

    // Primary feature: zero-anchored pip delta on channel 0 of group 0. The
    // newest point becomes exactly zero and is dropped before the chain runs.
    let fc = &config.features[0].features[0];
    let pip = config.pip_of(&fc.symbol) as f32;
    let sampled = &groups[0];
    let last = sampled[sampled.len() - 1][0];
    let mut channel: Vec<f32> = sampled[..sampled.len() - 1]
        .iter()
        .map(|row| (row[0] - last) / pip)
        .collect();
    apply_chain(&mut channel, &fc.transforms);

    for group in groups.iter_mut() {
        group.remove(0);
    }
    // Channel 0 of the surviving rows carries the delta series; its entries
    // start one downsampled step earlier than the rows' other channels.
    for (row, v) in groups[0].iter_mut().zip(channel) {
        row[0] = v;
    }

    Observation {
        groups,
        date_arr: window.date_arr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;
    use storage::MemoryStore;
    use types::config::{
        AgentConfig, FeatureConfig, FeatureGroupConfig, ObsIntervals, RawDataShape,
    };
    use types::record::FeatureRecord;
    use types::{SymbolSpec, Timestamp};

    fn eurusd() -> SymbolSpec {
        SymbolSpec {
            symbol: "EURUSD".to_string(),
            pip: 1e-4,
            pip_val: 100.0,
            contract_size: 100_000.0,
            currency: "USD".to_string(),
            commission: 4.0,
        }
    }

    fn feature(rows: usize, cols: usize) -> FeatureConfig {
        FeatureConfig {
            name: "price_last".to_string(),
            symbol: "EURUSD".to_string(),
            transforms: vec![],
            output_shape: (rows, cols),
        }
    }

    /// One group, window 6, stride 2, two channels; records count up.
    fn two_channel_setup() -> (AgentConfig, MemoryStore) {
        let config = AgentConfig::new(
            vec![FeatureGroupConfig {
                index: 0,
                features: vec![feature(2, 1), feature(2, 1)],
            }],
            RawDataShape::new(vec![6]).unwrap(),
            ObsIntervals::new(vec![2]).unwrap(),
            vec![eurusd()],
            20,
        )
        .unwrap();

        let mut store = MemoryStore::new();
        for i in 0..7 {
            let v = i as f32;
            store.push(FeatureRecord::new(
                vec![smallvec![1.1 + v * 1e-4, 100.0 + v]],
                i as Timestamp * 10_000,
                1.1,
            ));
        }
        (config, store)
    }

    #[test]
    fn test_shapes_match_config() {
        let (config, store) = two_channel_setup();
        let window = storage::RawWindow::init(&config.raw_data_shape, &store, 6).unwrap();
        let obs = build_observation(&config, &window);

        assert_eq!(obs.groups.len(), 1);
        assert_eq!(obs.group_shape(0), config.group_obs_shape(0));
    }

    #[test]
    fn test_window_not_mutated() {
        let (config, store) = two_channel_setup();
        let window = storage::RawWindow::init(&config.raw_data_shape, &store, 6).unwrap();
        let before = window.clone();
        let _obs = build_observation(&config, &window);
        assert_eq!(window, before);
    }

    #[test]
    fn test_secondary_channel_passes_through() {
        let (config, store) = two_channel_setup();
        let window = storage::RawWindow::init(&config.raw_data_shape, &store, 6).unwrap();
        let obs = build_observation(&config, &window);

        // Window holds records 1..=6; stride 2 keeps records 1, 3, 5; the
        // first downsampled row is dropped, leaving records 3 and 5.
        let chan1: Vec<f32> = obs.groups[0].iter().map(|r| r[1]).collect();
        assert_eq!(chan1, vec![103.0, 105.0]);
    }

    #[test]
    fn test_date_arr_copied_from_window() {
        let (config, store) = two_channel_setup();
        let window = storage::RawWindow::init(&config.raw_data_shape, &store, 6).unwrap();
        let obs = build_observation(&config, &window);
        assert_eq!(obs.date_arr, window.date_arr);
    }
}
