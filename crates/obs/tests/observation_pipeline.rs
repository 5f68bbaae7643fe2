//! End-to-end pipeline tests: synthetic records through backfill, stepping
//! and observation assembly.

use smallvec::smallvec;
use storage::{MemoryStore, RawWindow, StorageError};
use types::config::{
    AgentConfig, FeatureConfig, FeatureGroupConfig, ObsIntervals, RawDataShape, TransformSpec,
};
use types::record::FeatureRecord;
use types::{SymbolSpec, Timestamp};

use obs::build_observation;

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

/// Single group, window 10, stride 1, one price channel.
fn tick_ramp_config(transforms: Vec<TransformSpec>) -> AgentConfig {
    AgentConfig::new(
        vec![FeatureGroupConfig {
            index: 0,
            features: vec![FeatureConfig {
                name: "price_last".to_string(),
                symbol: "EURUSD".to_string(),
                transforms,
                output_shape: (9, 1),
            }],
        }],
        RawDataShape::new(vec![10]).unwrap(),
        ObsIntervals::new(vec![1]).unwrap(),
        vec![eurusd()],
        20,
    )
    .unwrap()
}

/// Eleven synthetic ticks 100.0, 100.1, ..., 101.0.
fn tick_ramp_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    for i in 0..=10 {
        let price = 100.0 + 0.1 * i as f64;
        store.push(FeatureRecord::new(
            vec![smallvec![price as f32]],
            i as Timestamp * 10_000,
            price,
        ));
    }
    store
}

#[test]
fn tick_ramp_delta_series_hand_computed() {
    let config = tick_ramp_config(vec![]);
    let store = tick_ramp_store();

    let window = RawWindow::init(&config.raw_data_shape, &store, 10).unwrap();
    // Backfill pulls all 11 ticks and keeps the most recent 10.
    assert_eq!(window.group(0).len(), 10);
    assert!((window.group(0)[0][0] - 100.1).abs() < 1e-4);

    let obs = build_observation(&config, &window);
    assert_eq!(obs.group_shape(0), (9, 1));

    // Deltas are anchored on the newest tick (101.0) and normalized to pips:
    // (100.1 - 101.0) / 1e-4 = -9000 down to (100.9 - 101.0) / 1e-4 = -1000,
    // the anchor itself having been dropped as the trailing zero.
    for (i, row) in obs.groups[0].iter().enumerate() {
        let expected = -9000.0 + 1000.0 * i as f32;
        assert!(
            (row[0] - expected).abs() < 0.5,
            "row {i}: expected {expected}, got {}",
            row[0]
        );
    }
}

#[test]
fn tick_ramp_transform_chain_applies_in_order() {
    let config = tick_ramp_config(vec![
        TransformSpec::Scale { divisor: 1000.0 },
        TransformSpec::Clip { min: -5.0, max: 5.0 },
    ]);
    let store = tick_ramp_store();

    let window = RawWindow::init(&config.raw_data_shape, &store, 10).unwrap();
    let obs = build_observation(&config, &window);

    // -9000 pips -> -9.0 after scaling -> clipped to -5.0; the shallow end
    // (-1000 pips -> -1.0) is left alone by the clip.
    assert!((obs.groups[0][0][0] + 5.0).abs() < 1e-3);
    assert!((obs.groups[0][8][0] + 1.0).abs() < 1e-3);
}

#[test]
fn stepping_matches_fresh_backfill() {
    // After any number of updates, the window must equal one backfilled
    // directly at the same index.
    let config = tick_ramp_config(vec![]);
    let store = tick_ramp_store();

    let shape = &config.raw_data_shape;
    let mut stepped = RawWindow::init(shape, &store, 10).unwrap();

    let mut store = store;
    for i in 11..=15 {
        let price = 101.0 + 0.1 * (i - 10) as f64;
        store.push(FeatureRecord::new(
            vec![smallvec![price as f32]],
            i as Timestamp * 10_000,
            price,
        ));
        stepped.update(shape, &store, i as u64).unwrap();

        let fresh = RawWindow::init(shape, &store, i as u64).unwrap();
        assert_eq!(stepped, fresh, "windows diverge at index {i}");
    }
}

#[test]
fn multi_group_shapes_and_passthrough() {
    let config = AgentConfig::new(
        vec![
            FeatureGroupConfig {
                index: 0,
                features: vec![FeatureConfig {
                    name: "price_last".to_string(),
                    symbol: "EURUSD".to_string(),
                    transforms: vec![],
                    output_shape: (11, 1),
                }],
            },
            FeatureGroupConfig {
                index: 1,
                features: vec![FeatureConfig {
                    name: "price_mean".to_string(),
                    symbol: "EURUSD".to_string(),
                    transforms: vec![],
                    output_shape: (2, 1),
                }],
            },
        ],
        RawDataShape::new(vec![12, 8]).unwrap(),
        ObsIntervals::new(vec![1, 3]).unwrap(),
        vec![eurusd()],
        20,
    )
    .unwrap();

    let mut store = MemoryStore::new();
    for i in 0..13 {
        let v = i as f32;
        store.push(FeatureRecord::new(
            vec![smallvec![1.1 + v * 1e-4], smallvec![200.0 + v]],
            i as Timestamp * 10_000,
            1.1,
        ));
    }

    let window = RawWindow::init(&config.raw_data_shape, &store, 12).unwrap();
    assert_eq!(window.group(0).len(), 12);
    assert_eq!(window.group(1).len(), 8);

    let obs = build_observation(&config, &window);
    assert_eq!(obs.group_shape(0), config.group_obs_shape(0));
    assert_eq!(obs.group_shape(1), config.group_obs_shape(1));

    // Group 1 window holds records 5..=12; stride 3 keeps records 5, 8, 11;
    // dropping the first downsampled row leaves records 8 and 11, untouched
    // by any transform.
    let chan: Vec<f32> = obs.groups[1].iter().map(|r| r[0]).collect();
    assert_eq!(chan, vec![208.0, 211.0]);
}

#[test]
fn store_miss_aborts_step() {
    let config = tick_ramp_config(vec![]);
    let store = tick_ramp_store();
    let mut window = RawWindow::init(&config.raw_data_shape, &store, 10).unwrap();

    // The next record was never written.
    assert_eq!(
        window.update(&config.raw_data_shape, &store, 11),
        Err(StorageError::RecordUnavailable(11))
    );
}
