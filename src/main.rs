//! FX Gym - headless demo rollout.
//!
//! Fills an in-memory record store with a synthetic random walk, backfills a
//! raw window, then steps the observation pipeline once per record, the same
//! call pattern an environment runs at reset and step. Finishes with the
//! execution-side encoders: the portfolio encoding and sampled bid/ask
//! quotes.

mod config;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use smallvec::smallvec;
use tracing::info;

use obs::build_observation;
use quant::{PriceSampler, portfolio_to_model_input};
use storage::{MemoryStore, RawWindow};
use types::record::FeatureRecord;
use types::{FeatureRow, RecordIndex, Timestamp};

pub use config::DemoConfig;

/// FX observation pipeline demo rollout.
#[derive(Parser, Debug)]
#[command(name = "fx-gym")]
#[command(about = "FX observation pipeline demo rollout")]
#[command(version)]
struct Args {
    /// Steps to roll out after backfill
    #[arg(long, env = "GYM_STEPS", default_value_t = 50)]
    steps: u64,

    /// RNG seed for the synthetic walk and price sampler
    #[arg(long, env = "GYM_SEED", default_value_t = 7)]
    seed: u64,

    /// Print the validated agent config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

/// Interval between synthetic records (10s action cadence).
const STEP_MS: Timestamp = 10_000;

/// Fill a store with `n_records` random-walk records matching the demo
/// config's two groups: `[eurusd_price, spread]` and `[usdjpy_price]`.
fn synthetic_store(seed: u64, n_records: usize) -> MemoryStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let walk = Normal::new(0.0, 3e-4).expect("valid normal parameters");

    let mut eur = 1.1000_f64;
    let mut jpy = 150.00_f64;
    let t0: Timestamp = 1_754_000_000_000;

    let mut store = MemoryStore::new();
    for i in 0..n_records {
        eur += walk.sample(&mut rng);
        jpy += walk.sample(&mut rng) * 100.0;
        let spread = 1.2e-4 + walk.sample(&mut rng).abs() * 0.1;

        let fast: FeatureRow = smallvec![eur as f32, spread as f32];
        let slow: FeatureRow = smallvec![jpy as f32];
        store.push(FeatureRecord::new(
            vec![fast, slow],
            t0 + i as Timestamp * STEP_MS,
            eur,
        ));
    }
    store
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let demo = DemoConfig {
        steps: args.steps,
        seed: args.seed,
        ..DemoConfig::default()
    };

    let agent_config = match demo.agent_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("config error: {e}");
            std::process::exit(1);
        }
    };

    if args.dump_config {
        match serde_json::to_string_pretty(&agent_config) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("serialization error: {e}"),
        }
        return;
    }

    let depth = agent_config.raw_data_shape.max();
    let store = synthetic_store(demo.seed, depth + 1 + demo.steps as usize);
    let start = depth as RecordIndex;

    let mut window = match RawWindow::init(&agent_config.raw_data_shape, &store, start) {
        Ok(window) => window,
        Err(e) => {
            eprintln!("backfill failed: {e}");
            std::process::exit(1);
        }
    };
    info!(index = start, depth, "window backfilled");

    let mut sampler = PriceSampler::new(demo.seed);
    let mut last_obs = None;
    for step in 1..=demo.steps {
        let index = start + step;
        if let Err(e) = window.update(&agent_config.raw_data_shape, &store, index) {
            eprintln!("step {step} failed: {e}");
            std::process::exit(1);
        }
        let obs = build_observation(&agent_config, &window);

        if step % 10 == 0 || step == demo.steps {
            info!(
                step,
                index,
                fast_shape = ?obs.group_shape(0),
                slow_shape = ?obs.group_shape(1),
                trade_price = window.trade_price,
                "observation built"
            );
        }
        last_obs = Some(obs);
    }

    // Execution-side encoders on the final state: one long EURUSD slot at
    // 0.5 lots, 12 pips in profit, the rest of the book flat.
    let mut portfolio = vec![vec![0.0_f64; 14]; agent_config.max_positions];
    portfolio[0][5] = 1.0;
    portfolio[0][6] = 0.5;
    portfolio[0][12] = 12.0;
    let pos_val = portfolio_to_model_input(&portfolio);

    let eur = window.trade_price;
    let jpy = 150.0;
    let price_vec = [
        eur - 2e-4,
        eur,
        eur - 1e-4,
        eur + 1e-4,
        jpy - 0.02,
        jpy,
        jpy - 0.01,
        jpy + 0.01,
    ];
    let quotes = sampler.current_prices(&agent_config.symbol_info, &price_vec);

    if let Some(obs) = last_obs {
        let head: Vec<f32> = obs.groups[0].iter().take(3).map(|r| r[0]).collect();
        info!(?head, "transformed primary channel (first rows)");
    }
    info!(
        pos_val_len = pos_val.len(),
        pos_val_head = ?&pos_val[..2],
        "portfolio encoded"
    );
    for (spec, quote) in agent_config.symbol_info.iter().zip(&quotes) {
        info!(symbol = %spec.symbol, bid = quote[0], ask = quote[1], "sampled quote");
    }

    eprintln!(
        "rolled out {} steps over {} records ({} groups, backfill depth {})",
        demo.steps,
        store.len(),
        agent_config.n_groups(),
        depth
    );
}
