//! Demo configuration for the headless rollout.
//!
//! Builds a small two-group, two-instrument [`AgentConfig`] so the binary can
//! exercise the whole pipeline without a live store.

use types::SymbolSpec;
use types::config::{
    AgentConfig, ConfigError, FeatureConfig, FeatureGroupConfig, ObsIntervals, RawDataShape,
    TransformSpec,
};

/// Rollout parameters for the demo binary.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Steps to roll out after backfill.
    pub steps: u64,
    /// RNG seed for the synthetic walk and the price sampler.
    pub seed: u64,
    /// Raw window length of the fast feature group.
    pub window_fast: usize,
    /// Raw window length of the slow feature group.
    pub window_slow: usize,
    /// Downsample stride of the slow group.
    pub stride_slow: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            steps: 50,
            seed: 7,
            window_fast: 16,
            window_slow: 8,
            stride_slow: 2,
        }
    }
}

impl DemoConfig {
    /// Build the validated agent configuration for the demo instruments.
    pub fn agent_config(&self) -> Result<AgentConfig, ConfigError> {
        let symbol_info = vec![
            SymbolSpec {
                symbol: "EURUSD".to_string(),
                pip: 1e-4,
                pip_val: 100.0,
                contract_size: 100_000.0,
                currency: "USD".to_string(),
                commission: 4.0,
            },
            SymbolSpec {
                symbol: "USDJPY".to_string(),
                pip: 1e-2,
                pip_val: 10_000.0,
                contract_size: 100_000.0,
                currency: "JPY".to_string(),
                commission: 4.0,
            },
        ];

        let fast_rows = self.window_fast - 1;
        let slow_rows = self.window_slow.div_ceil(self.stride_slow) - 1;

        let features = vec![
            FeatureGroupConfig {
                index: 0,
                features: vec![
                    FeatureConfig {
                        name: "price_delta".to_string(),
                        symbol: "EURUSD".to_string(),
                        transforms: vec![
                            TransformSpec::Scale { divisor: 10.0 },
                            TransformSpec::LogTail {
                                thresh: 1.0,
                                base: None,
                            },
                            TransformSpec::Clip {
                                min: -3.0,
                                max: 3.0,
                            },
                        ],
                        output_shape: (fast_rows, 1),
                    },
                    FeatureConfig {
                        name: "spread".to_string(),
                        symbol: "EURUSD".to_string(),
                        transforms: vec![],
                        output_shape: (fast_rows, 1),
                    },
                ],
            },
            FeatureGroupConfig {
                index: 1,
                features: vec![FeatureConfig {
                    name: "price_last_slow".to_string(),
                    symbol: "USDJPY".to_string(),
                    transforms: vec![],
                    output_shape: (slow_rows, 1),
                }],
            },
        ];

        AgentConfig::new(
            features,
            RawDataShape::new(vec![self.window_fast, self.window_slow])?,
            ObsIntervals::new(vec![1, self.stride_slow])?,
            symbol_info,
            20,
        )
    }
}
