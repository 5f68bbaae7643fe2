//! Validated agent configuration.
//!
//! All shape contracts the pipeline relies on are checked here, once, when
//! the [`AgentConfig`] is built. A constructed config guarantees:
//!
//! - the per-group tables (window lengths, downsample strides, feature
//!   groups) agree on the number of groups;
//! - every window length and stride is positive, and the backfill depth
//!   equals the largest window;
//! - every feature symbol resolves in the instrument registry;
//! - each group's declared output shape matches the shape implied by its
//!   window length and stride.
//!
//! Violations surface as [`ConfigError`] at build time, never at step time.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Symbol, SymbolIndex, SymbolSpec};

/// Result type for configuration building.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while building an [`AgentConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The shape map has no feature groups.
    EmptyShape,
    /// A feature group declared a zero-length window.
    ZeroWindow { group: usize },
    /// A feature group declared a zero downsample stride.
    ZeroStride { group: usize },
    /// A feature group has no features.
    EmptyGroup { group: usize },
    /// A group's declared index disagrees with its position.
    GroupIndexMismatch { expected: usize, found: usize },
    /// Number of groups disagrees between shape, intervals and features.
    GroupCountMismatch {
        shape: usize,
        intervals: usize,
        features: usize,
    },
    /// A feature references a symbol missing from the instrument registry.
    UnknownSymbol { symbol: Symbol },
    /// Features within one group declare different row counts.
    RaggedGroup { group: usize },
    /// Declared group output shape disagrees with window length and stride.
    ShapeMismatch {
        group: usize,
        declared: (usize, usize),
        actual: (usize, usize),
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyShape => write!(f, "raw data shape has no feature groups"),
            ConfigError::ZeroWindow { group } => {
                write!(f, "feature group {} declares a zero-length window", group)
            }
            ConfigError::ZeroStride { group } => {
                write!(f, "feature group {} declares a zero downsample stride", group)
            }
            ConfigError::EmptyGroup { group } => {
                write!(f, "feature group {} has no features", group)
            }
            ConfigError::GroupIndexMismatch { expected, found } => {
                write!(f, "feature group at position {} declares index {}", expected, found)
            }
            ConfigError::GroupCountMismatch {
                shape,
                intervals,
                features,
            } => write!(
                f,
                "group count mismatch: shape has {}, intervals {}, features {}",
                shape, intervals, features
            ),
            ConfigError::UnknownSymbol { symbol } => {
                write!(f, "symbol {} is not in the instrument registry", symbol)
            }
            ConfigError::RaggedGroup { group } => write!(
                f,
                "features of group {} declare different row counts",
                group
            ),
            ConfigError::ShapeMismatch {
                group,
                declared,
                actual,
            } => write!(
                f,
                "group {} declares output shape {:?} but window and stride imply {:?}",
                group, declared, actual
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// Per-Group Tables
// =============================================================================

/// Per-group raw window lengths plus the backfill depth.
///
/// The backfill depth (`max`) is the largest group length; init fetches
/// `max + 1` records so every group can keep its own-length suffix of the
/// same range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDataShape {
    lens: Vec<usize>,
    max: usize,
}

impl RawDataShape {
    /// Build from per-group window lengths.
    pub fn new(lens: Vec<usize>) -> Result<Self> {
        if lens.is_empty() {
            return Err(ConfigError::EmptyShape);
        }
        for (group, &len) in lens.iter().enumerate() {
            if len == 0 {
                return Err(ConfigError::ZeroWindow { group });
            }
        }
        let max = lens.iter().copied().max().unwrap_or(0);
        Ok(Self { lens, max })
    }

    /// Number of feature groups.
    pub fn n_groups(&self) -> usize {
        self.lens.len()
    }

    /// Required window length of one group.
    pub fn len(&self, group: usize) -> usize {
        self.lens[group]
    }

    /// Backfill depth: the largest per-group window length.
    pub fn max(&self) -> usize {
        self.max
    }
}

/// Per-group downsample strides (in raw records between kept samples).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObsIntervals {
    strides: Vec<usize>,
}

impl ObsIntervals {
    /// Build from per-group strides; every stride must be positive.
    pub fn new(strides: Vec<usize>) -> Result<Self> {
        for (group, &stride) in strides.iter().enumerate() {
            if stride == 0 {
                return Err(ConfigError::ZeroStride { group });
            }
        }
        Ok(Self { strides })
    }

    /// Number of feature groups.
    pub fn n_groups(&self) -> usize {
        self.strides.len()
    }

    /// Downsample stride of one group.
    pub fn stride(&self, group: usize) -> usize {
        self.strides[group]
    }
}

// =============================================================================
// Feature Configuration
// =============================================================================

/// Configuration-side description of one transform stage.
///
/// Interpreted by the `quant` crate's transform module; every stage preserves
/// the length of its input channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransformSpec {
    /// Clamp to `[min, max]`.
    Clip { min: f32, max: f32 },
    /// Sign-preserving logarithmic compression outside `[-thresh, thresh]`;
    /// `base = None` is the natural log.
    LogTail { thresh: f32, base: Option<f32> },
    /// Divide by a constant.
    Scale { divisor: f32 },
}

/// One feature within a group: symbol binding plus its transform chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Feature name, for logs and saved artefacts.
    pub name: String,
    /// Instrument the feature is computed from.
    pub symbol: Symbol,
    /// Ordered transform stages applied to the feature channel.
    pub transforms: Vec<TransformSpec>,
    /// Declared `(rows, cols)` of this feature's slice of the group output.
    pub output_shape: (usize, usize),
}

/// A cluster of features sharing one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureGroupConfig {
    /// Group index; must equal the group's position in the config.
    pub index: usize,
    /// Features of this group, channel order.
    pub features: Vec<FeatureConfig>,
}

impl FeatureGroupConfig {
    /// Total channel count across this group's features.
    pub fn n_channels(&self) -> usize {
        self.features.iter().map(|f| f.output_shape.1).sum()
    }
}

// =============================================================================
// Agent Configuration
// =============================================================================

/// Validated agent configuration.
///
/// Holds the feature groups, window shape, downsample strides and the
/// instrument registry. Construction via [`AgentConfig::new`] performs every
/// consistency check; components downstream index freely into the tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Feature groups, ordered by index.
    pub features: Vec<FeatureGroupConfig>,
    /// Per-group raw window lengths.
    pub raw_data_shape: RawDataShape,
    /// Per-group downsample strides.
    pub obs_intervals: ObsIntervals,
    /// Instrument registry, ordered by [`SymbolIndex`].
    pub symbol_info: Vec<SymbolSpec>,
    /// Maximum simultaneous position slots in the portfolio matrix.
    pub max_positions: usize,
    symbol_info_index: HashMap<Symbol, SymbolIndex>,
}

impl AgentConfig {
    /// Build and validate a configuration.
    pub fn new(
        features: Vec<FeatureGroupConfig>,
        raw_data_shape: RawDataShape,
        obs_intervals: ObsIntervals,
        symbol_info: Vec<SymbolSpec>,
        max_positions: usize,
    ) -> Result<Self> {
        if raw_data_shape.n_groups() != obs_intervals.n_groups()
            || raw_data_shape.n_groups() != features.len()
        {
            return Err(ConfigError::GroupCountMismatch {
                shape: raw_data_shape.n_groups(),
                intervals: obs_intervals.n_groups(),
                features: features.len(),
            });
        }

        let symbol_info_index: HashMap<Symbol, SymbolIndex> = symbol_info
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.symbol.clone(), SymbolIndex(i)))
            .collect();

        for (g, group) in features.iter().enumerate() {
            if group.index != g {
                return Err(ConfigError::GroupIndexMismatch {
                    expected: g,
                    found: group.index,
                });
            }
            let Some(first) = group.features.first() else {
                return Err(ConfigError::EmptyGroup { group: g });
            };
            for fc in &group.features {
                if !symbol_info_index.contains_key(&fc.symbol) {
                    return Err(ConfigError::UnknownSymbol {
                        symbol: fc.symbol.clone(),
                    });
                }
                if fc.output_shape.0 != first.output_shape.0 {
                    return Err(ConfigError::RaggedGroup { group: g });
                }
            }

            let declared = (first.output_shape.0, group.n_channels());
            let rows = raw_data_shape.len(g).div_ceil(obs_intervals.stride(g)) - 1;
            let actual = (rows, declared.1);
            if declared != actual {
                return Err(ConfigError::ShapeMismatch {
                    group: g,
                    declared,
                    actual,
                });
            }
        }

        Ok(Self {
            features,
            raw_data_shape,
            obs_intervals,
            symbol_info,
            max_positions,
            symbol_info_index,
        })
    }

    /// Number of feature groups.
    pub fn n_groups(&self) -> usize {
        self.features.len()
    }

    /// Expected observation shape `(rows, cols)` for one group.
    pub fn group_obs_shape(&self, group: usize) -> (usize, usize) {
        let len = self.raw_data_shape.len(group);
        let stride = self.obs_intervals.stride(group);
        (len.div_ceil(stride) - 1, self.features[group].n_channels())
    }

    /// Registry index of a symbol, if present.
    pub fn symbol_index(&self, symbol: &str) -> Option<SymbolIndex> {
        self.symbol_info_index.get(symbol).copied()
    }

    /// Pip size bound to a symbol.
    ///
    /// Panics on an unregistered symbol; construction guarantees every
    /// configured feature symbol is registered.
    pub fn pip_of(&self, symbol: &str) -> f64 {
        self.symbol_info[self.symbol_info_index[symbol].0].pip
    }
}
