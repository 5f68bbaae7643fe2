//! Interpreter for configured transform chains.
//!
//! [`TransformSpec`] values describe stages declaratively on the config side;
//! this module executes them over a feature channel. Every stage preserves
//! length, which is what lets declared output shapes be validated once at
//! configuration build.

use types::config::TransformSpec;

use crate::stats::log_tail_slice;

/// Apply one transform stage in place.
pub fn apply_transform(values: &mut [f32], spec: &TransformSpec) {
    match *spec {
        TransformSpec::Clip { min, max } => {
            for v in values.iter_mut() {
                *v = v.clamp(min, max);
            }
        }
        TransformSpec::LogTail { thresh, base } => log_tail_slice(values, thresh, base),
        TransformSpec::Scale { divisor } => {
            for v in values.iter_mut() {
                *v /= divisor;
            }
        }
    }
}

/// Apply an ordered transform chain in place.
pub fn apply_chain(values: &mut [f32], specs: &[TransformSpec]) {
    for spec in specs {
        apply_transform(values, spec);
    }
}
