//! Portfolio matrix to model-input encoding.

use types::portfolio_idx::{FIELD_STRIDE, INPUT_COL_OFFSET, LOT_COL};

use crate::stats::scale_pos_val;

/// Encode the execution subsystem's portfolio matrix into the flat vector
/// appended to the policy observation.
///
/// Rows are position slots; each row carries consecutive 7-column field
/// blocks and the encoder walks columns `5, 12, 19, ...`. Within a row the
/// first taken value is scaled by half the lot column, the second (the
/// position value in pips) is compressed with [`scale_pos_val`], and the
/// result is flattened row-major.
pub fn portfolio_to_model_input(portfolio: &[Vec<f64>]) -> Vec<f32> {
    let mut out = Vec::with_capacity(portfolio.len() * 2);
    for row in portfolio {
        debug_assert!(row.len() > LOT_COL, "portfolio row shorter than schema");
        for (j, col) in (INPUT_COL_OFFSET..row.len())
            .step_by(FIELD_STRIDE)
            .enumerate()
        {
            let v = row[col];
            let encoded = match j {
                0 => (v * row[LOT_COL] / 2.0) as f32,
                1 => scale_pos_val(v as f32),
                _ => v as f32,
            };
            out.push(encoded);
        }
    }
    out
}
