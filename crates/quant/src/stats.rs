//! Compression kernels for network-friendly scalar ranges.

/// Logarithm with an optional explicit base; `None` is the natural log.
#[inline]
fn log_base(v: f32, base: Option<f32>) -> f32 {
    match base {
        None => v.ln(),
        Some(b) => v.ln() / b.ln(),
    }
}

/// Two-sided logarithmic tail compression.
///
/// Identity inside `[-thresh, thresh]`; outside, the value is compressed to
/// `±(thresh + log(|x| + 1 - thresh))` so the output is continuous at the
/// threshold and monotone in `|x|`.
#[inline]
pub fn log_tail(x: f32, thresh: f32, base: Option<f32>) -> f32 {
    if x > thresh {
        thresh + log_base(x + 1.0 - thresh, base)
    } else if x < -thresh {
        -thresh - log_base(-x + 1.0 - thresh, base)
    } else {
        x
    }
}

/// In-place [`log_tail`] over a channel.
pub fn log_tail_slice(values: &mut [f32], thresh: f32, base: Option<f32>) {
    for v in values.iter_mut() {
        *v = log_tail(*v, thresh, base);
    }
}

/// Compress an unbounded position value (in pips) into a bounded scalar.
///
/// A small linear term is summed with a natural-log tail and the result is
/// clipped to `[-2, 2]`. Zero maps to zero and the magnitude is monotone
/// non-decreasing in `|x|`.
#[inline]
pub fn scale_pos_val(x: f32) -> f32 {
    let linear = x * 0.03;
    (log_tail(x, 0.0, None) / 3.0 + linear).clamp(-2.0, 2.0)
}

/// In-place [`scale_pos_val`] over a channel.
pub fn scale_pos_val_slice(values: &mut [f32]) {
    for v in values.iter_mut() {
        *v = scale_pos_val(*v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_tail_identity_inside_threshold() {
        assert_eq!(log_tail(0.5, 1.0, None), 0.5);
        assert_eq!(log_tail(-0.5, 1.0, None), -0.5);
        assert_eq!(log_tail(0.0, 0.0, None), 0.0);
    }

    #[test]
    fn test_log_tail_sign_preserving() {
        let pos = log_tail(10.0, 0.0, None);
        let neg = log_tail(-10.0, 0.0, None);
        assert!((pos - 11.0_f32.ln()).abs() < 1e-6);
        assert!((pos + neg).abs() < 1e-6);
    }

    #[test]
    fn test_log_tail_explicit_base() {
        // Base 10: log10(101) at threshold 0 for x = 100.
        let v = log_tail(100.0, 0.0, Some(10.0));
        assert!((v - 101.0_f32.log10()).abs() < 1e-5);
    }

    #[test]
    fn test_log_tail_continuous_at_threshold() {
        let below = log_tail(2.0, 2.0, None);
        let above = log_tail(2.0 + 1e-6, 2.0, None);
        assert!((below - above).abs() < 1e-4);
    }

    #[test]
    fn test_scale_pos_val_zero() {
        assert_eq!(scale_pos_val(0.0), 0.0);
    }

    #[test]
    fn test_scale_pos_val_hand_computed() {
        // x = 1: ln(2)/3 + 0.03
        let expected = 2.0_f32.ln() / 3.0 + 0.03;
        assert!((scale_pos_val(1.0) - expected).abs() < 1e-6);
        assert!((scale_pos_val(-1.0) + expected).abs() < 1e-6);
    }

    #[test]
    fn test_scale_pos_val_monotone_and_bounded() {
        let mut prev = 0.0_f32;
        for i in 0..2_000 {
            let x = i as f32 * 0.1;
            let y = scale_pos_val(x);
            assert!(y >= prev, "not monotone at x={x}");
            assert!((-2.0..=2.0).contains(&y));
            // Odd symmetry carries the bound to the negative side.
            assert_eq!(scale_pos_val(-x), -y);
            prev = y;
        }
    }

    #[test]
    fn test_scale_pos_val_saturates() {
        assert_eq!(scale_pos_val(1e6), 2.0);
        assert_eq!(scale_pos_val(-1e6), -2.0);
    }

    #[test]
    fn test_slice_variants_match_scalar() {
        let xs = [-5.0_f32, -0.5, 0.0, 0.5, 5.0];
        let mut tail = xs;
        log_tail_slice(&mut tail, 1.0, None);
        let mut scaled = xs;
        scale_pos_val_slice(&mut scaled);
        for (i, &x) in xs.iter().enumerate() {
            assert_eq!(tail[i], log_tail(x, 1.0, None));
            assert_eq!(scaled[i], scale_pos_val(x));
        }
    }
}
