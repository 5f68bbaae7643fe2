//! Stochastic execution-price modelling from bar extremes.
//!
//! Stored records carry only the bid/ask extremes seen inside each action
//! interval; the sampler models the unobserved intra-bar price as a uniform
//! draw on the tenth-pip grid between those extremes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use types::SymbolSpec;

/// Quantized intra-bar price sampler.
///
/// Owns a seedable RNG so parallel sessions sample independently without
/// shared state; called once per symbol per step.
#[derive(Debug)]
pub struct PriceSampler {
    rng: StdRng,
}

impl PriceSampler {
    /// Deterministic sampler from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Sampler seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Sample a price in `[min_p, max_p]` quantized to the `pip / 10` grid.
    ///
    /// Draws a uniform integer on `[trunc(min_p*10/pip), trunc(max_p*10/pip)]`
    /// inclusive and rescales. `min_p == max_p` returns that fixed price.
    pub fn sample_price(&mut self, min_p: f64, max_p: f64, pip: f64) -> f64 {
        debug_assert!(pip > 0.0 && min_p <= max_p);
        let lo = (min_p * 10.0 / pip) as i64;
        let hi = (max_p * 10.0 / pip) as i64;
        let q = if lo < hi { self.rng.gen_range(lo..=hi) } else { lo };
        q as f64 * pip / 10.0
    }

    /// Estimated `[bid, ask]` per symbol from tick extremes.
    ///
    /// `price` carries four scalars per symbol in registry order:
    /// `[bid_low, bid_high, ask_low, ask_high]`. Bid and ask are sampled
    /// independently.
    ///
    /// Every row is quantized with the pip of `symbol_info[0]`, not the row's
    /// own symbol. This matches what the deployed models were trained
    /// against and is pinned by a test; do not "fix" it without retraining.
    pub fn current_prices(&mut self, symbol_info: &[SymbolSpec], price: &[f64]) -> Vec<[f64; 2]> {
        assert!(
            price.len() >= symbol_info.len() * 4,
            "price vector holds {} scalars, need 4 per symbol for {} symbols",
            price.len(),
            symbol_info.len()
        );
        let mut out = Vec::with_capacity(symbol_info.len());
        for i in 0..symbol_info.len() {
            let pip = symbol_info[0].pip;
            let bid = self.sample_price(price[i * 4], price[i * 4 + 1], pip);
            let ask = self.sample_price(price[i * 4 + 2], price[i * 4 + 3], pip);
            out.push([bid, ask]);
        }
        out
    }
}
