use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::base_classes::types::{Qty, Side};

const DEFAULT_MAX_SYN_QTY: Qty = 3;
// Seed shared with nothing else; fixed so replay passes are reproducible.
const DEFAULT_SEED: u64 = 88_172_645_463_393_265;

fn default_max_syn_qty() -> Qty {
    DEFAULT_MAX_SYN_QTY
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

#[derive(Debug, Deserialize, Clone)]
pub struct FlowConfig {
    /// Probability per tick of injecting a synthetic buy aggressor.
    #[serde(default)]
    pub buy_rate: f64,
    /// Probability per tick of injecting a synthetic sell aggressor.
    #[serde(default)]
    pub sell_rate: f64,
    #[serde(default = "default_max_syn_qty")]
    pub max_syn_qty: Qty,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            buy_rate: 0.0,
            sell_rate: 0.0,
            max_syn_qty: DEFAULT_MAX_SYN_QTY,
            seed: DEFAULT_SEED,
        }
    }
}

/// Synthetic taker flow, seeded once at startup. Disabled sides (rate 0)
/// draw nothing from the generator, so an all-zero config is a pure replay.
pub struct SyntheticFlow {
    config: FlowConfig,
    rng: StdRng,
}

impl SyntheticFlow {
    pub fn new(config: FlowConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Aggressor trades to inject this tick, in arrival order.
    pub fn sample(&mut self) -> Vec<(Side, Qty)> {
        let mut out = Vec::new();
        let max_qty = self.config.max_syn_qty.max(1);
        if self.config.buy_rate > 0.0 && self.rng.gen::<f64>() < self.config.buy_rate {
            out.push((Side::Bid, self.rng.gen_range(1..=max_qty)));
        }
        if self.config.sell_rate > 0.0 && self.rng.gen::<f64>() < self.config.sell_rate {
            out.push((Side::Ask, self.rng.gen_range(1..=max_qty)));
        }
        out
    }
}
