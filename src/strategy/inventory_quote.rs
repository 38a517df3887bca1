use serde::Deserialize;

use crate::base_classes::types::{Price, Qty};

const DEFAULT_DELTA: f64 = 0.5;
const DEFAULT_LAMBDA: f64 = 0.05;
const DEFAULT_QTY_BASE: Qty = 2;
const DEFAULT_QTY_MIN: Qty = 1;
const DEFAULT_INV_SOFT: i64 = 50;

fn default_delta() -> f64 {
    DEFAULT_DELTA
}

fn default_lambda() -> f64 {
    DEFAULT_LAMBDA
}

fn default_qty_base() -> Qty {
    DEFAULT_QTY_BASE
}

fn default_qty_min() -> Qty {
    DEFAULT_QTY_MIN
}

fn default_inv_soft() -> i64 {
    DEFAULT_INV_SOFT
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuoteConfig {
    /// Half-spread in ticks around the reservation price.
    #[serde(default = "default_delta")]
    pub delta: f64,
    /// Inventory tilt: the reservation price is `mid - lambda * inventory`.
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    #[serde(default = "default_qty_base")]
    pub qty_base: Qty,
    #[serde(default = "default_qty_min")]
    pub qty_min: Qty,
    /// Soft inventory limit: at or past it one side is gated and sizes bias
    /// toward reducing the position.
    #[serde(default = "default_inv_soft")]
    pub inv_soft: i64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
            lambda: DEFAULT_LAMBDA,
            qty_base: DEFAULT_QTY_BASE,
            qty_min: DEFAULT_QTY_MIN,
            inv_soft: DEFAULT_INV_SOFT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteSet {
    pub bid_px: Price,
    pub ask_px: Price,
    pub enable_bid: bool,
    pub enable_ask: bool,
    pub qty_bid: Qty,
    pub qty_ask: Qty,
}

pub struct InventoryQuoteStrategy {
    config: QuoteConfig,
}

impl InventoryQuoteStrategy {
    pub fn new(config: QuoteConfig) -> Self {
        Self { config }
    }

    /// Two-sided quotes around the inventory-tilted reservation price.
    /// Prices are clamped so the engine never crosses the touch on its own;
    /// near the soft limit (or in risk-off) the position-increasing side is
    /// disabled and the reducing side is pulled one tick inside.
    pub fn quotes(
        &self,
        best_bid: Price,
        best_ask: Price,
        inventory: i64,
        risk_off: bool,
    ) -> QuoteSet {
        let mid = 0.5 * (best_bid + best_ask) as f64;
        let r = mid - self.config.lambda * inventory as f64;

        let mut bid_px = (r - self.config.delta).floor() as Price;
        let mut ask_px = (r + self.config.delta).ceil() as Price;

        // never cross
        if bid_px > best_bid {
            bid_px = best_bid;
        }
        if ask_px < best_ask {
            ask_px = best_ask;
        }

        let mut enable_bid = true;
        let mut enable_ask = true;

        if inventory.abs() >= self.config.inv_soft || risk_off {
            if inventory > 0 {
                enable_bid = false;
            } else if inventory < 0 {
                enable_ask = false;
            }
            // flat inventory keeps both sides enabled even in risk-off
            if !enable_bid {
                ask_px = (ask_px - 1).max(best_ask);
            }
            if !enable_ask {
                bid_px = (bid_px + 1).min(best_bid);
            }
        }

        let q_base = self.base_size(inventory);
        let mut qty_bid = q_base;
        let mut qty_ask = q_base;

        if inventory.abs() >= self.config.inv_soft {
            if inventory > 0 {
                qty_ask = q_base.max(q_base + 1);
                qty_bid = self.config.qty_min;
            } else if inventory < 0 {
                qty_bid = q_base.max(q_base + 1);
                qty_ask = self.config.qty_min;
            }
        }

        QuoteSet {
            bid_px,
            ask_px,
            enable_bid,
            enable_ask,
            qty_bid,
            qty_ask,
        }
    }

    // Shrinks toward qty_min as |inventory| approaches the soft limit; the
    // scale never drops below 0.2.
    fn base_size(&self, inventory: i64) -> Qty {
        let span = self.config.inv_soft.max(1) as f64;
        let scale = (1.0 - inventory.abs() as f64 / span).max(0.2);
        let sized = (self.config.qty_base as f64 * scale).floor() as Qty;
        sized.max(self.config.qty_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(config: QuoteConfig) -> InventoryQuoteStrategy {
        InventoryQuoteStrategy::new(config)
    }

    #[test]
    fn flat_inventory_quotes_straddle_the_touch() {
        let s = strategy(QuoteConfig::default());
        let q = s.quotes(100, 101, 0, false);
        assert_eq!(q.bid_px, 100);
        assert_eq!(q.ask_px, 101);
        assert!(q.enable_bid && q.enable_ask);
        assert_eq!(q.qty_bid, 2);
        assert_eq!(q.qty_ask, 2);
    }

    #[test]
    fn quotes_never_improve_past_the_touch() {
        // Large short inventory pushes the reservation price far above mid;
        // the clamp keeps the bid at or below best_bid.
        let s = strategy(QuoteConfig {
            lambda: 1.0,
            inv_soft: 1_000,
            ..QuoteConfig::default()
        });
        let q = s.quotes(100, 101, -50, false);
        assert!(q.bid_px <= 100);
        assert!(q.ask_px >= 101);
    }

    #[test]
    fn long_inventory_past_soft_limit_gates_bid() {
        let s = strategy(QuoteConfig {
            delta: 0.5,
            lambda: 0.05,
            qty_base: 2,
            qty_min: 1,
            inv_soft: 50,
        });
        let q = s.quotes(100, 101, 55, false);
        assert!(!q.enable_bid);
        assert!(q.enable_ask);
        assert_eq!(q.ask_px, 101);
        assert_eq!(q.qty_ask, 2);
        assert_eq!(q.qty_bid, 1);
    }

    #[test]
    fn short_inventory_past_soft_limit_gates_ask() {
        let s = strategy(QuoteConfig {
            delta: 0.5,
            lambda: 0.05,
            qty_base: 2,
            qty_min: 1,
            inv_soft: 50,
        });
        let q = s.quotes(100, 101, -55, false);
        assert!(q.enable_bid);
        assert!(!q.enable_ask);
        // Reducing side is pulled one tick inside, never through the touch.
        assert_eq!(q.bid_px, 100);
        assert_eq!(q.qty_bid, 2);
        assert_eq!(q.qty_ask, 1);
    }

    #[test]
    fn risk_off_with_flat_inventory_keeps_both_sides() {
        let s = strategy(QuoteConfig::default());
        let q = s.quotes(100, 101, 0, true);
        assert!(q.enable_bid && q.enable_ask);
    }

    #[test]
    fn risk_off_gates_even_below_soft_limit() {
        let s = strategy(QuoteConfig::default());
        let q = s.quotes(100, 101, 10, true);
        assert!(!q.enable_bid);
        assert!(q.enable_ask);
    }

    #[test]
    fn base_size_floors_at_qty_min() {
        let s = strategy(QuoteConfig {
            qty_base: 10,
            qty_min: 3,
            inv_soft: 10,
            ..QuoteConfig::default()
        });
        // |inv| = soft limit -> scale floor 0.2 -> floor(10 * 0.2) = 2 -> min 3.
        assert_eq!(s.base_size(10), 3);
        assert_eq!(s.base_size(0), 10);
    }
}
