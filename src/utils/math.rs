use crate::base_classes::types::Price;

/// Mid of the touch prices, in ticks (real-valued).
#[inline]
pub fn mid_ticks(best_bid: Price, best_ask: Price) -> f64 {
    0.5 * (best_bid + best_ask) as f64
}

/// Converts integer ticks to USD at the configured tick value.
#[inline]
pub fn ticks_to_usd(ticks: i64, tick_usd: f64) -> f64 {
    ticks as f64 * tick_usd
}
