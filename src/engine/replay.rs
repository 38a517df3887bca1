use tracing::warn;

use crate::base_classes::order_book::QueueOrderBook;
use crate::base_classes::types::{Order, Price, Qty, Side, Ts};
use crate::config::runner::RunnerConfig;
use crate::engine::flow::SyntheticFlow;
use crate::engine::snapshot::{Mode, TickSnapshot};
use crate::execution::portfolio::Portfolio;
use crate::feed::csv_replay::{EventKind, EventRecord};
use crate::strategy::inventory_quote::InventoryQuoteStrategy;
use crate::strategy::risk::RiskController;
use crate::utils::math::{mid_ticks, ticks_to_usd};

/// The tick driver. Owns the book, the portfolio, and the strategy stack;
/// processes one recorded event at a time, strictly sequentially. A replay
/// pass rebuilds the book while the portfolio and the quote id counter carry
/// across passes.
pub struct ReplayEngine {
    book: QueueOrderBook,
    portfolio: Portfolio,
    strategy: InventoryQuoteStrategy,
    risk: RiskController,
    flow: SyntheticFlow,
    tick_usd: f64,
    ts: Ts,
    quote_seq: u64,
    risk_off: bool,
}

impl ReplayEngine {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            book: QueueOrderBook::new(),
            portfolio: Portfolio::new(),
            strategy: InventoryQuoteStrategy::new(config.strategy.clone()),
            risk: RiskController::new(config.risk.clone()),
            flow: SyntheticFlow::new(config.flow.clone()),
            tick_usd: config.tick_usd,
            ts: 0,
            quote_seq: 0,
            risk_off: false,
        }
    }

    /// Starts a fresh pass over the event stream: the book is rebuilt, the
    /// portfolio carries over.
    pub fn begin_pass(&mut self) {
        self.book.clear();
    }

    #[inline(always)]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    #[inline(always)]
    pub fn book(&self) -> &QueueOrderBook {
        &self.book
    }

    /// Processes one event: mutate the book, account our fills, inject
    /// synthetic flow, refresh the risk regime, quote, and emit a snapshot.
    /// Returns None when either book side is empty and the strategy steps
    /// are skipped.
    pub fn on_event(&mut self, record: &EventRecord) -> Option<TickSnapshot> {
        self.ts = record.ts.unwrap_or(self.ts + 1);

        match &record.kind {
            EventKind::Add { id, side, px, qty } => {
                let order = Order::new(id.clone(), *side, *px, *qty, self.ts, false);
                if self.book.add(order).is_err() {
                    warn!(id = %id, ts = self.ts, "rejected ADD with duplicate order id");
                }
            }
            EventKind::Cancel { id } => {
                self.book.cancel(id);
            }
            EventKind::Trade { side, qty } => {
                for fill in self.book.external_trade(*side, *qty) {
                    self.portfolio.apply_fill(&fill);
                }
            }
        }

        if self.book.is_empty() {
            return None;
        }

        // Synthetic aggressors route through accounting exactly like
        // recorded trades.
        for (side, qty) in self.flow.sample() {
            for fill in self.book.external_trade(side, qty) {
                self.portfolio.apply_fill(&fill);
            }
        }

        let (bb, ba) = match (self.book.best_bid(), self.book.best_ask()) {
            (Some(bb), Some(ba)) => (bb, ba),
            _ => return None,
        };

        let mid = mid_ticks(bb, ba);
        let pnl_ticks = self.portfolio.mark_to_market(mid);
        let drawdown_usd = self.portfolio.drawdown_usd(pnl_ticks, self.tick_usd);
        self.risk_off = self
            .risk
            .evaluate(self.portfolio.inventory(), drawdown_usd);

        let quotes = self
            .strategy
            .quotes(bb, ba, self.portfolio.inventory(), self.risk_off);

        if quotes.enable_bid {
            self.place_quote(Side::Bid, quotes.bid_px, quotes.qty_bid);
        }
        if quotes.enable_ask {
            self.place_quote(Side::Ask, quotes.ask_px, quotes.qty_ask);
        }

        let pnl_ticks = self.portfolio.mark_to_market(mid);
        Some(TickSnapshot {
            ts: self.ts,
            best_bid_usd: ticks_to_usd(bb, self.tick_usd),
            best_ask_usd: ticks_to_usd(ba, self.tick_usd),
            mid_usd: mid * self.tick_usd,
            inventory: self.portfolio.inventory(),
            cash_usd: ticks_to_usd(self.portfolio.cash_ticks(), self.tick_usd),
            pnl_usd: ticks_to_usd(pnl_ticks, self.tick_usd),
            trades: self.portfolio.trades(),
            buys: self.portfolio.buys(),
            sells: self.portfolio.sells(),
            mode: if self.risk_off {
                Mode::RiskOff
            } else {
                Mode::Run
            },
        })
    }

    // Executions from a crossing quote hit accounting; a rested quote just
    // waits in the book. Self-trade takes never come back from place_quote.
    fn place_quote(&mut self, side: Side, px: Price, qty: Qty) {
        let id = self.next_quote_id(side);
        let order = Order::new(id, side, px, qty, self.ts, true);
        match self.book.place_quote(order) {
            Ok(placement) => {
                for fill in &placement.executions {
                    self.portfolio.apply_fill(fill);
                }
            }
            Err(err) => warn!(error = %err, ts = self.ts, "quote rejected"),
        }
    }

    fn next_quote_id(&mut self, side: Side) -> String {
        self.quote_seq += 1;
        match side {
            Side::Bid => format!("qb-{}", self.quote_seq),
            Side::Ask => format!("qa-{}", self.quote_seq),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::runner::RunnerConfig;
    use crate::feed::csv_replay::{EventKind, EventRecord};

    fn add(ts: Ts, id: &str, side: Side, px: Price, qty: Qty) -> EventRecord {
        EventRecord {
            ts: Some(ts),
            kind: EventKind::Add {
                id: id.to_string(),
                side,
                px,
                qty,
            },
        }
    }

    fn cancel(ts: Ts, id: &str) -> EventRecord {
        EventRecord {
            ts: Some(ts),
            kind: EventKind::Cancel { id: id.to_string() },
        }
    }

    fn trade(ts: Ts, side: Side, qty: Qty) -> EventRecord {
        EventRecord {
            ts: Some(ts),
            kind: EventKind::Trade { side, qty },
        }
    }

    fn quiet_config() -> RunnerConfig {
        // No synthetic flow, drawdown limit far away: deterministic replay.
        let mut config = RunnerConfig::default();
        config.risk.max_dd_usd = 1e9;
        config
    }

    #[test]
    fn one_sided_book_skips_strategy_steps() {
        let mut engine = ReplayEngine::new(&quiet_config());
        assert!(engine.on_event(&add(1, "b1", Side::Bid, 100, 5)).is_none());
        assert_eq!(engine.portfolio().trades(), 0);
        // No quotes were placed on the one-sided book.
        assert_eq!(engine.book().len_bids(), 1);
    }

    #[test]
    fn quotes_rest_once_both_sides_exist() {
        let mut engine = ReplayEngine::new(&quiet_config());
        engine.on_event(&add(1, "b1", Side::Bid, 100, 5));
        let snap = engine.on_event(&add(2, "a1", Side::Ask, 101, 5)).unwrap();
        assert_eq!(snap.ts, 2);
        assert_eq!(snap.mode, Mode::Run);
        // Default config: bid at 100, ask at 101, both resting as ours.
        assert!(engine.book().resting("qb-1").is_some());
        assert!(engine.book().resting("qa-1").is_some());
    }

    #[test]
    fn empty_ts_advances_the_counter() {
        let mut engine = ReplayEngine::new(&quiet_config());
        engine.on_event(&add(7, "b1", Side::Bid, 100, 5));
        let rec = EventRecord {
            ts: None,
            kind: EventKind::Add {
                id: "a1".to_string(),
                side: Side::Ask,
                px: 101,
                qty: 5,
            },
        };
        let snap = engine.on_event(&rec).unwrap();
        assert_eq!(snap.ts, 8);
    }

    #[test]
    fn external_trade_through_our_quote_is_accounted() {
        let mut engine = ReplayEngine::new(&quiet_config());
        engine.on_event(&add(1, "b1", Side::Bid, 100, 5));
        engine.on_event(&add(2, "a1", Side::Ask, 101, 5));
        // Level 100 is [b1(5), qb-1(2)]; a 6-lot sell sweeps one of ours.
        engine.on_event(&trade(3, Side::Ask, 6));
        assert_eq!(engine.portfolio().inventory(), 1);
        assert_eq!(engine.portfolio().cash_ticks(), -100);
        assert_eq!(engine.portfolio().buys(), 1);
        assert_eq!(engine.portfolio().trades(), 1);
    }

    #[test]
    fn duplicate_add_leaves_state_unchanged() {
        let mut engine = ReplayEngine::new(&quiet_config());
        engine.on_event(&add(1, "b1", Side::Bid, 100, 5));
        engine.on_event(&add(2, "a1", Side::Ask, 101, 5));
        let before_bids = engine.book().len_bids();
        engine.on_event(&add(3, "b1", Side::Bid, 99, 9));
        assert_eq!(engine.book().len_bids(), before_bids);
        assert_eq!(engine.book().resting("b1").unwrap().px, 100);
    }

    #[test]
    fn cancel_of_unknown_id_still_ticks() {
        let mut engine = ReplayEngine::new(&quiet_config());
        engine.on_event(&add(1, "b1", Side::Bid, 100, 5));
        engine.on_event(&add(2, "a1", Side::Ask, 101, 5));
        assert!(engine.on_event(&cancel(3, "ghost")).is_some());
    }

    #[test]
    fn replay_passes_double_the_per_pass_deltas() {
        // The book is rebuilt each pass, the portfolio carries over, so
        // two passes land at exactly twice the single-pass deltas.
        let events = vec![
            add(1, "b1", Side::Bid, 100, 5),
            add(2, "a1", Side::Ask, 101, 5),
            trade(3, Side::Ask, 6), // sweeps b1 then one unit of our bid
            trade(4, Side::Bid, 6), // sweeps a1 then one unit of our ask
        ];

        let mut engine = ReplayEngine::new(&quiet_config());

        engine.begin_pass();
        for ev in &events {
            engine.on_event(ev);
        }
        let inv_1 = engine.portfolio().inventory();
        let cash_1 = engine.portfolio().cash_ticks();
        let trades_1 = engine.portfolio().trades();
        assert_eq!(inv_1, 0);
        assert_eq!(cash_1, 1);
        assert_eq!(trades_1, 2);
        assert_eq!(engine.portfolio().buys(), 1);
        assert_eq!(engine.portfolio().sells(), 1);

        engine.begin_pass();
        for ev in &events {
            engine.on_event(ev);
        }
        assert_eq!(engine.portfolio().inventory(), 2 * inv_1);
        assert_eq!(engine.portfolio().cash_ticks(), 2 * cash_1);
        assert_eq!(engine.portfolio().trades(), 2 * trades_1);
        assert_eq!(engine.portfolio().buys(), 2);
        assert_eq!(engine.portfolio().sells(), 2);
    }

    #[test]
    fn hard_inventory_breach_flips_mode() {
        let mut config = quiet_config();
        config.risk.inv_hard = 1;
        config.strategy.inv_soft = 1;
        let mut engine = ReplayEngine::new(&config);
        engine.on_event(&add(1, "b1", Side::Bid, 100, 5));
        engine.on_event(&add(2, "a1", Side::Ask, 101, 5));
        let snap = engine.on_event(&trade(3, Side::Ask, 6)).unwrap();
        // Inventory 1 >= inv_hard 1 -> risk-off, bid side gated.
        assert_eq!(snap.mode, Mode::RiskOff);
        assert_eq!(snap.inventory, 1);
    }
}
