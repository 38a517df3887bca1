#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, VecDeque};

use thiserror::Error;

use crate::base_classes::types::*;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("duplicate order id {0:?}")]
    DuplicateOrderId(String),
}

/// Outcome of `place_quote`. `filled` is the total quantity a crossing quote
/// consumed, including takes against our own resting orders. `executions` is
/// the per-price breakdown of that sweep with self-trade takes removed; it is
/// what the caller routes to accounting. A non-crossing quote rests and
/// returns `filled == 0`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QuotePlacement {
    pub filled: Qty,
    pub executions: Vec<Fill>,
    pub rested: bool,
}

type LevelQueue = VecDeque<Order>;

/// Price-time-priority book. Levels are FIFO queues keyed by integer tick
/// price; the id index tracks every resting order for O(1) cancel lookup and
/// is kept in lockstep with inserts, cancels, and matched-out orders.
#[derive(Debug, Default, PartialEq)]
pub struct QueueOrderBook {
    bids: BTreeMap<Price, LevelQueue>, // best at last key
    asks: BTreeMap<Price, LevelQueue>, // best at first key
    index: HashMap<String, (Side, Price)>,
}

impl QueueOrderBook {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.keys().next_back().copied()
    }

    #[inline(always)]
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() || self.asks.is_empty()
    }

    #[inline(always)]
    pub fn len_bids(&self) -> usize {
        self.bids.len()
    }

    #[inline(always)]
    pub fn len_asks(&self) -> usize {
        self.asks.len()
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.index.clear();
    }

    /// Looks up a resting order by id. Scans the level queue the index points
    /// at; the queue owns the order, the index only remembers where it rests.
    pub fn resting(&self, id: &str) -> Option<&Order> {
        let (side, px) = *self.index.get(id)?;
        let book = match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        };
        book.get(&px)?.iter().find(|o| o.id == id)
    }

    /// Rests `order` at the tail of its price level. The order rests even if
    /// its price crosses the opposing best; crossing semantics belong to
    /// `place_quote`.
    pub fn add(&mut self, order: Order) -> Result<(), BookError> {
        if self.index.contains_key(&order.id) {
            return Err(BookError::DuplicateOrderId(order.id.clone()));
        }
        self.index.insert(order.id.clone(), (order.side, order.px));
        let book = match order.side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        };
        book.entry(order.px).or_default().push_back(order);
        Ok(())
    }

    /// Removes the order with `id` wherever it rests. Returns false for
    /// unknown ids; repeat cancels are no-ops.
    pub fn cancel(&mut self, id: &str) -> bool {
        let Some(&(side, px)) = self.index.get(id) else {
            return false;
        };
        let book = match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        };
        if let Some(queue) = book.get_mut(&px) {
            if let Some(pos) = queue.iter().position(|o| o.id == id) {
                queue.remove(pos);
                if queue.is_empty() {
                    book.remove(&px);
                }
                self.index.remove(id);
                return true;
            }
        }
        false
    }

    /// An external taker of side `aggressor` consumes resting liquidity from
    /// the opposite side, best level first, FIFO within a level. Returns one
    /// fill per take from an `ours` order; partial consumption when liquidity
    /// runs out is silently accepted.
    pub fn external_trade(&mut self, aggressor: Side, qty: Qty) -> Vec<Fill> {
        let mut fills = Vec::new();
        let resting = aggressor.opposite();
        let (book, index) = match resting {
            Side::Bid => (&mut self.bids, &mut self.index),
            Side::Ask => (&mut self.asks, &mut self.index),
        };
        Self::consume(book, index, resting, qty, |head, take, px| {
            if head.ours {
                fills.push(Fill::new(head.side, take, px));
            }
        });
        fills
    }

    /// Places a strategy quote. A price at or through the opposing best makes
    /// the quote a taker: it sweeps the opposite side and any unfilled
    /// remainder is discarded. Takes against our own resting orders mutate
    /// the book but are excluded from `executions`. Otherwise the quote rests
    /// with `ours` forced on.
    pub fn place_quote(&mut self, order: Order) -> Result<QuotePlacement, BookError> {
        let crossing = match order.side {
            Side::Bid => self.best_ask().map_or(false, |ask| order.px >= ask),
            Side::Ask => self.best_bid().map_or(false, |bid| order.px <= bid),
        };
        if crossing {
            let taker = order.side;
            let resting = taker.opposite();
            let (book, index) = match resting {
                Side::Bid => (&mut self.bids, &mut self.index),
                Side::Ask => (&mut self.asks, &mut self.index),
            };
            let mut executions = Vec::new();
            let filled = Self::consume(book, index, resting, order.qty, |head, take, px| {
                if !head.ours {
                    executions.push(Fill::new(taker, take, px));
                }
            });
            return Ok(QuotePlacement {
                filled,
                executions,
                rested: false,
            });
        }

        let mut ours = order;
        ours.ours = true;
        self.add(ours)?;
        Ok(QuotePlacement {
            filled: 0,
            executions: Vec::new(),
            rested: true,
        })
    }

    // Core sweep shared by external trades and crossing quotes: drain the
    // best level FIFO, pop exhausted orders (dropping their index entries),
    // remove emptied levels. `on_take` observes each head before decrement.
    fn consume(
        book: &mut BTreeMap<Price, LevelQueue>,
        index: &mut HashMap<String, (Side, Price)>,
        resting: Side,
        mut qty: Qty,
        mut on_take: impl FnMut(&Order, Qty, Price),
    ) -> Qty {
        let mut filled = 0;
        while qty > 0 {
            let entry = match resting {
                Side::Bid => book.iter_mut().next_back(),
                Side::Ask => book.iter_mut().next(),
            };
            let Some((&px, queue)) = entry else {
                break;
            };
            while qty > 0 {
                let Some(head) = queue.front_mut() else {
                    break;
                };
                let take = head.qty.min(qty);
                on_take(head, take, px);
                head.qty -= take;
                qty -= take;
                filled += take;
                if head.qty == 0 {
                    if let Some(done) = queue.pop_front() {
                        index.remove(&done.id);
                    }
                }
            }
            if queue.is_empty() {
                book.remove(&px);
            }
        }
        filled
    }
}
