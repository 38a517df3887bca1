#![allow(dead_code)]

pub type Price = i64; // integer ticks
pub type Qty = i64; // integer units
pub type Ts = u64; // logical event timestamp

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    #[inline(always)]
    pub fn opposite(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// A resting limit order. `ours` marks quotes placed by the strategy; only
/// those generate fills back to accounting when an external aggressor
/// consumes them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub id: String,
    pub side: Side,
    pub px: Price,
    pub qty: Qty,
    pub ts: Ts,
    pub ours: bool,
}

impl Order {
    #[inline(always)]
    pub fn new(id: String, side: Side, px: Price, qty: Qty, ts: Ts, ours: bool) -> Self {
        Self {
            id,
            side,
            px,
            qty,
            ts,
            ours,
        }
    }
}

/// An execution attributed to the strategy. `side` is the direction of our
/// trade: `Bid` means we bought, `Ask` means we sold.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Fill {
    pub side: Side,
    pub qty: Qty,
    pub px: Price,
}

impl Fill {
    #[inline(always)]
    pub const fn new(side: Side, qty: Qty, px: Price) -> Self {
        Self { side, qty, px }
    }
}
