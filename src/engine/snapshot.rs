use crate::base_classes::types::Ts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Run,
    RiskOff,
}

impl Mode {
    #[inline(always)]
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Run => "RUN",
            Mode::RiskOff => "RISK_OFF",
        }
    }
}

/// Per-tick state handed to the reporting sinks after quote placement. USD
/// fields are ticks scaled by the configured tick value.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSnapshot {
    pub ts: Ts,
    pub best_bid_usd: f64,
    pub best_ask_usd: f64,
    pub mid_usd: f64,
    pub inventory: i64,
    pub cash_usd: f64,
    pub pnl_usd: f64,
    pub trades: u64,
    pub buys: u64,
    pub sells: u64,
    pub mode: Mode,
}
