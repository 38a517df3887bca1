use std::io::{self, Write};

use crate::config::runner::RunnerConfig;
use crate::engine::snapshot::{Mode, TickSnapshot};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Clears and redraws the terminal panel on every tick. Writes go to stdout;
/// diagnostics are kept on stderr so the panel stays intact.
pub struct Dashboard {
    delta: f64,
    qty_base: i64,
    inv_soft: i64,
    inv_hard: i64,
}

impl Dashboard {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            delta: config.strategy.delta,
            qty_base: config.strategy.qty_base,
            inv_soft: config.strategy.inv_soft,
            inv_hard: config.risk.inv_hard,
        }
    }

    pub fn render(&self, snap: &TickSnapshot) {
        let pnl_color = if snap.pnl_usd > 0.0 {
            GREEN
        } else if snap.pnl_usd < 0.0 {
            RED
        } else {
            RESET
        };
        let mode = match snap.mode {
            Mode::RiskOff => format!("{YELLOW}RISK-OFF{RESET}"),
            Mode::Run => format!("{CYAN}RUN{RESET}"),
        };

        let mut out = io::stdout().lock();
        let _ = write!(out, "\x1b[2J\x1b[H");
        let _ = writeln!(
            out,
            "┌──────────── Market Making Dashboard ────────────┐"
        );
        let _ = writeln!(
            out,
            "│ ts={}   BB=${:.2}   BA=${:.2}   mid=${:.2} │",
            snap.ts, snap.best_bid_usd, snap.best_ask_usd, snap.mid_usd
        );
        let _ = writeln!(
            out,
            "│ inv={}   cash=${:.2}   pnl={}${:.2}{}   trades={} (B:{} S:{}) │",
            snap.inventory,
            snap.cash_usd,
            pnl_color,
            snap.pnl_usd,
            RESET,
            snap.trades,
            snap.buys,
            snap.sells
        );
        let _ = writeln!(
            out,
            "│ mode={}   limits[soft={}, hard={}]   delta={}   qty_base={} │",
            mode, self.inv_soft, self.inv_hard, self.delta, self.qty_base
        );
        let _ = writeln!(
            out,
            "└────────────────────────────────────────────────┘"
        );
        let _ = out.flush();
    }
}
