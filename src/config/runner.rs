use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::engine::flow::FlowConfig;
use crate::strategy::inventory_quote::QuoteConfig;
use crate::strategy::risk::RiskConfig;

const DEFAULT_TICK_USD: f64 = 0.01;
const DEFAULT_REFRESH_MS: u64 = 80;

fn default_tick_usd() -> f64 {
    DEFAULT_TICK_USD
}

fn default_refresh_ms() -> u64 {
    DEFAULT_REFRESH_MS
}

fn default_data_path() -> String {
    "data/sample_ticks.csv".to_string()
}

fn default_output_path() -> String {
    "data/results_usd.csv".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModeConfig {
    /// Redraw the terminal dashboard on every tick.
    #[serde(default = "default_true")]
    pub dashboard: bool,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self { dashboard: true }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RunnerConfig {
    /// USD value of one price tick; reporting only, the core stays integer.
    #[serde(default = "default_tick_usd")]
    pub tick_usd: f64,
    /// Recorded event stream, replayed forever.
    #[serde(default = "default_data_path")]
    pub data: String,
    /// Per-tick results CSV.
    #[serde(default = "default_output_path")]
    pub output: String,
    /// Pacing sleep between ticks, milliseconds; 0 disables.
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
    pub strategy: QuoteConfig,
    pub risk: RiskConfig,
    pub flow: FlowConfig,
    pub mode: ModeConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_usd: DEFAULT_TICK_USD,
            data: default_data_path(),
            output: default_output_path(),
            refresh_ms: DEFAULT_REFRESH_MS,
            strategy: QuoteConfig::default(),
            risk: RiskConfig::default(),
            flow: FlowConfig::default(),
            mode: ModeConfig::default(),
        }
    }
}

pub fn load_runner_config(path: &str) -> Result<RunnerConfig> {
    let contents = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("failed to read config at {}", path))?;
    let config: RunnerConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config at {}", path))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: RunnerConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.tick_usd, 0.01);
        assert_eq!(config.refresh_ms, 80);
        assert_eq!(config.strategy.delta, 0.5);
        assert_eq!(config.risk.inv_hard, 80);
        assert_eq!(config.flow.buy_rate, 0.0);
        assert!(config.mode.dashboard);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = "
strategy:
  delta: 1.5
  inv_soft: 30
risk:
  max_dd_usd: 50.0
flow:
  buy_rate: 0.2
";
        let config: RunnerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.strategy.delta, 1.5);
        assert_eq!(config.strategy.inv_soft, 30);
        assert_eq!(config.strategy.qty_base, 2);
        assert_eq!(config.risk.max_dd_usd, 50.0);
        assert_eq!(config.risk.inv_hard, 80);
        assert_eq!(config.flow.buy_rate, 0.2);
        assert_eq!(config.flow.max_syn_qty, 3);
    }
}
