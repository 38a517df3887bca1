use serde::Deserialize;

const DEFAULT_INV_HARD: i64 = 80;
const DEFAULT_MAX_DD_USD: f64 = 200.0;

fn default_inv_hard() -> i64 {
    DEFAULT_INV_HARD
}

fn default_max_dd_usd() -> f64 {
    DEFAULT_MAX_DD_USD
}

#[derive(Debug, Deserialize, Clone)]
pub struct RiskConfig {
    /// Hard inventory limit; reaching it flips the regime to risk-off.
    #[serde(default = "default_inv_hard")]
    pub inv_hard: i64,
    /// Drawdown limit in USD.
    #[serde(default = "default_max_dd_usd")]
    pub max_dd_usd: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            inv_hard: DEFAULT_INV_HARD,
            max_dd_usd: DEFAULT_MAX_DD_USD,
        }
    }
}

/// Derives the risk regime after accounting and before quoting. No
/// hysteresis: the flag may toggle on any tick.
pub struct RiskController {
    config: RiskConfig,
}

impl RiskController {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, inventory: i64, drawdown_usd: f64) -> bool {
        inventory.abs() >= self.config.inv_hard || drawdown_usd >= self.config.max_dd_usd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_threshold_is_inclusive() {
        let risk = RiskController::new(RiskConfig {
            inv_hard: 80,
            max_dd_usd: 200.0,
        });
        assert!(!risk.evaluate(79, 0.0));
        assert!(risk.evaluate(80, 0.0));
        assert!(risk.evaluate(-80, 0.0));
    }

    #[test]
    fn drawdown_threshold_is_inclusive() {
        // A drawdown of exactly 200.00 trips risk-off.
        let risk = RiskController::new(RiskConfig {
            inv_hard: 80,
            max_dd_usd: 200.0,
        });
        assert!(!risk.evaluate(0, 199.99));
        assert!(risk.evaluate(0, 200.0));
    }

    #[test]
    fn regime_clears_when_both_inputs_recover() {
        let risk = RiskController::new(RiskConfig::default());
        assert!(risk.evaluate(0, 500.0));
        assert!(!risk.evaluate(0, 0.0));
    }
}
