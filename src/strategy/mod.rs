pub mod inventory_quote;
pub mod risk;

pub use inventory_quote::{InventoryQuoteStrategy, QuoteConfig, QuoteSet};
pub use risk::{RiskConfig, RiskController};
