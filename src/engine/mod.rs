pub mod flow;
pub mod replay;
pub mod snapshot;

pub use flow::{FlowConfig, SyntheticFlow};
pub use replay::ReplayEngine;
pub use snapshot::{Mode, TickSnapshot};
