pub mod runner;

pub use runner::{load_runner_config, ModeConfig, RunnerConfig};
