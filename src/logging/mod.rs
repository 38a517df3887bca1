//! Reporting sinks for the replay run.
//!
//! The results CSV mirrors the per-tick snapshot; the dashboard redraws a
//! small terminal panel from the same data.

pub mod dashboard;
pub mod results;

pub use dashboard::Dashboard;
pub use results::ResultsCsvLogger;
