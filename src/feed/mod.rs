pub mod csv_replay;

pub use csv_replay::{CsvReplayFeed, EventKind, EventRecord, RecordParseError, ReplayPass};
