use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::warn;

use crate::base_classes::types::{Price, Qty, Side, Ts};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Add {
        id: String,
        side: Side,
        px: Price,
        qty: Qty,
    },
    Cancel {
        id: String,
    },
    Trade {
        side: Side,
        qty: Qty,
    },
}

/// One row of the recorded event stream. `ts` is empty in some sources; the
/// driver then advances its own counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub ts: Option<Ts>,
    pub kind: EventKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordParseError {
    #[error("expected 6 fields, got {0}")]
    FieldCount(usize),
    #[error("unknown event {0:?}")]
    UnknownEvent(String),
    #[error("unknown side {0:?}")]
    UnknownSide(String),
    #[error("bad {field} field {value:?}")]
    BadInt {
        field: &'static str,
        value: String,
    },
    #[error("non-positive qty {0}")]
    NonPositiveQty(i64),
    #[error("missing id")]
    MissingId,
}

fn parse_side(s: &str) -> Result<Side, RecordParseError> {
    match s {
        "BID" => Ok(Side::Bid),
        "ASK" => Ok(Side::Ask),
        other => Err(RecordParseError::UnknownSide(other.to_string())),
    }
}

fn parse_int(field: &'static str, s: &str) -> Result<i64, RecordParseError> {
    s.parse::<i64>().map_err(|_| RecordParseError::BadInt {
        field,
        value: s.to_string(),
    })
}

fn require_id(s: &str) -> Result<String, RecordParseError> {
    if s.is_empty() {
        return Err(RecordParseError::MissingId);
    }
    Ok(s.to_string())
}

impl EventRecord {
    /// Parses a `ts,event,side,price,qty,id` row. Fields beyond the sixth
    /// are ignored; the source is lenient about trailing commas.
    pub fn parse_line(line: &str) -> Result<Self, RecordParseError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 6 {
            return Err(RecordParseError::FieldCount(fields.len()));
        }

        let ts = if fields[0].is_empty() {
            None
        } else {
            let raw = parse_int("ts", fields[0])?;
            if raw < 0 {
                return Err(RecordParseError::BadInt {
                    field: "ts",
                    value: fields[0].to_string(),
                });
            }
            Some(raw as Ts)
        };

        let kind = match fields[1] {
            "ADD" => {
                let qty = parse_int("qty", fields[4])?;
                if qty <= 0 {
                    return Err(RecordParseError::NonPositiveQty(qty));
                }
                EventKind::Add {
                    id: require_id(fields[5])?,
                    side: parse_side(fields[2])?,
                    px: parse_int("price", fields[3])?,
                    qty,
                }
            }
            "CANCEL" => EventKind::Cancel {
                id: require_id(fields[5])?,
            },
            "TRADE" => {
                let qty = parse_int("qty", fields[4])?;
                if qty < 0 {
                    return Err(RecordParseError::NonPositiveQty(qty));
                }
                EventKind::Trade {
                    side: parse_side(fields[2])?,
                    qty,
                }
            }
            other => return Err(RecordParseError::UnknownEvent(other.to_string())),
        };

        Ok(EventRecord { ts, kind })
    }
}

/// Reopenable CSV event source. Each `open_pass` starts a fresh pass over the
/// same file; the runner replays passes forever while the portfolio carries
/// across them.
pub struct CsvReplayFeed {
    path: PathBuf,
}

impl CsvReplayFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline(always)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open_pass(&self) -> Result<ReplayPass> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open event stream at {}", self.path.display()))?;
        let mut lines = BufReader::new(file).lines();
        let _header = lines.next();
        Ok(ReplayPass { lines })
    }
}

/// One pass over the stream. Malformed rows are skipped with a warning; the
/// driver never sees them.
pub struct ReplayPass {
    lines: Lines<BufReader<File>>,
}

impl Iterator for ReplayPass {
    type Item = EventRecord;

    fn next(&mut self) -> Option<EventRecord> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => {
                    warn!(error = %err, "event stream read error, ending pass");
                    return None;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match EventRecord::parse_line(&line) {
                Ok(record) => return Some(record),
                Err(err) => warn!(error = %err, line = %line, "skipping malformed record"),
            }
        }
    }
}
