use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::engine::snapshot::TickSnapshot;

/// Per-tick results CSV. The header matches the snapshot fields; USD columns
/// carry two decimals. Rows are flushed as written so a killed run keeps its
/// output.
pub struct ResultsCsvLogger {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl ResultsCsvLogger {
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let file = File::create(&path)
            .with_context(|| format!("failed to create results csv at {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writeln!(
            writer,
            "ts,bb_usd,ba_usd,mid_usd,inv,cash_usd,pnl_usd,trades,buys,sells,mode"
        )?;
        Ok(Self { writer, path })
    }

    #[inline(always)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, snap: &TickSnapshot) -> Result<()> {
        writeln!(
            self.writer,
            "{},{:.2},{:.2},{:.2},{},{:.2},{:.2},{},{},{},{}",
            snap.ts,
            snap.best_bid_usd,
            snap.best_ask_usd,
            snap.mid_usd,
            snap.inventory,
            snap.cash_usd,
            snap.pnl_usd,
            snap.trades,
            snap.buys,
            snap.sells,
            snap.mode.as_str(),
        )?;
        self.writer.flush()?;
        Ok(())
    }
}
