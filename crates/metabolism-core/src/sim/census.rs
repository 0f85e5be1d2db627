//! Periodic population census
//!
//! One row per recorded iteration: the iteration number followed by the
//! per-element atom counts in element-key order (the stable order declared
//! by the header). The host owns the stream; write failures are
//! engine-fatal and never retried.

use crate::error::SimError;
use metabolism_chemistry::PeriodicTable;
use std::io::Write;

pub struct CensusRecorder {
    out: Box<dyn Write>,
    interval: u64,
    /// Iteration of the most recent row, used to avoid duplicating the
    /// final row at finalize
    last_recorded: Option<u64>,
}

impl CensusRecorder {
    pub fn new(out: Box<dyn Write>, interval: u64) -> Self {
        assert!(interval > 0, "census interval must be positive");
        Self {
            out,
            interval,
            last_recorded: None,
        }
    }

    /// Write the header naming the element order of every following row
    pub fn write_header(&mut self, table: &PeriodicTable) -> Result<(), SimError> {
        write!(self.out, "iter")?;
        for element in table.elements() {
            write!(self.out, "\t{}", element.name)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// Append one row for `iter`
    pub fn record(&mut self, iter: u64, table: &PeriodicTable) -> Result<(), SimError> {
        write!(self.out, "{iter}")?;
        for element in table.elements() {
            write!(self.out, "\t{}", element.count)?;
        }
        writeln!(self.out)?;
        self.last_recorded = Some(iter);
        Ok(())
    }

    /// Append a row if `iter` lands on the recording interval
    pub fn record_if_due(&mut self, iter: u64, table: &PeriodicTable) -> Result<(), SimError> {
        if iter % self.interval == 0 {
            self.record(iter, table)?;
        }
        Ok(())
    }

    /// Final row (unless the last periodic row already covered `iter`) and
    /// flush
    pub fn finish(&mut self, iter: u64, table: &PeriodicTable) -> Result<(), SimError> {
        if self.last_recorded != Some(iter) {
            self.record(iter, table)?;
        }
        self.out.flush()?;
        Ok(())
    }
}
