//! The set of iostat columns the report understands.
//!
//! Header tokens are matched after dropping one leading `%`, so `%user` and
//! `user` are the same column. Anything not listed here is still read as a
//! number (a bad value is an error) and then discarded.

use crate::models::{CpuSample, DeviceSample};
use crate::parser::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuColumn {
    User,
    Nice,
    System,
    Iowait,
    Steal,
    Idle,
}

impl CpuColumn {
    pub fn from_header(token: &str) -> Option<Self> {
        match strip_pct(token) {
            "user"   => Some(CpuColumn::User),
            "nice"   => Some(CpuColumn::Nice),
            "system" => Some(CpuColumn::System),
            "iowait" => Some(CpuColumn::Iowait),
            "steal"  => Some(CpuColumn::Steal),
            "idle"   => Some(CpuColumn::Idle),
            _        => None,
        }
    }

    pub fn apply(self, sample: &mut CpuSample, value: f64) {
        match self {
            CpuColumn::User   => sample.user   = value,
            CpuColumn::Nice   => sample.nice   = value,
            CpuColumn::System => sample.system = value,
            CpuColumn::Iowait => sample.iowait = value,
            CpuColumn::Steal  => sample.steal  = value,
            CpuColumn::Idle   => sample.idle   = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceColumn {
    ReadsPerSec,
    ReadKbPerSec,
    ReadMergedPerSec,
    ReadPctMerged,
    ReadAwaitMs,
    ReadReqSzKb,
    WritesPerSec,
    WriteKbPerSec,
    WriteMergedPerSec,
    WritePctMerged,
    WriteAwaitMs,
    WriteReqSzKb,
    QueueSize,
}

impl DeviceColumn {
    pub fn from_header(token: &str) -> Option<Self> {
        match strip_pct(token) {
            "r/s"      => Some(DeviceColumn::ReadsPerSec),
            "rkB/s"    => Some(DeviceColumn::ReadKbPerSec),
            "rrqm/s"   => Some(DeviceColumn::ReadMergedPerSec),
            "rrqm"     => Some(DeviceColumn::ReadPctMerged),
            "r_await"  => Some(DeviceColumn::ReadAwaitMs),
            "rareq-sz" => Some(DeviceColumn::ReadReqSzKb),
            "w/s"      => Some(DeviceColumn::WritesPerSec),
            "wkB/s"    => Some(DeviceColumn::WriteKbPerSec),
            "wrqm/s"   => Some(DeviceColumn::WriteMergedPerSec),
            "wrqm"     => Some(DeviceColumn::WritePctMerged),
            "w_await"  => Some(DeviceColumn::WriteAwaitMs),
            "wareq-sz" => Some(DeviceColumn::WriteReqSzKb),
            // sysstat < 12 calls it avgqu-sz
            "aqu-sz" | "avgqu-sz" => Some(DeviceColumn::QueueSize),
            _          => None,
        }
    }

    pub fn apply(self, sample: &mut DeviceSample, value: f64) {
        match self {
            DeviceColumn::ReadsPerSec       => sample.reads_per_sec        = value,
            DeviceColumn::ReadKbPerSec      => sample.read_kb_per_sec      = value,
            DeviceColumn::ReadMergedPerSec  => sample.read_merged_per_sec  = value,
            DeviceColumn::ReadPctMerged     => sample.read_pct_merged      = value,
            DeviceColumn::ReadAwaitMs       => sample.read_await_ms        = value,
            DeviceColumn::ReadReqSzKb       => sample.read_req_sz_kb       = value,
            DeviceColumn::WritesPerSec      => sample.writes_per_sec       = value,
            DeviceColumn::WriteKbPerSec     => sample.write_kb_per_sec     = value,
            DeviceColumn::WriteMergedPerSec => sample.write_merged_per_sec = value,
            DeviceColumn::WritePctMerged    => sample.write_pct_merged     = value,
            DeviceColumn::WriteAwaitMs      => sample.write_await_ms       = value,
            DeviceColumn::WriteReqSzKb      => sample.write_req_sz_kb      = value,
            DeviceColumn::QueueSize         => sample.queue_size           = value,
        }
    }
}

/// One header cell: its name with `%` stripped and, if known, what it maps to.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell<C> {
    pub name:   String,
    pub column: Option<C>,
}

/// A parsed header row, positionally aligned with the value rows below it.
#[derive(Debug, Clone, PartialEq)]
pub struct Header<C> {
    pub cells: Vec<HeaderCell<C>>,
}

impl<C: Copy> Header<C> {
    pub fn new<'t>(tokens: impl IntoIterator<Item = &'t str>, lookup: fn(&str) -> Option<C>) -> Self {
        let cells = tokens
            .into_iter()
            .map(|t| HeaderCell { name: strip_pct(t).to_string(), column: lookup(t) })
            .collect();
        Self { cells }
    }

    /// Zip `values` with the header and hand every recognized pair to `apply`.
    ///
    /// Values past the end of the header are ignored; header cells without a
    /// value are skipped so the record keeps its zero default. Later cells
    /// overwrite earlier ones naming the same column.
    pub fn read_row(
        &self,
        values: &[&str],
        line: usize,
        mut apply: impl FnMut(C, f64),
    ) -> Result<(), ParseError> {
        for (cell, raw) in self.cells.iter().zip(values) {
            let value: f64 = raw.parse().map_err(|_| ParseError::InvalidNumber {
                line,
                column: cell.name.clone(),
                value:  raw.to_string(),
            })?;
            if let Some(col) = cell.column {
                apply(col, value);
            }
        }
        Ok(())
    }
}

fn strip_pct(token: &str) -> &str {
    token.strip_prefix('%').unwrap_or(token)
}
