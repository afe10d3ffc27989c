use chrono::NaiveDateTime;
use std::collections::HashMap;

/// One row of the extended device table for one sampling interval.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSample {
    pub timestamp: NaiveDateTime,
    pub name:      String,

    pub reads_per_sec:        f64,
    pub read_kb_per_sec:      f64,
    pub read_merged_per_sec:  f64,
    pub read_pct_merged:      f64,
    pub read_await_ms:        f64,
    pub read_req_sz_kb:       f64,

    pub writes_per_sec:       f64,
    pub write_kb_per_sec:     f64,
    pub write_merged_per_sec: f64,
    pub write_pct_merged:     f64,
    pub write_await_ms:       f64,
    pub write_req_sz_kb:      f64,

    /// `aqu-sz`; zero when the iostat build does not print it.
    pub queue_size:           f64,
}

impl DeviceSample {
    pub fn new(timestamp: NaiveDateTime, name: impl Into<String>) -> Self {
        Self {
            timestamp,
            name: name.into(),
            reads_per_sec:        0.0,
            read_kb_per_sec:      0.0,
            read_merged_per_sec:  0.0,
            read_pct_merged:      0.0,
            read_await_ms:        0.0,
            read_req_sz_kb:       0.0,
            writes_per_sec:       0.0,
            write_kb_per_sec:     0.0,
            write_merged_per_sec: 0.0,
            write_pct_merged:     0.0,
            write_await_ms:       0.0,
            write_req_sz_kb:      0.0,
            queue_size:           0.0,
        }
    }

    pub fn read_mb_per_sec(&self) -> f64  { self.read_kb_per_sec / 1024.0 }
    pub fn write_mb_per_sec(&self) -> f64 { self.write_kb_per_sec / 1024.0 }
}

/// Per-device sample sequences keyed by device name.
///
/// Keys iterate in first-seen order so the report lays devices out the same
/// way on every run; lookups go through a hash index.
#[derive(Debug, Clone, Default)]
pub struct DeviceSeries {
    entries: Vec<(String, Vec<DeviceSample>)>,
    index:   HashMap<String, usize>,
}

impl DeviceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample to its device's sequence, creating the entry on first sight.
    pub fn push(&mut self, sample: DeviceSample) {
        match self.index.get(&sample.name) {
            Some(&i) => self.entries[i].1.push(sample),
            None => {
                self.index.insert(sample.name.clone(), self.entries.len());
                self.entries.push((sample.name.clone(), vec![sample]));
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&[DeviceSample]> {
        self.index.get(name).map(|&i| self.entries[i].1.as_slice())
    }

    /// Number of distinct devices.
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DeviceSample])> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}
