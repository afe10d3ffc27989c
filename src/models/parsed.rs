use crate::models::{CpuSample, DeviceSeries};

/// Result of one parse: CPU samples in input order plus per-device series.
#[derive(Debug, Clone, Default)]
pub struct ParsedData {
    pub cpus:    Vec<CpuSample>,
    pub devices: DeviceSeries,
}

impl ParsedData {
    pub fn new() -> Self {
        Self { cpus: Vec::new(), devices: DeviceSeries::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.cpus.is_empty() && self.devices.is_empty()
    }

    /// Total number of device samples across all devices.
    pub fn device_sample_count(&self) -> usize {
        self.devices.iter().map(|(_, s)| s.len()).sum()
    }
}
