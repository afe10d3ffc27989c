use chrono::NaiveDateTime;

/// `avg-cpu` percentages for one sampling interval.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuSample {
    pub timestamp: NaiveDateTime,
    pub user:      f64,
    pub nice:      f64,
    pub system:    f64,
    pub iowait:    f64,
    pub steal:     f64,
    pub idle:      f64,
}

impl CpuSample {
    /// Everything that is not idle.
    pub fn busy(&self) -> f64 {
        (100.0 - self.idle).max(0.0)
    }
}
