pub mod chart;
pub mod html;
pub mod json;
pub mod summary;

pub use html::{write_report, ReportInput};

use xxhash_rust::xxh3::xxh3_64;

/// Stable fingerprint of the input file shown in the report header.
pub fn fingerprint(data: &[u8]) -> String {
    format!("{:016x}", xxh3_64(data))
}
