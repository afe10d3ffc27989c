use serde_json::{json, Value};

use crate::models::ParsedData;

const TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S";

/// Machine-readable dump of the parsed series. Devices stay in first-seen order.
pub fn snapshot(parsed: &ParsedData, file_name: &str, file_hash: &str) -> Value {
    let cpus: Vec<Value> = parsed.cpus.iter().map(|c| {
        json!({
            "timestamp": c.timestamp.format(TIMESTAMP).to_string(),
            "user":      c.user,
            "nice":      c.nice,
            "system":    c.system,
            "iowait":    c.iowait,
            "steal":     c.steal,
            "idle":      c.idle,
        })
    }).collect();

    let devices: Vec<Value> = parsed.devices.iter().map(|(name, samples)| {
        let rows: Vec<Value> = samples.iter().map(|d| {
            json!({
                "timestamp":            d.timestamp.format(TIMESTAMP).to_string(),
                "reads_per_sec":        d.reads_per_sec,
                "read_kb_per_sec":      d.read_kb_per_sec,
                "read_merged_per_sec":  d.read_merged_per_sec,
                "read_pct_merged":      d.read_pct_merged,
                "read_await_ms":        d.read_await_ms,
                "read_req_sz_kb":       d.read_req_sz_kb,
                "writes_per_sec":       d.writes_per_sec,
                "write_kb_per_sec":     d.write_kb_per_sec,
                "write_merged_per_sec": d.write_merged_per_sec,
                "write_pct_merged":     d.write_pct_merged,
                "write_await_ms":       d.write_await_ms,
                "write_req_sz_kb":      d.write_req_sz_kb,
                "queue_size":           d.queue_size,
            })
        }).collect();
        json!({ "name": name, "samples": rows })
    }).collect();

    json!({
        "version":   env!("CARGO_PKG_VERSION"),
        "file":      file_name,
        "file_hash": file_hash,
        "cpu":       cpus,
        "devices":   devices,
    })
}
