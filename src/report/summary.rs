use crate::models::{DeviceSample, ParsedData};
use crate::util::human::{fmt_iops, fmt_kb_rate, fmt_pct, fmt_span};

/// Generate a human-readable summary of parsed iostat data.
pub fn generate(parsed: &ParsedData, title: &str) -> String {
    let mut out = String::new();

    out.push_str("═══════════════════════════════════════════════\n");
    out.push_str(&format!("  {}\n", title));
    out.push_str("═══════════════════════════════════════════════\n\n");

    // ── Intervals ──────────────────────────────────────────────────────
    out.push_str(&format!("── Intervals ({}) ─────────────────────────────\n", parsed.cpus.len()));
    match (parsed.cpus.first(), parsed.cpus.last()) {
        (Some(first), Some(last)) => {
            out.push_str(&format!(
                "  {}  →  {}  ({})\n",
                first.timestamp.format("%Y-%m-%d %H:%M:%S"),
                last.timestamp.format("%Y-%m-%d %H:%M:%S"),
                fmt_span(last.timestamp - first.timestamp),
            ));
        }
        _ => out.push_str("  ● No samples found\n"),
    }
    out.push('\n');

    // ── CPU ────────────────────────────────────────────────────────────
    if !parsed.cpus.is_empty() {
        out.push_str("── CPU (avg / peak) ───────────────────────────\n");
        let rows: [(&str, Vec<f64>); 5] = [
            ("user",   parsed.cpus.iter().map(|c| c.user).collect()),
            ("system", parsed.cpus.iter().map(|c| c.system).collect()),
            ("iowait", parsed.cpus.iter().map(|c| c.iowait).collect()),
            ("steal",  parsed.cpus.iter().map(|c| c.steal).collect()),
            ("busy",   parsed.cpus.iter().map(|c| c.busy()).collect()),
        ];
        for (label, values) in &rows {
            out.push_str(&format!(
                "  {:<8} {:>7} / {:>7}\n",
                label, fmt_pct(mean(values)), fmt_pct(peak(values)),
            ));
        }
        out.push('\n');
    }

    // ── Devices ────────────────────────────────────────────────────────
    out.push_str(&format!("── Devices ({}) ───────────────────────────────\n", parsed.devices.len()));
    if !parsed.devices.is_empty() {
        out.push_str(&format!(
            "  {:<12} {:>8} {:>8} {:>11} {:>11} {:>9} {:>9} {:>7}\n",
            "Device", "r/s", "w/s", "read", "write", "r_await", "w_await", "aqu-sz",
        ));
        out.push_str(&format!("  {}\n", "─".repeat(83)));
    }
    for (name, samples) in parsed.devices.iter() {
        let avg = |f: fn(&DeviceSample) -> f64| mean(&samples.iter().map(f).collect::<Vec<_>>());
        let max_queue = peak(&samples.iter().map(|s| s.queue_size).collect::<Vec<_>>());
        out.push_str(&format!(
            "  {:<12} {:>8} {:>8} {:>11} {:>11} {:>7.2}ms {:>7.2}ms {:>7.2}\n",
            name,
            fmt_iops(avg(|s| s.reads_per_sec)),
            fmt_iops(avg(|s| s.writes_per_sec)),
            fmt_kb_rate(avg(|s| s.read_kb_per_sec)),
            fmt_kb_rate(avg(|s| s.write_kb_per_sec)),
            avg(|s| s.read_await_ms),
            avg(|s| s.write_await_ms),
            max_queue,
        ));
    }
    out.push('\n');

    out.push_str("═══════════════════════════════════════════════\n");
    out
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn peak(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max)
}
