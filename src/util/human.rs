use chrono::Duration;

/// Format bytes/s into a human-readable string: "12.5 MB/s"
pub fn fmt_rate(bytes_per_sec: f64) -> String {
    fmt_bytes_f(bytes_per_sec) + "/s"
}

/// iostat reports throughput in kB/s; render it like any other byte rate.
pub fn fmt_kb_rate(kb_per_sec: f64) -> String {
    fmt_rate(kb_per_sec * 1024.0)
}

fn fmt_bytes_f(b: f64) -> String {
    const TB: f64 = 1_099_511_627_776.0;
    const GB: f64 = 1_073_741_824.0;
    const MB: f64 = 1_048_576.0;
    const KB: f64 = 1_024.0;
    if b >= TB      { format!("{:.1} TB", b / TB) }
    else if b >= GB { format!("{:.1} GB", b / GB) }
    else if b >= MB { format!("{:.1} MB", b / MB) }
    else if b >= KB { format!("{:.1} KB", b / KB) }
    else            { format!("{:.0} B",  b) }
}

/// Format IOPS: "1.2K"
pub fn fmt_iops(iops: f64) -> String {
    if iops >= 1_000_000.0 { format!("{:.1}M", iops / 1_000_000.0) }
    else if iops >= 1_000.0 { format!("{:.1}K", iops / 1_000.0) }
    else { format!("{:.1}", iops) }
}

/// Format a percentage with one decimal: "84.5%"
pub fn fmt_pct(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// Format a wall-clock span: "1h 02m 03s", "4m 10s", "12s"
pub fn fmt_span(span: Duration) -> String {
    let total = span.num_seconds().max(0);
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0      { format!("{}h {:02}m {:02}s", h, m, s) }
    else if m > 0 { format!("{}m {:02}s", m, s) }
    else          { format!("{}s", s) }
}
