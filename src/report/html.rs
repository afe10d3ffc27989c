use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::models::ParsedData;
use crate::report::chart;

const TEMPLATE: &str = include_str!("../../templates/report.html");

/// Everything the report page shows besides the charts' data.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub parsed:      &'a ParsedData,
    pub title:       &'a str,
    pub metadata:    &'a str,
    pub file_name:   &'a str,
    pub file_hash:   &'a str,
    pub version:     &'a str,
    pub generated:   &'a str,
    pub axis_splits: u32,
    pub echarts_url: &'a str,
}

/// Render the full HTML page.
pub fn render(input: &ReportInput) -> Result<String> {
    let cpu_option = script_json(&chart::cpu_option(input.parsed))?;

    let mut sections = String::new();
    let mut scripts  = String::new();
    let mut nav      = String::new();
    for (index, (name, samples)) in input.parsed.devices.iter().enumerate() {
        let id = chart::chart_id(index, name);
        let option = script_json(&chart::device_option(samples, input.axis_splits))
            .with_context(|| format!("failed to encode chart for device {}", name))?;

        nav.push_str(&format!("<a href=\"#{id}_section\">{}</a>", escape(name)));
        sections.push_str(&format!(
            "<section id=\"{id}_section\">\n  <h2>{}</h2>\n  <div id=\"{id}\" class=\"chart\"></div>\n</section>\n",
            escape(name)
        ));
        scripts.push_str(&format!(
            "(function () {{\n  var c = echarts.init(document.getElementById('{id}'));\n  c.setOption({option});\n  charts.push(c);\n}})();\n"
        ));
    }

    let html = fill(TEMPLATE, |key| {
        let v = match key {
            "title"           => escape(input.title),
            "echarts_url"     => escape(input.echarts_url),
            "file_name"       => escape(input.file_name),
            "file_hash"       => escape(input.file_hash),
            "file_hash_short" => escape(&abbreviate(input.file_hash)),
            "interval_count"  => input.parsed.cpus.len().to_string(),
            "device_count"    => input.parsed.devices.len().to_string(),
            "generated"       => escape(input.generated),
            "version"         => escape(input.version),
            "metadata"        => render_metadata(input.metadata),
            "device_nav"      => nav.clone(),
            "device_sections" => sections.clone(),
            "cpu_option"      => cpu_option.clone(),
            "device_scripts"  => scripts.clone(),
            _                 => return None,
        };
        Some(v)
    });
    debug!(bytes = html.len(), devices = input.parsed.devices.len(), "rendered report");
    Ok(html)
}

/// Render and write the report to `path`.
pub fn write_report(path: &Path, input: &ReportInput) -> Result<()> {
    let html = render(input)?;
    fs::write(path, html)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

/// Replace every `{{key}}` in one pass so substituted text is never rescanned.
/// Unknown keys are left as they are.
fn fill(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match lookup(key) {
                    Some(v) => out.push_str(&v),
                    None    => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// JSON safe to inline in a `<script>` element.
fn script_json(value: &Value) -> Result<String> {
    let text = serde_json::to_string(value)?;
    Ok(text
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _    => out.push(c),
        }
    }
    out
}

/// First six characters followed by `..`.
fn abbreviate(s: &str) -> String {
    if s.chars().count() > 6 {
        let head: String = s.chars().take(6).collect();
        format!("{}..", head)
    } else {
        s.to_string()
    }
}

/// A JSON object becomes a key/value table; anything else is shown verbatim.
fn render_metadata(metadata: &str) -> String {
    let trimmed = metadata.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => {
            let mut out = String::from("<section id=\"metadata\">\n  <h2>Metadata</h2>\n  <table class=\"meta\">\n");
            for (k, v) in &map {
                let shown = match v {
                    Value::String(s) => s.clone(),
                    other            => other.to_string(),
                };
                out.push_str(&format!("    <tr><td>{}</td><td>{}</td></tr>\n", escape(k), escape(&shown)));
            }
            out.push_str("  </table>\n</section>\n");
            out
        }
        _ => format!(
            "<section id=\"metadata\">\n  <h2>Metadata</h2>\n  <pre class=\"meta\">{}</pre>\n</section>\n",
            escape(trimmed)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_iostat;

    const SAMPLE: &str = "\
09/04/24 12:07:20
avg-cpu:  %user   %nice %system %iowait  %steal   %idle
           2.36    0.00    0.40    0.04    0.01   97.20

Device            r/s     rkB/s   rrqm/s  %rrqm r_await rareq-sz     w/s     wkB/s   wrqm/s  %wrqm w_await wareq-sz  aqu-sz
sda              1.00   1024.00     0.31  13.07    0.50    45.47    2.00   2048.00     5.55  36.68    1.50    21.96    0.10
dm-0             0.00      0.00     0.00   0.00    0.00     0.00    1.00      4.00     0.00   0.00    0.20     4.00    0.01

09/04/24 12:07:21
avg-cpu:  %user   %nice %system %iowait  %steal   %idle
          20.00    0.00    2.00    0.00    0.00   78.00

Device            r/s     rkB/s   rrqm/s  %rrqm r_await rareq-sz     w/s     wkB/s   wrqm/s  %wrqm w_await wareq-sz  aqu-sz
sda              3.00    512.00     0.31  13.07    0.20    45.47    4.00   1024.00     5.55  36.68    0.80    21.96    0.05
dm-0             0.00      0.00     0.00   0.00    0.00     0.00    1.00      4.00     0.00   0.00    0.20     4.00    0.01
";

    fn input<'a>(parsed: &'a ParsedData, title: &'a str, metadata: &'a str) -> ReportInput<'a> {
        ReportInput {
            parsed,
            title,
            metadata,
            file_name:   "iostat.log",
            file_hash:   "abcdef1234567890",
            version:     "0.1.0",
            generated:   "2024-09-04 13:00:00",
            axis_splits: 5,
            echarts_url: "echarts.min.js",
        }
    }

    /// The JSON argument following the first occurrence of `marker`.
    fn extract_option(html: &str, marker: &str) -> Value {
        let start = html.find(marker).expect("marker present") + marker.len();
        let end = html[start..].find(");").expect("call closed") + start;
        serde_json::from_str(&html[start..end]).expect("valid JSON")
    }

    #[test]
    fn renders_title_hash_and_charts() {
        let parsed = parse_iostat(SAMPLE.as_bytes()).unwrap();
        let html = render(&input(&parsed, "My Title", "")).unwrap();

        assert!(html.contains("<h1>My Title</h1>"));
        assert!(html.contains("abcdef.."));
        assert!(html.contains("iostat.log"));
        assert!(!html.contains("{{"));

        let cpu = extract_option(&html, "cpuChart.setOption(");
        assert_eq!(cpu["legend"]["data"].as_array().unwrap().len(), 6);

        let dev = extract_option(&html, "c.setOption(");
        let axes = dev["yAxis"].as_array().unwrap();
        assert_eq!(axes.len(), 4);
        assert_eq!(axes[0]["min"], 1.0);
        assert_eq!(axes[0]["max"], 4.0);
        assert!((axes[0]["interval"].as_f64().unwrap() - 0.6).abs() < 1e-9);
        assert!((axes[1]["min"].as_f64().unwrap() - 0.5).abs() < 1e-9);
        assert!((axes[3]["interval"].as_f64().unwrap() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn devices_render_in_first_seen_order() {
        let parsed = parse_iostat(SAMPLE.as_bytes()).unwrap();
        let html = render(&input(&parsed, "t", "")).unwrap();
        let sda = html.find("id=\"dev0_sda_chart\"").unwrap();
        let dm0 = html.find("id=\"dev1_dm_0_chart\"").unwrap();
        assert!(sda < dm0);
        assert!(html.contains("<h2>dm-0</h2>"));
    }

    #[test]
    fn lookalike_device_names_get_their_own_chart() {
        let input_text = "\
09/04/24 12:07:20
avg-cpu:  %user   %idle
           2.00   98.00

Device   r/s   w/s
dm-0     1.00  2.00
dm_0     3.00  4.00
";
        let parsed = parse_iostat(input_text.as_bytes()).unwrap();
        let html = render(&input(&parsed, "t", "")).unwrap();
        assert_eq!(html.matches("id=\"dev0_dm_0_chart\"").count(), 1);
        assert_eq!(html.matches("id=\"dev1_dm_0_chart\"").count(), 1);
        assert!(html.contains("getElementById('dev0_dm_0_chart')"));
        assert!(html.contains("getElementById('dev1_dm_0_chart')"));
    }

    #[test]
    fn escapes_user_text() {
        let parsed = ParsedData::new();
        let html = render(&input(&parsed, "<script>alert(1)</script>", "a & b")).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("<pre class=\"meta\">a &amp; b</pre>"));
    }

    #[test]
    fn empty_input_still_renders() {
        let parsed = ParsedData::new();
        let html = render(&input(&parsed, "Empty", "")).unwrap();
        let cpu = extract_option(&html, "cpuChart.setOption(");
        assert_eq!(cpu["series"][0]["data"].as_array().unwrap().len(), 0);
        assert!(!html.contains("c.setOption("));
        assert!(!html.contains("id=\"metadata\""));
    }

    #[test]
    fn json_metadata_becomes_table() {
        let parsed = ParsedData::new();
        let html = render(&input(&parsed, "t", r#"{"host":"db01","cores":8}"#)).unwrap();
        assert!(html.contains("<tr><td>host</td><td>db01</td></tr>"));
        assert!(html.contains("<tr><td>cores</td><td>8</td></tr>"));
    }

    #[test]
    fn script_json_cannot_close_script() {
        let v = serde_json::json!({ "name": "</script><b>" });
        let s = script_json(&v).unwrap();
        assert!(!s.contains("</script>"));
        let back: Value = serde_json::from_str(&s).unwrap();
        assert_eq!(back["name"], "</script><b>");
    }

    #[test]
    fn fill_is_single_pass() {
        let out = fill("a {{x}} b {{y}} {{unknown}} {{", |k| match k {
            "x" => Some("{{y}}".to_string()),
            "y" => Some("Y".to_string()),
            _   => None,
        });
        assert_eq!(out, "a {{y}} b Y {{unknown}} {{");
    }

    #[test]
    fn abbreviates_long_hashes_only() {
        assert_eq!(abbreviate("abcdef1234"), "abcdef..");
        assert_eq!(abbreviate("abc"), "abc");
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.html");
        let parsed = parse_iostat(SAMPLE.as_bytes()).unwrap();
        write_report(&out, &input(&parsed, "File", "")).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("<!DOCTYPE html>"));
        assert!(text.contains("dev0_sda_chart"));
    }
}
