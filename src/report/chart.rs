//! ECharts option objects for the CPU chart and the per-device charts.

use serde_json::{json, Value};

use crate::models::{CpuSample, DeviceSample, ParsedData};
use crate::util::axis::{calc_scale, AxisScale};

const TIME_LABEL: &str = "%H:%M:%S";

pub const CPU_LEGEND: [&str; 6] = ["User", "System", "Idle", "IOWait", "Nice", "Steal"];
pub const DEVICE_LEGEND: [&str; 7] = [
    "Read Req/s",
    "Write Req/s",
    "Read MB/s",
    "Write MB/s",
    "Read Latency (ms)",
    "Write Latency (ms)",
    "Queue Size",
];

fn toolbox() -> Value {
    json!({
        "show": true,
        "top":  -7,
        "feature": {
            "saveAsImage": {},
            "dataZoom":    {},
            "dataView":    { "readOnly": false },
            "restore":     {},
        },
    })
}

fn line(name: &str, data: &[f64]) -> Value {
    json!({ "name": name, "type": "line", "data": data })
}

/// One line per `avg-cpu` percentage over time.
pub fn cpu_option(parsed: &ParsedData) -> Value {
    let times: Vec<String> = parsed.cpus.iter()
        .map(|c| c.timestamp.format(TIME_LABEL).to_string())
        .collect();
    let col = |f: fn(&CpuSample) -> f64| -> Vec<f64> {
        parsed.cpus.iter().map(f).collect()
    };

    json!({
        "tooltip": { "trigger": "axis" },
        "legend":  { "data": CPU_LEGEND, "bottom": 0 },
        "toolbox": toolbox(),
        "xAxis":   { "type": "category", "data": times },
        "yAxis":   { "type": "value", "name": "% CPU" },
        "series": [
            line("User",   &col(|c| c.user)),
            line("System", &col(|c| c.system)),
            line("Idle",   &col(|c| c.idle)),
            line("IOWait", &col(|c| c.iowait)),
            line("Nice",   &col(|c| c.nice)),
            line("Steal",  &col(|c| c.steal)),
        ],
    })
}

fn value_axis(name: &str, position: &str, offset: u32, scale: AxisScale, unit: Option<&str>) -> Value {
    let formatter = match unit {
        Some(u) => format!("{{value}} {}", u),
        None    => "{value}".to_string(),
    };
    json!({
        "type":      "value",
        "name":      name,
        "position":  position,
        "offset":    offset,
        "min":       scale.min,
        "max":       scale.max,
        "interval":  scale.interval,
        "splitLine": { "show": true },
        "axisLabel": { "formatter": formatter },
    })
}

/// Series for one device, grouped onto four independently scaled y-axes:
/// request rate, throughput, latency and queue depth.
pub fn device_option(samples: &[DeviceSample], splits: u32) -> Value {
    let times: Vec<String> = samples.iter()
        .map(|s| s.timestamp.format(TIME_LABEL).to_string())
        .collect();
    let col = |f: fn(&DeviceSample) -> f64| -> Vec<f64> { samples.iter().map(f).collect() };

    let req_reads  = col(|s| s.reads_per_sec);
    let req_writes = col(|s| s.writes_per_sec);
    let mb_reads   = col(DeviceSample::read_mb_per_sec);
    let mb_writes  = col(DeviceSample::write_mb_per_sec);
    let lat_reads  = col(|s| s.read_await_ms);
    let lat_writes = col(|s| s.write_await_ms);
    let queue      = col(|s| s.queue_size);

    let req_scale = calc_scale(splits, &[&req_reads, &req_writes]);
    let mb_scale  = calc_scale(splits, &[&mb_reads, &mb_writes]);
    let lat_scale = calc_scale(splits, &[&lat_reads, &lat_writes]);
    let q_scale   = calc_scale(splits, &[&queue]);

    let on_axis = |name: &str, data: &[f64], axis: usize| -> Value {
        let mut s = line(name, data);
        s["yAxisIndex"] = json!(axis);
        s
    };

    json!({
        "grid":    { "containLabel": true },
        "tooltip": { "trigger": "axis" },
        "legend":  { "data": DEVICE_LEGEND, "bottom": 0 },
        "toolbox": toolbox(),
        "xAxis":   { "type": "category", "data": times },
        "yAxis": [
            value_axis("Req/s",      "left",  0,   req_scale, Some("req/s")),
            value_axis("MB/s",       "left",  80,  mb_scale,  Some("MB/s")),
            value_axis("ms",         "right", 40,  lat_scale, Some("ms")),
            value_axis("Queue Size", "right", 120, q_scale,   None),
        ],
        "series": [
            on_axis(DEVICE_LEGEND[0], &req_reads,  0),
            on_axis(DEVICE_LEGEND[1], &req_writes, 0),
            on_axis(DEVICE_LEGEND[2], &mb_reads,   1),
            on_axis(DEVICE_LEGEND[3], &mb_writes,  1),
            on_axis(DEVICE_LEGEND[4], &lat_reads,  2),
            on_axis(DEVICE_LEGEND[5], &lat_writes, 2),
            on_axis(DEVICE_LEGEND[6], &queue,      3),
        ],
    })
}

/// DOM id for the `index`-th device chart: `dev<index>_<name>_chart` with
/// anything that is not alphanumeric turned into `_` (`dm-0` → `dev1_dm_0_chart`).
/// The index keeps ids apart for names that only differ in punctuation.
pub fn chart_id(index: usize, device: &str) -> String {
    let name: String = device
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("dev{}_{}_chart", index, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, sec)
            .unwrap()
    }

    fn sample(sec: u32, r: f64, w: f64, rkb: f64, wkb: f64, rlat: f64, wlat: f64, q: f64) -> DeviceSample {
        let mut s = DeviceSample::new(ts(sec), "sda");
        s.reads_per_sec    = r;
        s.writes_per_sec   = w;
        s.read_kb_per_sec  = rkb;
        s.write_kb_per_sec = wkb;
        s.read_await_ms    = rlat;
        s.write_await_ms   = wlat;
        s.queue_size       = q;
        s
    }

    fn axis(opt: &Value, i: usize) -> (f64, f64, f64) {
        let a = &opt["yAxis"][i];
        (
            a["min"].as_f64().unwrap(),
            a["max"].as_f64().unwrap(),
            a["interval"].as_f64().unwrap(),
        )
    }

    fn close(a: (f64, f64, f64), b: (f64, f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9 && (a.2 - b.2).abs() < 1e-9
    }

    #[test]
    fn device_axes_are_scaled_per_group() {
        let samples = vec![
            sample(0, 1.0, 2.0, 1024.0, 2048.0, 0.5, 1.5, 0.1),
            sample(1, 3.0, 4.0, 512.0,  1024.0, 0.2, 0.8, 0.05),
        ];
        let opt = device_option(&samples, 5);

        assert_eq!(opt["yAxis"].as_array().unwrap().len(), 4);
        assert!(close(axis(&opt, 0), (1.0, 4.0, 0.6)));
        assert!(close(axis(&opt, 1), (0.5, 2.0, 0.3)));
        assert!(close(axis(&opt, 2), (0.2, 1.5, 0.26)));
        assert!(close(axis(&opt, 3), (0.05, 0.1, 0.01)));
        assert_eq!(opt["yAxis"][0]["axisLabel"]["formatter"], "{value} req/s");
        assert_eq!(opt["yAxis"][3]["axisLabel"]["formatter"], "{value}");
    }

    #[test]
    fn device_series_bind_to_axes() {
        let samples = vec![sample(0, 1.0, 2.0, 1024.0, 2048.0, 0.5, 1.5, 0.1)];
        let opt = device_option(&samples, 5);
        let series = opt["series"].as_array().unwrap();
        assert_eq!(series.len(), 7);
        let axes: Vec<u64> = series.iter().map(|s| s["yAxisIndex"].as_u64().unwrap()).collect();
        assert_eq!(axes, vec![0, 0, 1, 1, 2, 2, 3]);
        assert_eq!(series[2]["data"][0], 1.0);
        assert_eq!(series[3]["data"][0], 2.0);
        assert_eq!(opt["xAxis"]["data"][0], "12:00:00");
    }

    #[test]
    fn empty_device_gets_placeholder_axes() {
        let opt = device_option(&[], 5);
        for i in 0..4 {
            assert_eq!(axis(&opt, i), (0.0, 0.0, 0.0));
        }
    }

    #[test]
    fn cpu_chart_has_six_series() {
        let mut parsed = ParsedData::new();
        for (sec, user) in [(0, 10.0), (1, 20.0)] {
            parsed.cpus.push(CpuSample {
                timestamp: ts(sec),
                user,
                nice:   0.0,
                system: 5.0,
                iowait: 0.0,
                steal:  0.0,
                idle:   100.0 - user - 5.0,
            });
        }
        let opt = cpu_option(&parsed);
        assert_eq!(opt["legend"]["data"].as_array().unwrap().len(), 6);
        assert_eq!(opt["series"].as_array().unwrap().len(), 6);
        assert_eq!(opt["series"][0]["data"], json!([10.0, 20.0]));
        assert_eq!(opt["series"][2]["name"], "Idle");
        assert_eq!(opt["xAxis"]["data"], json!(["12:00:00", "12:00:01"]));
    }

    #[test]
    fn chart_ids_are_dom_safe() {
        assert_eq!(chart_id(0, "sda"), "dev0_sda_chart");
        assert_eq!(chart_id(1, "dm-0"), "dev1_dm_0_chart");
        assert_eq!(chart_id(2, "cciss/c0d0"), "dev2_cciss_c0d0_chart");
    }

    #[test]
    fn chart_ids_differ_for_lookalike_names() {
        assert_ne!(chart_id(0, "dm-0"), chart_id(1, "dm_0"));
        assert_ne!(chart_id(0, "a.b"), chart_id(1, "a-b"));
    }
}
